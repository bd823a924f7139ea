//! Financial behavior survey
//!
//! All answers except the two custom text fields and the topic list are
//! selections from fixed option sets. Form widgets are expected to restrict
//! input to these sets; nothing here validates beyond parsing.

use serde::{Deserialize, Serialize};

option_set! {
    /// Main financial goal
    pub enum Goal {
        SaveMoney => ("save_money", "Save money"),
        PayOffDebt => ("pay_off_debt", "Pay off debt"),
        Invest => ("invest", "Invest"),
        BudgetBetter => ("budget_better", "Budget better"),
        Other => ("other", "Other"),
    }
}

option_set! {
    /// How soon the goal should be reached
    pub enum Timeline {
        UnderThreeMonths => ("under_3_months", "< 3 months"),
        ThreeToSixMonths => ("3_to_6_months", "3–6 months"),
        SixToTwelveMonths => ("6_to_12_months", "6–12 months"),
        OverOneYear => ("over_1_year", "> 1 year"),
    }
}

option_set! {
    /// Whether spending is tracked regularly
    pub enum TrackingFrequency {
        Yes => ("yes", "Yes"),
        No => ("no", "No"),
        Sometimes => ("sometimes", "Sometimes"),
    }
}

option_set! {
    /// Category the user tends to overspend in
    pub enum OverspendCategory {
        Food => ("food", "Food"),
        Entertainment => ("entertainment", "Entertainment"),
        OnlineShopping => ("online_shopping", "Online Shopping"),
        Subscriptions => ("subscriptions", "Subscriptions"),
        Other => ("other", "Other"),
    }
}

option_set! {
    /// How often the user impulse buys
    pub enum ImpulseFrequency {
        Frequently => ("frequently", "Frequently"),
        Occasionally => ("occasionally", "Occasionally"),
        Rarely => ("rarely", "Rarely"),
        Never => ("never", "Never"),
    }
}

option_set! {
    /// How stable monthly income is
    pub enum IncomeStability {
        Fixed => ("fixed", "Fixed"),
        SomewhatVariable => ("somewhat_variable", "Somewhat variable"),
        HighlyVariable => ("highly_variable", "Highly variable"),
    }
}

option_set! {
    /// Share of income saved each month
    pub enum SavingsRate {
        UpToTen => ("0_to_10", "0–10%"),
        TenToTwenty => ("10_to_20", "10–20%"),
        TwentyToThirty => ("20_to_30", "20–30%"),
        OverThirty => ("over_30", "More than 30%"),
        NotSaving => ("not_saving", "I don’t save currently"),
    }
}

option_set! {
    /// Emergency fund status
    pub enum EmergencyFund {
        Yes => ("yes", "Yes"),
        No => ("no", "No"),
        WorkingOnIt => ("working_on_it", "I’m working on it"),
    }
}

option_set! {
    /// Confidence in managing money
    pub enum Confidence {
        VeryConfident => ("very_confident", "Very confident"),
        SomewhatConfident => ("somewhat_confident", "Somewhat confident"),
        NotConfident => ("not_confident", "Not confident"),
    }
}

option_set! {
    /// Topics the user would like to learn about
    pub enum Topic {
        Budgeting => ("budgeting", "Budgeting"),
        Saving => ("saving", "Saving"),
        Investing => ("investing", "Investing"),
        ManagingDebt => ("managing_debt", "Managing debt"),
        RetirementPlanning => ("retirement_planning", "Retirement planning"),
    }
}

/// A complete set of survey answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyAnswers {
    pub goal: Goal,
    pub goal_custom: String,
    pub timeline: Timeline,
    pub track_spending: TrackingFrequency,
    pub overspend: OverspendCategory,
    pub overspend_custom: String,
    pub impulse: ImpulseFrequency,
    pub income_stability: IncomeStability,
    pub savings_percent: SavingsRate,
    pub emergency_fund: EmergencyFund,
    pub confidence: Confidence,
    pub topics: Vec<Topic>,
    pub wants_tips: bool,
}

impl Default for SurveyAnswers {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            goal_custom: String::new(),
            timeline: Timeline::default(),
            track_spending: TrackingFrequency::default(),
            overspend: OverspendCategory::default(),
            overspend_custom: String::new(),
            impulse: ImpulseFrequency::default(),
            income_stability: IncomeStability::default(),
            savings_percent: SavingsRate::default(),
            emergency_fund: EmergencyFund::default(),
            confidence: Confidence::default(),
            topics: Vec::new(),
            wants_tips: true,
        }
    }
}

impl SurveyAnswers {
    /// Parse answers from TOML (missing fields take their defaults)
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::InvalidData(format!("Invalid survey answers: {}", e)))
    }

    /// Goal as rendered: custom text when `Other` has some, else the label
    pub fn goal_text(&self) -> &str {
        pick_custom(self.goal == Goal::Other, &self.goal_custom, self.goal.label())
    }

    /// Overspend category as rendered, same fallback rule as the goal
    pub fn overspend_text(&self) -> &str {
        pick_custom(
            self.overspend == OverspendCategory::Other,
            &self.overspend_custom,
            self.overspend.label(),
        )
    }

    /// Phrase completing "I ___ track my spending."
    pub fn tracking_phrase(&self) -> &'static str {
        match self.track_spending {
            TrackingFrequency::Yes => "do",
            TrackingFrequency::No => "do not",
            TrackingFrequency::Sometimes => "sometimes",
        }
    }

    /// Topics joined by ", " or "not specified"
    pub fn topics_text(&self) -> String {
        if self.topics.is_empty() {
            "not specified".to_string()
        } else {
            self.topics
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

fn pick_custom<'a>(is_other: bool, custom: &'a str, label: &'a str) -> &'a str {
    if is_other && !custom.is_empty() {
        custom
    } else {
        label
    }
}

/// Every survey question with its option set, for form widgets and templates
pub fn survey_options() -> Vec<(&'static str, Vec<crate::options::OptionInfo>)> {
    vec![
        ("goal", Goal::options()),
        ("timeline", Timeline::options()),
        ("track_spending", TrackingFrequency::options()),
        ("overspend", OverspendCategory::options()),
        ("impulse", ImpulseFrequency::options()),
        ("income_stability", IncomeStability::options()),
        ("savings_percent", SavingsRate::options()),
        ("emergency_fund", EmergencyFund::options()),
        ("confidence", Confidence::options()),
        ("topics", Topic::options()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_falls_back_to_label() {
        let answers = SurveyAnswers {
            goal: Goal::Other,
            goal_custom: String::new(),
            ..Default::default()
        };
        assert_eq!(answers.goal_text(), "Other");

        let answers = SurveyAnswers {
            goal: Goal::Other,
            goal_custom: "Buy a house".to_string(),
            ..Default::default()
        };
        assert_eq!(answers.goal_text(), "Buy a house");
    }

    #[test]
    fn test_custom_text_ignored_unless_other() {
        let answers = SurveyAnswers {
            goal: Goal::Invest,
            goal_custom: "stale text".to_string(),
            overspend: OverspendCategory::Food,
            overspend_custom: "stale".to_string(),
            ..Default::default()
        };
        assert_eq!(answers.goal_text(), "Invest");
        assert_eq!(answers.overspend_text(), "Food");
    }

    #[test]
    fn test_overspend_fallback_is_independent() {
        let answers = SurveyAnswers {
            goal: Goal::Other,
            goal_custom: "Travel".to_string(),
            overspend: OverspendCategory::Other,
            overspend_custom: String::new(),
            ..Default::default()
        };
        assert_eq!(answers.goal_text(), "Travel");
        assert_eq!(answers.overspend_text(), "Other");
    }

    #[test]
    fn test_tracking_phrase() {
        let mut answers = SurveyAnswers::default();
        assert_eq!(answers.tracking_phrase(), "do");
        answers.track_spending = TrackingFrequency::No;
        assert_eq!(answers.tracking_phrase(), "do not");
        answers.track_spending = TrackingFrequency::Sometimes;
        assert_eq!(answers.tracking_phrase(), "sometimes");
    }

    #[test]
    fn test_topics_text() {
        let mut answers = SurveyAnswers::default();
        assert_eq!(answers.topics_text(), "not specified");
        answers.topics = vec![Topic::Budgeting, Topic::RetirementPlanning];
        assert_eq!(answers.topics_text(), "Budgeting, Retirement planning");
    }

    #[test]
    fn test_parse_labels_with_typographic_characters() {
        assert_eq!(
            "3–6 months".parse::<Timeline>().unwrap(),
            Timeline::ThreeToSixMonths
        );
        assert_eq!(
            "I don’t save currently".parse::<SavingsRate>().unwrap(),
            SavingsRate::NotSaving
        );
        assert_eq!(
            "working_on_it".parse::<EmergencyFund>().unwrap(),
            EmergencyFund::WorkingOnIt
        );
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let answers = SurveyAnswers::from_toml(
            r#"
goal = "other"
goal_custom = "Start a business"
track_spending = "Sometimes"
topics = ["investing", "Saving"]
"#,
        )
        .unwrap();

        assert_eq!(answers.goal, Goal::Other);
        assert_eq!(answers.goal_text(), "Start a business");
        assert_eq!(answers.track_spending, TrackingFrequency::Sometimes);
        assert_eq!(answers.topics, vec![Topic::Investing, Topic::Saving]);
        assert_eq!(answers.timeline, Timeline::UnderThreeMonths);
        assert!(answers.wants_tips);
    }

    #[test]
    fn test_from_toml_rejects_unknown_option() {
        let result = SurveyAnswers::from_toml(r#"goal = "retire early""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_round_trip_uses_ids() {
        let answers = SurveyAnswers {
            savings_percent: SavingsRate::TwentyToThirty,
            ..Default::default()
        };
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json["savings_percent"], "20_to_30");

        let back: SurveyAnswers = serde_json::from_value(json).unwrap();
        assert_eq!(back, answers);
    }

    #[test]
    fn test_survey_options_cover_all_questions() {
        let options = survey_options();
        assert_eq!(options.len(), 10);
        let (name, savings) = &options[6];
        assert_eq!(*name, "savings_percent");
        assert_eq!(savings.len(), 5);
    }
}
