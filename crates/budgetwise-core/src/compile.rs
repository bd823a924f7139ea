//! Prompt compiler
//!
//! Turns income, the canonical expense mapping and the survey answers into a
//! human-readable summary paragraph plus the advice request. Compilation is
//! pure and cannot fail; template problems surface when a [`PromptCompiler`]
//! is built from a [`PromptLibrary`].

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::Result;
use crate::models::{format_amount, ExpenseMapping};
use crate::prompts::{render_template, PromptId, PromptLibrary};
use crate::survey::SurveyAnswers;

/// Compiler output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPrompt {
    /// Survey answers restated in first person
    pub summary: String,
    /// Full request for the advice provider
    pub prompt: String,
}

/// Holds the two templates a compilation needs
#[derive(Debug, Clone)]
pub struct PromptCompiler {
    summary_template: String,
    advice_template: String,
}

impl PromptCompiler {
    /// Compiler using the templates built into the binary
    pub fn embedded() -> Self {
        Self {
            summary_template: PromptId::SurveySummary.embedded().content,
            advice_template: PromptId::BudgetAdvice.embedded().content,
        }
    }

    /// Compiler using the library's templates (overrides win)
    pub fn from_library(library: &mut PromptLibrary) -> Result<Self> {
        let summary_template = library.get(PromptId::SurveySummary)?.content.clone();
        let advice_template = library.get(PromptId::BudgetAdvice)?.content.clone();
        Ok(Self {
            summary_template,
            advice_template,
        })
    }

    /// Render the survey summary paragraph
    pub fn summarize(&self, survey: &SurveyAnswers) -> String {
        let impulse = survey.impulse.label().to_lowercase();
        let income_stability = survey.income_stability.label().to_lowercase();
        let topics = survey.topics_text();

        let vars: HashMap<&str, &str> = HashMap::from([
            ("goal", survey.goal_text()),
            ("timeline", survey.timeline.label()),
            ("tracking", survey.tracking_phrase()),
            ("overspend", survey.overspend_text()),
            ("impulse", impulse.as_str()),
            ("income_stability", income_stability.as_str()),
            ("savings_percent", survey.savings_percent.label()),
            ("emergency_fund", survey.emergency_fund.label()),
            ("confidence", survey.confidence.label()),
            ("topics", topics.as_str()),
        ]);

        render_template(&self.summary_template, &vars)
    }

    /// Compile the summary and the advice request
    pub fn compile(
        &self,
        income: f64,
        expenses: &ExpenseMapping,
        survey: &SurveyAnswers,
    ) -> CompiledPrompt {
        let summary = self.summarize(survey);
        let income = format_amount(income);
        let flattened = expenses.flatten();

        let vars: HashMap<&str, &str> = HashMap::from([
            ("income", income.as_str()),
            ("expenses", flattened.as_str()),
            ("summary", summary.as_str()),
        ]);
        let prompt = render_template(&self.advice_template, &vars);

        CompiledPrompt { summary, prompt }
    }
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Compile with the built-in templates
pub fn compile(income: f64, expenses: &ExpenseMapping, survey: &SurveyAnswers) -> CompiledPrompt {
    static EMBEDDED: OnceLock<PromptCompiler> = OnceLock::new();
    EMBEDDED
        .get_or_init(PromptCompiler::embedded)
        .compile(income, expenses, survey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{
        Confidence, EmergencyFund, Goal, ImpulseFrequency, IncomeStability, OverspendCategory,
        SavingsRate, Timeline, Topic, TrackingFrequency,
    };

    fn mapping(items: &[(&str, f64)]) -> ExpenseMapping {
        items.iter().map(|(l, a)| (l.to_string(), *a)).collect()
    }

    #[test]
    fn test_other_goal_without_text_renders_label() {
        let survey = SurveyAnswers {
            goal: Goal::Other,
            goal_custom: String::new(),
            ..Default::default()
        };

        let compiled = compile(1000.0, &ExpenseMapping::default(), &survey);
        assert!(compiled.summary.contains("My goal is: Other."));
    }

    #[test]
    fn test_sometimes_tracking_phrase() {
        let survey = SurveyAnswers {
            track_spending: TrackingFrequency::Sometimes,
            ..Default::default()
        };

        let compiled = compile(1000.0, &ExpenseMapping::default(), &survey);
        assert!(compiled.summary.contains("I sometimes track my spending."));
    }

    #[test]
    fn test_full_summary() {
        let survey = SurveyAnswers {
            goal: Goal::PayOffDebt,
            timeline: Timeline::SixToTwelveMonths,
            track_spending: TrackingFrequency::No,
            overspend: OverspendCategory::Other,
            overspend_custom: "Coffee".to_string(),
            impulse: ImpulseFrequency::Occasionally,
            income_stability: IncomeStability::SomewhatVariable,
            savings_percent: SavingsRate::NotSaving,
            emergency_fund: EmergencyFund::WorkingOnIt,
            confidence: Confidence::NotConfident,
            topics: vec![Topic::Budgeting, Topic::ManagingDebt],
            ..Default::default()
        };

        let summary = PromptCompiler::embedded().summarize(&survey);
        let expected = "My goal is: Pay off debt.\n\
I want to achieve this goal in: 6–12 months.\n\
I do not track my spending.\n\
I tend to overspend on: Coffee.\n\
I impulse buy: occasionally.\n\
My income is: somewhat variable.\n\
I save about: I don’t save currently of my income.\n\
Emergency fund status: I’m working on it.\n\
Confidence in managing money: Not confident.\n\
I want to learn about: Budgeting, Managing debt.";
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_prompt_embeds_income_expenses_and_summary_twice() {
        let expenses = mapping(&[("Rent", 1000.0), ("Food", 250.0)]);
        let compiled = compile(3000.0, &expenses, &SurveyAnswers::default());

        assert!(compiled
            .prompt
            .starts_with("I'm building a monthly budget and would like financial advice."));
        assert!(compiled.prompt.contains("- My monthly income: $3000\n"));
        assert!(compiled.prompt.contains("- My expenses: Food 250, Rent 1000\n"));
        assert_eq!(compiled.prompt.matches(&compiled.summary).count(), 2);
        assert!(compiled.prompt.contains("1. A brief financial summary"));
        assert!(compiled.prompt.contains("3. A final motivational or educational tip"));
        assert!(compiled
            .prompt
            .ends_with("Keep the advice clear and easy to scan — avoid long paragraphs."));
    }

    #[test]
    fn test_empty_expenses_render_empty_list() {
        let compiled = compile(0.0, &ExpenseMapping::default(), &SurveyAnswers::default());
        assert!(compiled.prompt.contains("- My expenses: \n"));
        assert!(compiled.prompt.contains("- My monthly income: $0\n"));
    }

    #[test]
    fn test_custom_text_is_not_reexpanded() {
        let survey = SurveyAnswers {
            goal: Goal::Other,
            goal_custom: "Hit {{income}}".to_string(),
            ..Default::default()
        };

        let compiled = compile(5000.0, &ExpenseMapping::default(), &survey);
        assert!(compiled.summary.contains("My goal is: Hit {{income}}."));
        assert!(compiled.prompt.contains("My goal is: Hit {{income}}."));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let expenses = mapping(&[("Gym", 40.0), ("Food", 100.0)]);
        let survey = SurveyAnswers {
            topics: vec![Topic::Investing],
            ..Default::default()
        };

        let first = compile(2000.0, &expenses, &survey);
        let second = compile(2000.0, &expenses, &survey);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fractional_amounts_are_not_rounded() {
        let expenses = mapping(&[("Food", 120.456)]);
        let compiled = compile(2500.75, &expenses, &SurveyAnswers::default());
        assert!(compiled.prompt.contains("$2500.75"));
        assert!(compiled.prompt.contains("Food 120.456"));
    }
}
