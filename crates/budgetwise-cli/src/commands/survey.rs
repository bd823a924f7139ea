//! Survey template command

use anyhow::Result;
use budgetwise_core::survey::survey_options;
use budgetwise_core::SurveyAnswers;

/// Print a survey answers file listing every option
pub fn cmd_survey_template() -> Result<()> {
    print!("{}", survey_template());
    Ok(())
}

/// A TOML survey file holding the default answers, with the valid options
/// for each question in comments
pub fn survey_template() -> String {
    let defaults = SurveyAnswers::default();
    let mut out = String::new();

    out.push_str("# Budgetwise survey answers\n");
    out.push_str("# Each answer accepts the option id or its label.\n\n");

    for (field, options) in survey_options() {
        let listed = options
            .iter()
            .map(|o| format!("{} ({})", o.id, o.label))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("# Options: {}\n", listed));

        let value = match field {
            "goal" => format!("\"{}\"", defaults.goal.id()),
            "timeline" => format!("\"{}\"", defaults.timeline.id()),
            "track_spending" => format!("\"{}\"", defaults.track_spending.id()),
            "overspend" => format!("\"{}\"", defaults.overspend.id()),
            "impulse" => format!("\"{}\"", defaults.impulse.id()),
            "income_stability" => format!("\"{}\"", defaults.income_stability.id()),
            "savings_percent" => format!("\"{}\"", defaults.savings_percent.id()),
            "emergency_fund" => format!("\"{}\"", defaults.emergency_fund.id()),
            "confidence" => format!("\"{}\"", defaults.confidence.id()),
            // Any subset, e.g. ["budgeting", "saving"]
            _ => "[]".to_string(),
        };
        out.push_str(&format!("{} = {}\n", field, value));

        match field {
            "goal" => out.push_str("# Used when goal is \"other\"\ngoal_custom = \"\"\n"),
            "overspend" => {
                out.push_str("# Used when overspend is \"other\"\noverspend_custom = \"\"\n")
            }
            _ => {}
        }
        out.push('\n');
    }

    out.push_str("# Whether you would like educational tips\n");
    out.push_str(&format!("wants_tips = {}\n", defaults.wants_tips));
    out
}
