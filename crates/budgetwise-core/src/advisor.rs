//! Advisor: compile the prompt and ask the provider
//!
//! This is the only step with an external side effect. Compilation happens
//! up front, so a failed provider call still leaves the caller with the
//! summary and prompt.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::ai::{AIClient, AdviceBackend};
use crate::compile::{CompiledPrompt, PromptCompiler};
use crate::error::Result;
use crate::models::Ledger;
use crate::survey::SurveyAnswers;

/// Advice returned by the provider, with what produced it
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub summary: String,
    pub prompt: String,
    /// Free-form (usually markdown) advice text
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Advisor {
    client: AIClient,
    compiler: PromptCompiler,
}

impl Advisor {
    /// Advisor using the built-in templates
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            compiler: PromptCompiler::embedded(),
        }
    }

    pub fn with_compiler(client: AIClient, compiler: PromptCompiler) -> Self {
        Self { client, compiler }
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    pub fn compiler(&self) -> &PromptCompiler {
        &self.compiler
    }

    /// Compile without calling the provider
    pub fn compile(&self, ledger: &Ledger, survey: &SurveyAnswers) -> CompiledPrompt {
        self.compiler
            .compile(ledger.income, &ledger.expenses, survey)
    }

    /// Compile and request advice
    pub async fn advise(&self, ledger: &Ledger, survey: &SurveyAnswers) -> Result<Advice> {
        let compiled = self.compile(ledger, survey);
        self.request(compiled).await
    }

    /// Request advice for an already compiled prompt
    pub async fn request(&self, compiled: CompiledPrompt) -> Result<Advice> {
        info!(
            model = self.client.model(),
            prompt_chars = compiled.prompt.len(),
            "Requesting budget advice"
        );

        let text = self.client.generate_advice(&compiled.prompt).await?;

        Ok(Advice {
            summary: compiled.summary,
            prompt: compiled.prompt,
            text,
            model: self.client.model().to_string(),
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::ExpenseMapping;

    fn ledger() -> Ledger {
        Ledger {
            income: 2000.0,
            expenses: ExpenseMapping::from_iter([("Food".to_string(), 100.0)]),
        }
    }

    #[tokio::test]
    async fn test_advise_carries_compiled_prompt() {
        let advisor = Advisor::new(AIClient::Mock(MockBackend::with_reply("Cook at home.")));
        let advice = advisor
            .advise(&ledger(), &SurveyAnswers::default())
            .await
            .unwrap();

        assert_eq!(advice.text, "Cook at home.");
        assert_eq!(advice.model, "mock");
        assert!(advice.prompt.contains("- My expenses: Food 100"));
        assert!(advice.prompt.contains(&advice.summary));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let advisor = Advisor::new(AIClient::Mock(MockBackend::failing()));
        let result = advisor.advise(&ledger(), &SurveyAnswers::default()).await;
        assert!(matches!(result, Err(crate::Error::Provider(_))));
    }
}
