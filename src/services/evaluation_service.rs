use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::models::daily_record::DailyRecord;
use crate::models::evaluation::EvaluationResult;
use crate::models::llm::LlmError;
use crate::models::user::BaselineProfile;
use crate::services::llm_service::TextGenerator;
use crate::services::{patient_document, prompts};
use crate::utils::result_extractor::extract_json_object;

/// Result of one model round trip. `Failed` carries the error-shaped text
/// that is reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome<T> {
    Generated(T),
    Failed { message: String },
}

impl<T> GenerationOutcome<T> {
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            GenerationOutcome::Generated(value) => Ok(value),
            GenerationOutcome::Failed { message } => Err(AppError::GenerationFailed(message)),
        }
    }
}

/// A completed general evaluation. Only `EvaluationOrchestrator::evaluate`
/// constructs one, so a recommendation always follows a real evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    result: EvaluationResult,
}

impl Evaluation {
    pub fn text(&self) -> &str {
        &self.result.text
    }

    pub fn result(&self) -> &EvaluationResult {
        &self.result
    }

    pub fn into_result(self) -> EvaluationResult {
        self.result
    }
}

fn failure_message(operation: &str, error: &LlmError) -> String {
    match error {
        LlmError::NotConfigured => "Error: AI model not configured".to_string(),
        other => format!("Error: {} failed - {}", operation, other),
    }
}

#[derive(Clone)]
pub struct EvaluationOrchestrator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl EvaluationOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn model_available(&self) -> bool {
        self.generator.is_available().await
    }

    async fn generate(&self, operation: &str, prompt: &str) -> GenerationOutcome<String> {
        let result = match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout),
        };

        match result {
            Ok(text) => GenerationOutcome::Generated(text.trim().to_string()),
            Err(e) => {
                tracing::error!("{} failed: {}", operation, e);
                GenerationOutcome::Failed {
                    message: failure_message(operation, &e),
                }
            }
        }
    }

    async fn generate_structured(&self, operation: &str, prompt: &str) -> GenerationOutcome<EvaluationResult> {
        match self.generate(operation, prompt).await {
            GenerationOutcome::Generated(text) => {
                let structured = extract_json_object(&text);
                if structured.is_none() {
                    tracing::info!("{}: no structured object in model output, returning text only", operation);
                }
                GenerationOutcome::Generated(EvaluationResult { text, structured })
            }
            GenerationOutcome::Failed { message } => GenerationOutcome::Failed { message },
        }
    }

    /// General wellbeing evaluation over the most recent records.
    #[tracing::instrument(name = "Evaluate patient", skip_all, fields(patient_id = %profile.id))]
    pub async fn evaluate(
        &self,
        profile: &BaselineProfile,
        records: &[DailyRecord],
    ) -> GenerationOutcome<Evaluation> {
        let document = patient_document::render(profile, records);
        let prompt = prompts::render(prompts::EVALUATION, &document);
        match self.generate_structured("AI analysis", &prompt).await {
            GenerationOutcome::Generated(result) => GenerationOutcome::Generated(Evaluation { result }),
            GenerationOutcome::Failed { message } => GenerationOutcome::Failed { message },
        }
    }

    /// Lifestyle recommendations chained off a completed evaluation.
    #[tracing::instrument(name = "Recommend for patient", skip_all, fields(patient_id = %profile.id))]
    pub async fn recommend(
        &self,
        profile: &BaselineProfile,
        records: &[DailyRecord],
        evaluation: &Evaluation,
    ) -> GenerationOutcome<EvaluationResult> {
        let document = patient_document::render(profile, records);
        let prompt = prompts::render_recommendation(evaluation.text(), &document);
        self.generate_structured("Recommendation generation", &prompt).await
    }

    #[tracing::instrument(name = "Disease risk for patient", skip_all, fields(patient_id = %profile.id))]
    pub async fn disease_risk(
        &self,
        profile: &BaselineProfile,
        records: &[DailyRecord],
    ) -> GenerationOutcome<EvaluationResult> {
        let document = patient_document::render(profile, records);
        let prompt = prompts::render(prompts::DISEASE_RISK, &document);
        self.generate_structured("Disease-specific analysis", &prompt).await
    }

    /// Short free-text insight on a single record.
    pub async fn quick_insight(&self, record: &DailyRecord) -> GenerationOutcome<String> {
        let prompt = prompts::render(prompts::QUICK_INSIGHT, &patient_document::render_latest(record));
        self.generate("Quick insight", &prompt).await
    }
}
