use serde::Serialize;
use serde_json::{Map, Value};

/// Raw model text plus whatever structure could be pulled out of it.
///
/// `structured` being `None` is not a failure: the model is only asked, never
/// forced, to emit JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub text: String,
    pub structured: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub patient_id: String,
    pub analysis_text: String,
    pub structured: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub patient_id: String,
    pub evaluation: EvaluationResult,
    pub recommendations: EvaluationResult,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub record_id: uuid::Uuid,
    pub date: chrono::DateTime<chrono::Utc>,
    pub insight: String,
}
