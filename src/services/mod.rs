pub mod aggregation;
pub mod device_client;
pub mod evaluation_service;
pub mod llm_service;
pub mod ollama;
pub mod patient_document;
pub mod prompts;
pub mod record_merge;

pub use device_client::{HttpTelemetrySource, TelemetrySource};
pub use evaluation_service::EvaluationOrchestrator;
pub use llm_service::{DisabledGenerator, TextGenerator};
pub use ollama::Ollama;
pub use record_merge::RecordMergeService;
