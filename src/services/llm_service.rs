use async_trait::async_trait;

use crate::models::llm::LlmError;

/// Text in, text out. Implementations must not retain the document after
/// the call returns.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, document: &str) -> Result<String, LlmError>;

    /// Cheap reachability probe for the health endpoint.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when the model is switched off in configuration. Every
/// call fails with `NotConfigured` so callers see one consistent error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _document: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }

    async fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_generator_reports_not_configured() {
        let result = DisabledGenerator.generate("anything").await;
        assert!(matches!(result, Err(LlmError::NotConfigured)));
        assert!(!DisabledGenerator.is_available().await);
    }
}
