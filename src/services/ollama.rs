use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::llm::LlmSettings;
use crate::models::llm::LlmError;
use crate::services::llm_service::TextGenerator;

/// Ollama `/api/generate` client, non-streaming.
#[derive(Clone)]
pub struct Ollama {
    client: Client,
    request_timeout: Duration,
    model_name: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl Ollama {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: Client::new(),
            request_timeout: settings.timeout(),
            model_name: settings.model_name.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        let response = match self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Ollama health check failed with status: {}", response.status());
            return false;
        }

        let tags: serde_json::Value = match response.json().await {
            Ok(tags) => tags,
            Err(_) => {
                tracing::warn!("Ollama health check: failed to parse response");
                return false;
            }
        };

        let Some(models) = tags["models"].as_array() else {
            tracing::warn!("Ollama health check: unexpected response format");
            return false;
        };

        let model_exists = models
            .iter()
            .any(|model| model["name"].as_str() == Some(self.model_name.as_str()));

        if model_exists {
            tracing::info!("Ollama health check passed - model '{}' is available", self.model_name);
        } else {
            tracing::warn!("Ollama is running but model '{}' is not available", self.model_name);
        }
        model_exists
    }
}

#[async_trait]
impl TextGenerator for Ollama {
    async fn generate(&self, document: &str) -> Result<String, LlmError> {
        tracing::info!("Using Ollama model: {}", self.model_name);

        let request = json!({
            "model": self.model_name,
            "prompt": document,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_predict": self.max_tokens,
            }
        });

        let response = self.client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::error!("Ollama API error {}: {}", status, error_text);

            return Err(match status.as_u16() {
                404 => LlmError::InvalidResponse(format!("Model not found: {}", error_text)),
                429 => LlmError::RateLimited,
                500..=599 => LlmError::ServiceUnavailable(error_text),
                _ => LlmError::InvalidResponse(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::InvalidResponse(e.to_string())
            }
        })?;

        let content = body["response"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("No response content".to_string()))?;

        if content.trim().is_empty() {
            return Err(LlmError::InvalidResponse("Empty content".to_string()));
        }

        tracing::debug!("Ollama returned {} bytes", content.len());
        Ok(content.to_string())
    }

    async fn is_available(&self) -> bool {
        self.health_check().await
    }
}
