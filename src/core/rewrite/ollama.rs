//! Ollama Rewriter
//!
//! Uses a local Ollama model with a correction prompt instead of a dedicated
//! text2text grammar model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::RewriteService;
use crate::config::{RewriteConfig, DEFAULT_HF_MODEL};
use crate::core::error::{CheckError, CheckResult};

const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const SERVICE: &str = "rewrite";

const CORRECTION_PROMPT: &str = "You are a proofreader. Rewrite the user's text with all \
spelling and grammar mistakes corrected. Keep the meaning and tone. Reply with the \
corrected text only, without quotes or commentary.";

/// Ollama `/api/generate` client.
pub struct OllamaRewriter {
    host: String,
    model: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaRewriter {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> CheckResult<Self> {
        Self::with_timeout(host, model, Duration::from_secs(120))
    }

    /// Convenience constructor for the default local daemon.
    pub fn localhost(model: impl Into<String>) -> CheckResult<Self> {
        Self::new(DEFAULT_OLLAMA_HOST, model)
    }

    /// The shared default model id names a Hugging Face model, so it is
    /// replaced by a local default here.
    pub fn from_config(config: &RewriteConfig) -> CheckResult<Self> {
        let model = if config.model.is_empty() || config.model == DEFAULT_HF_MODEL {
            DEFAULT_OLLAMA_MODEL
        } else {
            config.model.as_str()
        };
        Self::with_timeout(
            config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_HOST),
            model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn with_timeout(
        host: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> CheckResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl RewriteService for OllamaRewriter {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn generate(&self, text: &str, max_length: usize) -> CheckResult<String> {
        let body = serde_json::json!({
            "model": self.model,
            "system": CORRECTION_PROMPT,
            "prompt": text,
            "stream": false,
            "options": {
                "num_predict": max_length,
                "temperature": 0.0,
            },
        });

        let resp = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&body)
            .send()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CheckError::unavailable(
                SERVICE,
                format!("Ollama returned {}: {}", status.as_u16(), text),
            ));
        }

        let generated: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, format!("invalid response: {e}")))?;

        Ok(generated.response)
    }
}
