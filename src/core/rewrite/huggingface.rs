//! Hugging Face Inference Rewriter
//!
//! Runs a text2text grammar correction model (T5 family) through the Hugging
//! Face Inference API or a compatible self-hosted endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::RewriteService;
use crate::config::RewriteConfig;
use crate::core::error::{CheckError, CheckResult};

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
const SERVICE: &str = "rewrite";

/// Hugging Face text2text-generation client.
pub struct HuggingFaceRewriter {
    base_url: String,
    model: String,
    api_token: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

impl HuggingFaceRewriter {
    pub fn new(model: impl Into<String>, api_token: Option<String>) -> CheckResult<Self> {
        Self::with_base_url(HF_INFERENCE_URL, model, api_token, Duration::from_secs(120))
    }

    pub fn from_config(config: &RewriteConfig) -> CheckResult<Self> {
        Self::with_base_url(
            config.base_url.as_deref().unwrap_or(HF_INFERENCE_URL),
            config.model.clone(),
            config.api_token(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Point the client at a custom endpoint (self-hosted inference or tests).
    pub fn with_base_url(
        base_url: &str,
        model: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> CheckResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_token,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl RewriteService for HuggingFaceRewriter {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn generate(&self, text: &str, max_length: usize) -> CheckResult<String> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": max_length,
                "clean_up_tokenization_spaces": true,
            },
            "options": { "wait_for_model": true },
        });

        let mut request = self.client.post(self.model_url()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CheckError::unavailable(
                SERVICE,
                format!("{} returned {}: {}", self.model, status.as_u16(), text),
            ));
        }

        let generations: Vec<Generation> = resp
            .json()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, format!("invalid response: {e}")))?;

        generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| CheckError::unavailable(SERVICE, "no generation in response"))
    }
}
