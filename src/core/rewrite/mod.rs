//! Holistic Rewrite
//!
//! The rewrite model is an opaque, possibly slow collaborator behind
//! [`RewriteService`]. Its output has no span information and no relation to
//! the issue model.

pub mod huggingface;
pub mod ollama;

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::config::{RewriteConfig, RewriteProvider};
use crate::core::error::{CheckError, CheckResult};

pub use huggingface::HuggingFaceRewriter;
pub use ollama::OllamaRewriter;

/// Generative model producing a corrected version of a whole text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RewriteService: Send + Sync {
    /// Generate a corrected rewrite no longer than `max_length` units of the
    /// model's own measure (tokens for most backends).
    async fn generate(&self, text: &str, max_length: usize) -> CheckResult<String>;
}

/// Runs the rewrite model with the configured length bound.
pub struct RewriteGenerator {
    service: Arc<dyn RewriteService>,
    max_length: usize,
}

impl RewriteGenerator {
    pub fn new(service: Arc<dyn RewriteService>, max_length: usize) -> Self {
        Self {
            service,
            max_length,
        }
    }

    /// Build the configured backend.
    pub fn from_config(config: &RewriteConfig) -> CheckResult<Self> {
        let service: Arc<dyn RewriteService> = match config.provider {
            RewriteProvider::HuggingFace => Arc::new(HuggingFaceRewriter::from_config(config)?),
            RewriteProvider::Ollama => Arc::new(OllamaRewriter::from_config(config)?),
        };
        log::info!(
            "Rewrite model: {:?} {} (max length {})",
            config.provider,
            config.model,
            config.max_length
        );
        Ok(Self::new(service, config.max_length))
    }

    /// Rewrite `text`. Surrounding whitespace is trimmed; an empty result is
    /// treated as a service failure.
    pub async fn rewrite(&self, text: &str) -> CheckResult<String> {
        let start = std::time::Instant::now();
        let generated = self.service.generate(text, self.max_length).await?;
        let corrected = generated.trim();

        if corrected.is_empty() {
            return Err(CheckError::unavailable("rewrite", "model returned empty output"));
        }

        log::debug!("Rewrite finished in {}ms", start.elapsed().as_millis());
        Ok(corrected.to_string())
    }
}
