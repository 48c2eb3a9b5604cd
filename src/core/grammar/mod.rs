//! Grammar Checking
//!
//! The rule engine is an external collaborator behind [`GrammarService`];
//! [`GrammarIssueDetector`] wraps its hits into grammar [`Issue`]s. Offsets from
//! the engine are trusted; the annotator skips spans that do not fit the text.

pub mod languagetool;

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::core::error::CheckResult;
use crate::core::issue::{Issue, IssueKind};

pub use languagetool::LanguageToolClient;

/// One finding reported by the grammar engine. Offsets are chars of the
/// checked text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarHit {
    pub offset: usize,
    pub length: usize,
    pub message: String,
    #[serde(default)]
    pub replacements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl GrammarHit {
    pub fn new(offset: usize, length: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            message: message.into(),
            replacements: Vec::new(),
            rule_id: None,
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<String>) -> Self {
        self.replacements = replacements;
        self
    }
}

/// Rule-based grammar engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GrammarService: Send + Sync {
    /// Check `text`, returning every hit in engine order.
    async fn check(&self, text: &str) -> CheckResult<Vec<GrammarHit>>;
}

/// Adapts grammar engine hits to the common issue shape.
pub struct GrammarIssueDetector {
    service: Arc<dyn GrammarService>,
}

impl GrammarIssueDetector {
    pub fn new(service: Arc<dyn GrammarService>) -> Self {
        Self { service }
    }

    /// Run the engine once and wrap each hit as a [`IssueKind::Grammar`] issue.
    pub async fn detect(&self, text: &str) -> CheckResult<Vec<Issue>> {
        let hits = self.service.check(text).await?;
        log::debug!("Grammar engine reported {} hits", hits.len());

        Ok(hits.into_iter().map(Issue::from).collect())
    }
}

impl From<GrammarHit> for Issue {
    fn from(hit: GrammarHit) -> Self {
        let issue = Issue::new(hit.offset, hit.length, IssueKind::Grammar, hit.message)
            .with_replacements(hit.replacements);
        match hit.rule_id {
            Some(rule_id) => issue.with_rule_id(rule_id),
            None => issue,
        }
    }
}
