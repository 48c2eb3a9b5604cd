//! Check Pipeline
//!
//! Orchestrates one check request:
//! 1. Reject blank input
//! 2. Run the spelling and grammar detectors concurrently and join them
//! 3. Merge their issues into one sorted set
//! 4. Annotate the original text
//! 5. Produce the holistic rewrite (independent branch, runs alongside 2-4)
//!
//! The pipeline owns the service objects. Build it once with
//! [`CheckPipeline::from_config`] and share it; it holds no per-request state.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use super::annotate::Annotator;
use super::error::{CheckError, CheckResult};
use super::grammar::{GrammarIssueDetector, LanguageToolClient};
use super::issue::{Issue, IssueKind, IssueSet};
use super::merge::merge;
use super::rewrite::RewriteGenerator;
use super::spelling::paths::ENGLISH_DICT_FILENAME;
use super::spelling::{SpellIssueDetector, SymSpellDictionary};
use crate::config::AppConfig;

/// Complete check pipeline.
pub struct CheckPipeline {
    spelling: Option<SpellIssueDetector>,
    grammar: Option<GrammarIssueDetector>,
    rewriter: Option<RewriteGenerator>,
    annotator: Annotator,
}

/// Merged detector output for one text.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub issues: IssueSet,
    /// Detectors that failed and were skipped
    pub degraded: Vec<String>,
}

/// Result of checking one submission.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Text as submitted
    pub original: String,
    /// Holistic rewrite; `None` when rewriting is disabled
    pub corrected_text: Option<String>,
    /// Original text with every issue marked inline
    pub annotated_html: String,
    pub issues: IssueSet,
    /// Detectors that failed and were skipped
    pub degraded: Vec<String>,
}

/// Display row for one detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub kind: IssueKind,
    pub message: String,
    /// All replacements joined, or `"None"`
    pub suggestions: String,
    /// Flagged text, empty when the span does not fit the text
    pub snippet: String,
}

impl CheckPipeline {
    /// Create a pipeline from explicit components.
    pub fn new(
        spelling: Option<SpellIssueDetector>,
        grammar: Option<GrammarIssueDetector>,
        rewriter: Option<RewriteGenerator>,
        annotator: Annotator,
    ) -> Self {
        Self {
            spelling,
            grammar,
            rewriter,
            annotator,
        }
    }

    /// Build every enabled service described by the configuration.
    ///
    /// Without an explicit dictionary path, the data directory is tried before
    /// the usual locations. Loading the dictionary dominates start-up time.
    pub fn from_config(config: &AppConfig) -> CheckResult<Self> {
        let spelling = if config.spelling.enabled {
            let mut spelling_config = config.spelling.clone();
            if spelling_config.dictionary_path.is_none() {
                let in_data_dir = config.data_dir().join(ENGLISH_DICT_FILENAME);
                if in_data_dir.is_file() {
                    spelling_config.dictionary_path = Some(in_data_dir);
                }
            }
            let dictionary = SymSpellDictionary::from_config(&spelling_config)?;
            Some(SpellIssueDetector::new(Arc::new(dictionary), &spelling_config))
        } else {
            None
        };

        let grammar = if config.grammar.enabled {
            let client = LanguageToolClient::from_config(&config.grammar)?;
            Some(GrammarIssueDetector::new(Arc::new(client)))
        } else {
            None
        };

        let rewriter = if config.rewrite.enabled {
            Some(RewriteGenerator::from_config(&config.rewrite)?)
        } else {
            None
        };

        Ok(Self::new(
            spelling,
            grammar,
            rewriter,
            Annotator::new(config.annotation.clone()),
        ))
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Check a submission end to end.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn check(&self, text: &str) -> CheckResult<CheckReport> {
        ensure_not_blank(text)?;

        let start = std::time::Instant::now();
        let (detection, corrected_text) = tokio::join!(self.detect(text), self.rewrite(text));
        let detection = detection?;
        let corrected_text = corrected_text?;

        let annotated_html = self.annotator.annotate(text, detection.issues.as_slice());

        log::info!(
            "Checked {} chars: {} issues ({} spelling, {} grammar) in {}ms",
            text.chars().count(),
            detection.issues.len(),
            detection.issues.count_of(IssueKind::Spelling),
            detection.issues.count_of(IssueKind::Grammar),
            start.elapsed().as_millis()
        );

        Ok(CheckReport {
            original: text.to_string(),
            corrected_text,
            annotated_html,
            issues: detection.issues,
            degraded: detection.degraded,
        })
    }

    /// Run the enabled detectors and merge their issues.
    ///
    /// A failing detector is logged and listed in [`Detection::degraded`]; the
    /// request only fails when every enabled detector failed.
    pub async fn detect(&self, text: &str) -> CheckResult<Detection> {
        let grammar = async {
            match &self.grammar {
                Some(detector) => Some(detector.detect(text).await),
                None => None,
            }
        };
        let spelling = async { self.spelling.as_ref().map(|detector| detector.detect(text)) };

        let (grammar, spelling) = tokio::join!(grammar, spelling);

        let mut succeeded = spelling.is_some();
        let spelling_issues = spelling.unwrap_or_default();

        let mut degraded = Vec::new();
        let grammar_issues = match grammar {
            Some(Ok(issues)) => {
                succeeded = true;
                issues
            }
            Some(Err(err)) => {
                log::warn!("Grammar detector failed, continuing without it: {err}");
                if !succeeded {
                    return Err(err);
                }
                degraded.push("grammar".to_string());
                Vec::new()
            }
            None => Vec::new(),
        };

        if !succeeded {
            log::debug!("No detectors enabled");
        }

        Ok(Detection {
            issues: merge(spelling_issues, grammar_issues),
            degraded,
        })
    }

    async fn rewrite(&self, text: &str) -> CheckResult<Option<String>> {
        match &self.rewriter {
            Some(rewriter) => rewriter.rewrite(text).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Reject blank or whitespace-only submissions.
///
/// Cheap enough to call before the services are built, so a blank submission
/// never loads the dictionary or opens a connection.
pub fn ensure_not_blank(text: &str) -> CheckResult<()> {
    if text.trim().is_empty() {
        log::warn!("Rejected blank submission");
        return Err(CheckError::EmptyInput);
    }
    Ok(())
}

impl CheckReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// One display row per issue, in text order.
    pub fn summaries(&self) -> Vec<IssueSummary> {
        self.issues
            .iter()
            .map(|issue| IssueSummary::new(issue, &self.original))
            .collect()
    }
}

impl IssueSummary {
    pub fn new(issue: &Issue, text: &str) -> Self {
        Self {
            kind: issue.kind,
            message: issue.message.clone(),
            suggestions: issue
                .suggestions(usize::MAX)
                .unwrap_or_else(|| "None".to_string()),
            snippet: issue.snippet(text).unwrap_or_default().to_string(),
        }
    }
}
