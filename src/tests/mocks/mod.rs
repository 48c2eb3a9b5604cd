//! Service fakes
//!
//! mockall mocks (`MockGrammarService`, `MockRewriteService`,
//! `MockDictionaryService`) live next to their traits. These fakes cover the
//! cases where a fixed answer plus a call counter reads better than an
//! expectation list.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AnnotationConfig, SpellingConfig};
use crate::core::annotate::Annotator;
use crate::core::error::{CheckError, CheckResult};
use crate::core::grammar::{GrammarHit, GrammarIssueDetector, GrammarService};
use crate::core::pipeline::CheckPipeline;
use crate::core::rewrite::{RewriteGenerator, RewriteService};
use crate::core::spelling::{SpellIssueDetector, SymSpellDictionary};

/// Small vocabulary covering the sample sentences used across the suites.
pub const VOCABULARY: &[&str] = &[
    "i", "have", "has", "a", "an", "apple", "the", "cat", "sits", "on", "mat", "there", "is",
    "are", "two", "cats", "dog", "runs", "fast", "this", "sentence", "fine", "hello", "world",
];

/// Grammar engine returning the same hits for every text.
pub struct FixedGrammar {
    hits: Vec<GrammarHit>,
    calls: AtomicUsize,
}

impl FixedGrammar {
    pub fn new(hits: Vec<GrammarHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrammarService for FixedGrammar {
    async fn check(&self, _text: &str) -> CheckResult<Vec<GrammarHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }
}

/// Grammar engine that is always down.
pub struct DownGrammar;

#[async_trait]
impl GrammarService for DownGrammar {
    async fn check(&self, _text: &str) -> CheckResult<Vec<GrammarHit>> {
        Err(CheckError::unavailable("grammar", "connection refused"))
    }
}

/// Rewrite model returning a fixed correction.
pub struct FixedRewriter {
    output: String,
    calls: AtomicUsize,
}

impl FixedRewriter {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewriteService for FixedRewriter {
    async fn generate(&self, _text: &str, _max_length: usize) -> CheckResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Rewrite model that is always down.
pub struct DownRewriter;

#[async_trait]
impl RewriteService for DownRewriter {
    async fn generate(&self, _text: &str, _max_length: usize) -> CheckResult<String> {
        Err(CheckError::unavailable("rewrite", "model loading"))
    }
}

pub fn spell_detector() -> SpellIssueDetector {
    let dictionary = SymSpellDictionary::from_words(VOCABULARY.iter().copied(), 2);
    SpellIssueDetector::new(Arc::new(dictionary), &SpellingConfig::default())
}

/// Pipeline over the sample vocabulary with the given grammar and rewrite fakes.
pub fn pipeline(
    grammar: Option<Arc<dyn GrammarService>>,
    rewriter: Option<Arc<dyn RewriteService>>,
) -> CheckPipeline {
    CheckPipeline::new(
        Some(spell_detector()),
        grammar.map(GrammarIssueDetector::new),
        rewriter.map(|service| RewriteGenerator::new(service, 128)),
        Annotator::new(AnnotationConfig::default()),
    )
}
