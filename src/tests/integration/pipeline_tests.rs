//! Check Pipeline Integration Tests
//!
//! Covers:
//! - Exact markup for a known sentence
//! - Spelling and grammar issues merged into one report
//! - Grammar outage degrading the report instead of failing it
//! - Rewrite outage failing the request
//! - Blank input never reaching a service

use std::sync::Arc;

use rstest::rstest;

use crate::config::AnnotationConfig;
use crate::core::annotate::{Annotator, OverlapPolicy};
use crate::core::error::CheckError;
use crate::core::grammar::{GrammarHit, GrammarIssueDetector, GrammarService, MockGrammarService};
use crate::core::issue::IssueKind;
use crate::core::pipeline::CheckPipeline;
use crate::core::rewrite::{MockRewriteService, RewriteGenerator, RewriteService};
use crate::core::spelling::SPELLING_MESSAGE;
use crate::tests::mocks::{
    pipeline, spell_detector, DownGrammar, DownRewriter, FixedGrammar, FixedRewriter,
};

fn agreement_hit() -> GrammarHit {
    GrammarHit::new(2, 3, "Subject and verb do not agree").with_replacements(vec!["have".to_string()])
}

#[tokio::test]
async fn test_single_issue_exact_markup() {
    let grammar = Arc::new(FixedGrammar::new(vec![agreement_hit()]));
    let pipeline = pipeline(Some(grammar), None);

    let report = pipeline.check("I has a apple").await.unwrap();

    let wrapper = "<span style='text-decoration: underline; text-decoration-color: blue; cursor: help;' \
                   title='Suggestions: have\nIssue: Subject and verb do not agree'>has</span>";
    assert_eq!(report.annotated_html, format!("I {wrapper} a apple"));
    assert_eq!(
        report.annotated_html.chars().count(),
        "I has a apple".chars().count() + wrapper.chars().count() - 3
    );
}

#[tokio::test]
async fn test_spelling_and_grammar_merged() {
    let grammar = Arc::new(FixedGrammar::new(vec![
        GrammarHit::new(9, 4, "Agreement").with_replacements(vec!["sit".to_string()])
    ]));
    let rewriter = Arc::new(FixedRewriter::new("The cats sit on the mat."));
    let pipeline = pipeline(Some(grammar.clone()), Some(rewriter.clone()));

    let report = pipeline.check("teh cats sits on teh mat").await.unwrap();

    let offsets: Vec<_> = report.issues.iter().map(|i| (i.offset, i.kind)).collect();
    assert_eq!(
        offsets,
        vec![
            (0, IssueKind::Spelling),
            (9, IssueKind::Grammar),
            (17, IssueKind::Spelling),
        ]
    );
    assert_eq!(report.issues.as_slice()[0].replacements.first().map(String::as_str), Some("the"));
    assert_eq!(report.corrected_text.as_deref(), Some("The cats sit on the mat."));
    assert_eq!(report.annotated_html.matches("text-decoration-color: red").count(), 2);
    assert_eq!(report.annotated_html.matches("text-decoration-color: blue").count(), 1);
    assert!(report.degraded.is_empty());
    assert_eq!((grammar.calls(), rewriter.calls()), (1, 1));
}

#[tokio::test]
async fn test_grammar_outage_degrades_report() {
    let pipeline = pipeline(Some(Arc::new(DownGrammar)), None);

    let report = pipeline.check("teh cat").await.unwrap();

    assert_eq!(report.degraded, vec!["grammar".to_string()]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues.as_slice()[0].message, SPELLING_MESSAGE);
}

#[tokio::test]
async fn test_grammar_outage_without_spelling_fails() {
    let pipeline = CheckPipeline::new(
        None,
        Some(GrammarIssueDetector::new(Arc::new(DownGrammar))),
        None,
        Annotator::default(),
    );

    let err = pipeline.check("I has a apple").await.unwrap_err();
    assert!(matches!(err, CheckError::ServiceUnavailable { ref service, .. } if service == "grammar"));
}

#[tokio::test]
async fn test_rewrite_outage_fails_request() {
    let pipeline = pipeline(None, Some(Arc::new(DownRewriter)));

    let err = pipeline.check("the cat").await.unwrap_err();
    assert!(matches!(err, CheckError::ServiceUnavailable { ref service, .. } if service == "rewrite"));
}

#[rstest]
#[case("")]
#[case(" ")]
#[case("\n\t  \n")]
#[tokio::test]
async fn test_blank_input_calls_no_service(#[case] text: &str) {
    let mut grammar = MockGrammarService::new();
    grammar.expect_check().times(0);
    let mut rewrite = MockRewriteService::new();
    rewrite.expect_generate().times(0);

    let grammar: Arc<dyn GrammarService> = Arc::new(grammar);
    let rewrite: Arc<dyn RewriteService> = Arc::new(rewrite);
    let pipeline = CheckPipeline::new(
        Some(spell_detector()),
        Some(GrammarIssueDetector::new(grammar)),
        Some(RewriteGenerator::new(rewrite, 128)),
        Annotator::default(),
    );

    let err = pipeline.check(text).await.unwrap_err();
    assert!(matches!(err, CheckError::EmptyInput));
}

#[rstest]
#[case(OverlapPolicy::Merge, 1, true)]
#[case(OverlapPolicy::FirstWins, 1, false)]
#[tokio::test]
async fn test_overlapping_issues_follow_policy(
    #[case] policy: OverlapPolicy,
    #[case] markers: usize,
    #[case] folded: bool,
) {
    // Spelling flags "teh"; grammar flags the phrase starting at the same char
    let grammar: Arc<dyn GrammarService> =
        Arc::new(FixedGrammar::new(vec![GrammarHit::new(0, 7, "Article misuse")]));
    let pipeline = CheckPipeline::new(
        Some(spell_detector()),
        Some(GrammarIssueDetector::new(grammar)),
        None,
        Annotator::new(AnnotationConfig {
            overlap_policy: policy,
            ..AnnotationConfig::default()
        }),
    );

    let report = pipeline.check("teh cat sits").await.unwrap();

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.annotated_html.matches("<span").count(), markers);
    assert!(report.annotated_html.contains("text-decoration-color: red"));
    assert_eq!(report.annotated_html.contains("Issue: Article misuse"), folded);
    assert!(report.annotated_html.ends_with(" cat sits"));
}

#[tokio::test]
async fn test_out_of_range_hit_listed_but_not_marked() {
    let grammar = Arc::new(FixedGrammar::new(vec![GrammarHit::new(40, 3, "Stale offset")]));
    let pipeline = pipeline(Some(grammar), None);

    let report = pipeline.check("the cat").await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.annotated_html, "the cat");
    assert_eq!(report.summaries()[0].snippet, "");
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let grammar = Arc::new(FixedGrammar::new(vec![agreement_hit()]));
    let pipeline = pipeline(Some(grammar), Some(Arc::new(FixedRewriter::new("I have an apple."))));

    let report = pipeline.check("I has a apple").await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["corrected_text"], "I have an apple.");
    assert_eq!(json["issues"][0]["kind"], "grammar");
    assert_eq!(json["issues"][0]["offset"], 2);
    assert_eq!(json["degraded"].as_array().map(Vec::len), Some(0));
}
