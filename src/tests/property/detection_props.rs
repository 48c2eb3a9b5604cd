//! Property-based tests for tokenizing and merging

use proptest::prelude::*;

use crate::core::issue::{CharBoundaries, Issue, IssueKind};
use crate::core::merge::merge;
use crate::core::spelling::tokenize;

fn arb_issues(kind: IssueKind) -> impl Strategy<Value = Vec<Issue>> {
    prop::collection::vec((0usize..50, 1usize..6), 0..10).prop_map(move |spans| {
        spans
            .into_iter()
            .map(|(offset, length)| Issue::new(offset, length, kind, kind.to_string()))
            .collect()
    })
}

proptest! {
    /// Each token's char span slices back to exactly its text
    #[test]
    fn prop_token_spans_slice_back(text in "[a-zA-Z0-9_éß文 ,.'-]{0,80}") {
        let bounds = CharBoundaries::new(&text);
        for token in tokenize(&text) {
            let range = bounds.byte_range(token.offset, token.length);
            prop_assert!(range.is_some());
            prop_assert_eq!(&text[range.unwrap()], token.text);
        }
    }

    /// Tokens come out in text order without overlapping
    #[test]
    fn prop_tokens_ordered(text in "[a-z0-9 ,.]{0,80}") {
        let tokens = tokenize(&text);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].offset + pair[0].length < pair[1].offset);
        }
    }

    /// Merging keeps every issue and sorts by offset
    #[test]
    fn prop_merge_sorted_and_complete(
        spelling in arb_issues(IssueKind::Spelling),
        grammar in arb_issues(IssueKind::Grammar),
    ) {
        let total = spelling.len() + grammar.len();
        let merged = merge(spelling, grammar);
        prop_assert_eq!(merged.len(), total);
        prop_assert!(merged.as_slice().windows(2).all(|w| w[0].offset <= w[1].offset));
    }

    /// At equal offsets spelling issues come before grammar issues
    #[test]
    fn prop_merge_spelling_first_on_ties(offset in 0usize..100, length in 1usize..10) {
        let merged = merge(
            vec![Issue::new(offset, length, IssueKind::Spelling, "s")],
            vec![Issue::new(offset, length, IssueKind::Grammar, "g")],
        );
        let kinds: Vec<_> = merged.iter().map(|i| i.kind).collect();
        prop_assert_eq!(kinds, vec![IssueKind::Spelling, IssueKind::Grammar]);
    }
}
