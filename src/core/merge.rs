//! Issue Merging
//!
//! Unions detector outputs into one [`IssueSet`]. Spelling issues go first so
//! that, after the stable sort, they precede grammar issues at the same offset.
//! No de-duplication and no overlap resolution happen here; the annotator's
//! overlap policy deals with collisions.

use super::issue::{Issue, IssueSet};

/// Concatenate spelling then grammar issues and stable-sort by offset.
pub fn merge(spelling: Vec<Issue>, grammar: Vec<Issue>) -> IssueSet {
    let (spelling_count, grammar_count) = (spelling.len(), grammar.len());

    let mut all = spelling;
    all.extend(grammar);
    let set = IssueSet::from_unsorted(all);

    log::debug!(
        "Merged {} spelling and {} grammar issues",
        spelling_count,
        grammar_count
    );
    set
}
