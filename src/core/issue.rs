//! Issue Model
//!
//! A single typed shape for everything a detector can flag, plus the sorted
//! [`IssueSet`] the annotator consumes. Offsets and lengths count `char`s of
//! the original text, never bytes.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// What kind of problem an issue describes. Selects the marker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Spelling,
    Grammar,
    Capitalization,
    Other,
}

impl IssueKind {
    /// CSS colour used for the underline of this kind.
    pub fn color(self) -> &'static str {
        match self {
            IssueKind::Spelling => "red",
            IssueKind::Grammar => "blue",
            IssueKind::Capitalization => "orange",
            IssueKind::Other => "black",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::Spelling => write!(f, "spelling"),
            IssueKind::Grammar => write!(f, "grammar"),
            IssueKind::Capitalization => write!(f, "capitalization"),
            IssueKind::Other => write!(f, "other"),
        }
    }
}

/// A flagged span of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Start of the span, in chars of the original text
    pub offset: usize,
    /// Number of chars covered
    pub length: usize,
    pub kind: IssueKind,
    /// Human readable description
    pub message: String,
    /// Candidate fixes, best first
    #[serde(default)]
    pub replacements: Vec<String>,
    /// Detector rule that fired, when the detector reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl Issue {
    pub fn new(offset: usize, length: usize, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            kind,
            message: message.into(),
            replacements: Vec::new(),
            rule_id: None,
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<String>) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Exclusive end of the span.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Whether the span is non-empty and lies inside a text of `char_len` chars.
    pub fn fits(&self, char_len: usize) -> bool {
        self.length > 0 && self.end() <= char_len
    }

    /// Whether the two spans share at least one char.
    pub fn overlaps(&self, other: &Issue) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    /// The flagged slice of `text`, if the span fits.
    pub fn snippet<'t>(&self, text: &'t str) -> Option<&'t str> {
        CharBoundaries::new(text)
            .byte_range(self.offset, self.length)
            .map(|range| &text[range])
    }

    /// Up to `limit` replacements joined with `", "`, or `None` when there are none.
    pub fn suggestions(&self, limit: usize) -> Option<String> {
        if self.replacements.is_empty() {
            return None;
        }
        Some(
            self.replacements
                .iter()
                .take(limit)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Issues sorted ascending by offset. Equal offsets keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueSet(Vec<Issue>);

impl IssueSet {
    /// Stable-sort `issues` by offset.
    pub fn from_unsorted(mut issues: Vec<Issue>) -> Self {
        issues.sort_by_key(|issue| issue.offset);
        Self(issues)
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    /// Number of issues of the given kind.
    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.0.iter().filter(|issue| issue.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a IssueSet {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Byte positions of every char boundary in a string, for turning char spans
/// into slice ranges without rescanning.
#[derive(Debug, Clone)]
pub struct CharBoundaries {
    bounds: Vec<usize>,
}

impl CharBoundaries {
    pub fn new(text: &str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { bounds }
    }

    /// Length of the text in chars.
    pub fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Byte offset of char `index`; `char_len()` maps to the end of the text.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        self.bounds.get(index).copied()
    }

    /// Byte range of the char span `[offset, offset + length)`.
    pub fn byte_range(&self, offset: usize, length: usize) -> Option<Range<usize>> {
        let start = self.byte_offset(offset)?;
        let end = self.byte_offset(offset.checked_add(length)?)?;
        Some(start..end)
    }
}
