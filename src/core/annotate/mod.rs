//! Inline Annotation
//!
//! Turns the original text plus an issue list into markup where every flagged
//! span is wrapped in an underlined `<span>` carrying a hover tooltip.
//!
//! The text is split once into [`Segment`]s (untouched original text or a marked
//! span) and rendered in a single pass. Offsets always refer to the original
//! text; the running drift records how much longer the output has grown before
//! each marker, so each marker's position in the output is `offset + drift`.

pub mod terminal;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::issue::{CharBoundaries, Issue};
use crate::config::AnnotationConfig;

pub use terminal::render_terminal;

/// Tooltip text when an issue has no replacements.
pub const NO_SUGGESTIONS: &str = "No suggestions";

/// What to do with an issue that starts inside a span already being marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Fold the issue's message and suggestions into the enclosing marker
    #[default]
    Merge,
    /// Leave the issue out of the markup
    FirstWins,
}

/// A run of the original text, either left alone or marked by an issue.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Marked(Marker<'a>),
}

/// A marked span and the issues it reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<'a> {
    /// Original text covered by the marker
    pub text: &'a str,
    /// Issue that opened the marker; decides extent and colour
    pub issue: &'a Issue,
    /// Later issues starting inside this span (merge policy only)
    pub folded: Vec<&'a Issue>,
}

impl<'a> Marker<'a> {
    /// The opening issue followed by any folded ones.
    pub fn issues(&self) -> impl Iterator<Item = &'a Issue> + '_ {
        std::iter::once(self.issue).chain(self.folded.iter().copied())
    }
}

/// Rendered markup plus the drift bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedText {
    pub markup: String,
    /// Chars added relative to the original text
    pub drift: usize,
    /// Char position of every marker in `markup`, in text order
    pub marker_starts: Vec<usize>,
}

/// Wraps flagged spans in styled markup.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    config: AnnotationConfig,
}

impl Annotator {
    pub fn new(config: AnnotationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Annotate `text`, returning only the markup.
    pub fn annotate(&self, text: &str, issues: &[Issue]) -> String {
        self.render(text, issues).markup
    }

    /// Annotate `text` and report where each marker landed.
    pub fn render(&self, text: &str, issues: &[Issue]) -> AnnotatedText {
        let segments = self.segments(text, issues);

        let mut markup = String::with_capacity(text.len() + segments.len() * 128);
        let mut drift = 0;
        let mut marker_starts = Vec::new();

        for segment in &segments {
            match segment {
                Segment::Plain(plain) => {
                    let escaped = self.escape(plain);
                    drift += escaped.chars().count() - plain.chars().count();
                    markup.push_str(&escaped);
                }
                Segment::Marked(marker) => {
                    let wrapper = self.wrapper(marker);
                    marker_starts.push(marker.issue.offset + drift);
                    drift += wrapper.chars().count() - marker.text.chars().count();
                    markup.push_str(&wrapper);
                }
            }
        }

        AnnotatedText {
            markup,
            drift,
            marker_starts,
        }
    }

    /// Split `text` into plain and marked segments.
    ///
    /// Issues are visited in ascending offset order (stable for ties). Spans that
    /// are empty or run past the end of the text are skipped. An issue starting
    /// before the end of the previous marker is handled by the overlap policy;
    /// the first marker always keeps its own extent.
    pub fn segments<'a>(&self, text: &'a str, issues: &'a [Issue]) -> Vec<Segment<'a>> {
        let bounds = CharBoundaries::new(text);

        let mut ordered: Vec<&Issue> = issues.iter().collect();
        ordered.sort_by_key(|issue| issue.offset);

        let mut segments = Vec::with_capacity(ordered.len() * 2 + 1);
        let mut cursor = 0;
        let mut byte_cursor = 0;

        for issue in ordered {
            let range = match bounds.byte_range(issue.offset, issue.length) {
                Some(range) if issue.length > 0 => range,
                _ => {
                    log::warn!(
                        "Skipping {} issue with span {}+{} outside text of {} chars",
                        issue.kind,
                        issue.offset,
                        issue.length,
                        bounds.char_len()
                    );
                    continue;
                }
            };

            if issue.offset < cursor {
                match self.config.overlap_policy {
                    OverlapPolicy::Merge => {
                        if let Some(Segment::Marked(marker)) = segments.last_mut() {
                            marker.folded.push(issue);
                        }
                    }
                    OverlapPolicy::FirstWins => {
                        log::debug!(
                            "Dropping overlapping {} issue at {} from markup",
                            issue.kind,
                            issue.offset
                        );
                    }
                }
                continue;
            }

            if range.start > byte_cursor {
                segments.push(Segment::Plain(&text[byte_cursor..range.start]));
            }
            byte_cursor = range.end;
            cursor = issue.end();
            segments.push(Segment::Marked(Marker {
                text: &text[range],
                issue,
                folded: Vec::new(),
            }));
        }

        if byte_cursor < text.len() {
            segments.push(Segment::Plain(&text[byte_cursor..]));
        }

        segments
    }

    /// Hover text: suggestions of every issue in the marker, then each message.
    pub fn tooltip(&self, marker: &Marker<'_>) -> String {
        let limit = self.config.max_suggestions;
        let mut suggestions: Vec<&str> = marker
            .issue
            .replacements
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect();
        for issue in &marker.folded {
            for replacement in &issue.replacements {
                if suggestions.len() >= limit {
                    break;
                }
                if !suggestions.contains(&replacement.as_str()) {
                    suggestions.push(replacement);
                }
            }
        }

        let suggestions = if suggestions.is_empty() {
            NO_SUGGESTIONS.to_string()
        } else {
            suggestions.join(", ")
        };

        let mut title = format!("Suggestions: {suggestions}");
        for issue in marker.issues() {
            title.push_str("\nIssue: ");
            title.push_str(&issue.message);
        }
        title
    }

    fn wrapper(&self, marker: &Marker<'_>) -> String {
        let title = self.tooltip(marker);
        format!(
            "<span style='text-decoration: underline; text-decoration-color: {}; cursor: help;' title='{}'>{}</span>",
            marker.issue.kind.color(),
            html_escape::encode_single_quoted_attribute(&title),
            self.escape(marker.text),
        )
    }

    fn escape<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.config.escape_text {
            html_escape::encode_text(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}
