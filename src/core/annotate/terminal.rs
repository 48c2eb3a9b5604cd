//! Terminal rendering of annotation segments: flagged spans are underlined in
//! the colour of their issue kind.

use console::{style, Color};

use super::Segment;
use crate::core::issue::IssueKind;

/// `None` keeps the terminal's own foreground.
fn kind_color(kind: IssueKind) -> Option<Color> {
    match kind {
        IssueKind::Spelling => Some(Color::Red),
        IssueKind::Grammar => Some(Color::Blue),
        IssueKind::Capitalization => Some(Color::Color256(208)),
        IssueKind::Other => None,
    }
}

/// Render segments for a terminal. With `colorize` off the original text is
/// returned unchanged.
pub fn render_terminal(segments: &[Segment<'_>], colorize: bool) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Plain(text) => out.push_str(text),
            Segment::Marked(marker) => {
                let mut styled = style(marker.text).underlined().force_styling(colorize);
                if let Some(color) = kind_color(marker.issue.kind) {
                    styled = styled.fg(color);
                }
                out.push_str(&styled.to_string());
            }
        }
    }
    out
}
