/// WriteRight - Spelling and Grammar Checker
///
/// Core library detecting spelling and grammar issues, marking them inline
/// in the original text, and producing a holistic corrected rewrite.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub use crate::core::annotate::{AnnotatedText, Annotator, OverlapPolicy};
pub use crate::core::error::{CheckError, CheckResult};
pub use crate::core::issue::{Issue, IssueKind, IssueSet};
pub use crate::core::pipeline::{
    ensure_not_blank, CheckPipeline, CheckReport, Detection, IssueSummary,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
