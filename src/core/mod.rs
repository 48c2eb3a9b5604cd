pub mod annotate;
pub mod error;
pub mod grammar;
pub mod issue;
pub mod logging;
pub mod merge;
pub mod spelling;

// Holistic correction (independent of the issue model)
pub mod rewrite;

// Request orchestration: detect, merge, annotate, rewrite
pub mod pipeline;
