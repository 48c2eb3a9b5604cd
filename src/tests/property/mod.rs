//! Property-based tests
//!
//! - `annotation_props`: stripping the markers recovers the text, rendering is
//!   idempotent, drift accounts for every added char, markers land where the
//!   drift bookkeeping says they do
//! - `detection_props`: token spans slice back to their words, merged issue
//!   sets are sorted and complete
//!
//! Case count follows `PROPTEST_CASES` (default 256).

mod detection_props;
