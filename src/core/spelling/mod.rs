//! Spell checking: dictionary service, path resolution, and the detector that
//! turns unknown words into spelling issues.

pub mod detector;
pub mod dictionary;
pub mod paths;

pub use detector::{tokenize, SpellIssueDetector, Token, SPELLING_MESSAGE};
pub use dictionary::{DictionaryService, SymSpellDictionary};
