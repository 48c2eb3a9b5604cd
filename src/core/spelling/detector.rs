//! Spelling Issue Detection
//!
//! Flags every word token whose lowercase form the dictionary does not know and
//! attaches up to `max_suggestions` candidates ranked by edit distance.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::dictionary::DictionaryService;
use crate::config::SpellingConfig;
use crate::core::issue::{Issue, IssueKind};

/// Message attached to every spelling issue.
pub const SPELLING_MESSAGE: &str = "Possible spelling mistake";

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// A word token with its char position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    /// Char offset of the first char
    pub offset: usize,
    /// Length in chars
    pub length: usize,
}

/// Split `text` into runs of word characters (letters, digits, underscore).
///
/// Char offsets are computed by a forward scan that resumes at the end of the
/// previous token, so repeated words each get their own position and the whole
/// text is walked once.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for found in word_pattern().find_iter(text) {
        let offset = char_cursor + text[byte_cursor..found.start()].chars().count();
        let length = found.as_str().chars().count();

        tokens.push(Token {
            text: found.as_str(),
            offset,
            length,
        });

        byte_cursor = found.end();
        char_cursor = offset + length;
    }

    tokens
}

/// Dictionary-based spell checker producing [`Issue`]s.
pub struct SpellIssueDetector {
    dictionary: Arc<dyn DictionaryService>,
    protected_words: HashSet<String>,
    max_suggestions: usize,
    skip_numeric: bool,
}

impl SpellIssueDetector {
    pub fn new(dictionary: Arc<dyn DictionaryService>, config: &SpellingConfig) -> Self {
        let protected_words = config
            .protected_words
            .iter()
            .map(|word| word.to_lowercase())
            .collect();

        Self {
            dictionary,
            protected_words,
            max_suggestions: config.max_suggestions,
            skip_numeric: config.skip_numeric,
        }
    }

    /// Flag unknown words in `text`. Pure over the dictionary state.
    pub fn detect(&self, text: &str) -> Vec<Issue> {
        let issues: Vec<Issue> = tokenize(text)
            .into_iter()
            .filter_map(|token| self.check_token(&token))
            .collect();

        log::debug!("Spell check flagged {} tokens", issues.len());
        issues
    }

    /// Add a word that should never be flagged.
    pub fn add_protected_word(&mut self, word: &str) {
        self.protected_words.insert(word.to_lowercase());
    }

    /// Check if a word is protected from flagging.
    pub fn is_protected(&self, word: &str) -> bool {
        self.protected_words.contains(&word.to_lowercase())
    }

    fn check_token(&self, token: &Token<'_>) -> Option<Issue> {
        if self.skip_numeric && token.text.chars().all(|c| c.is_numeric()) {
            return None;
        }

        let word_lower = token.text.to_lowercase();
        if self.protected_words.contains(&word_lower) || self.dictionary.contains(&word_lower) {
            return None;
        }

        Some(
            Issue::new(token.offset, token.length, IssueKind::Spelling, SPELLING_MESSAGE)
                .with_replacements(self.suggestions(&word_lower)),
        )
    }

    /// Fuzzy candidates, stably sorted by edit distance and truncated.
    fn suggestions(&self, word_lower: &str) -> Vec<String> {
        let mut candidates = self.dictionary.fuzzy_candidates(word_lower);
        candidates.sort_by_key(|candidate| self.dictionary.edit_distance(word_lower, candidate));
        candidates.truncate(self.max_suggestions);
        candidates
    }
}
