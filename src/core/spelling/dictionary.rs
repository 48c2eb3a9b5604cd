//! Spelling Dictionary
//!
//! [`DictionaryService`] is the seam between the spell detector and whatever
//! knows the vocabulary. [`SymSpellDictionary`] backs it with a SymSpell
//! frequency dictionary for fuzzy candidates and `strsim` for ranking.

use std::collections::HashSet;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use symspell::{SymSpell, UnicodeStringStrategy, Verbosity};

use super::paths::{resolve_dictionary_path, ENGLISH_DICT_FILENAME};
use crate::config::SpellingConfig;
use crate::core::error::{CheckError, CheckResult};

/// SymSpell precomputes deletes up to this distance; lookups cannot exceed it.
pub const MAX_SYMSPELL_DISTANCE: u8 = 2;

/// Vocabulary lookups needed by the spell detector.
///
/// Implementations are read-only after construction and shared between
/// requests.
#[cfg_attr(test, automock)]
pub trait DictionaryService: Send + Sync {
    /// Whether `word` is a known word.
    fn contains(&self, word: &str) -> bool;

    /// Near matches for an unknown word, in the dictionary's own order.
    fn fuzzy_candidates(&self, word: &str) -> Vec<String>;

    /// Edit distance between two words.
    fn edit_distance(&self, a: &str, b: &str) -> usize;
}

/// SymSpell-backed dictionary.
///
/// Accepts SymSpell frequency files (`word count` per line) and plain word lists
/// (one word per line, count 1). Terms are stored lowercase.
pub struct SymSpellDictionary {
    engine: SymSpell<UnicodeStringStrategy>,
    words: HashSet<String>,
    max_edit_distance: i64,
}

impl SymSpellDictionary {
    /// Create an empty dictionary.
    pub fn new(max_edit_distance: u8) -> Self {
        Self {
            engine: SymSpell::default(),
            words: HashSet::new(),
            max_edit_distance: i64::from(max_edit_distance.min(MAX_SYMSPELL_DISTANCE)),
        }
    }

    /// Build the dictionary described by the spelling configuration.
    ///
    /// Loading the English frequency dictionary precomputes SymSpell deletes
    /// for every entry, which takes a noticeable moment; build once and share.
    pub fn from_config(config: &SpellingConfig) -> CheckResult<Self> {
        let path = resolve_dictionary_path(config.dictionary_path.as_deref()).ok_or_else(|| {
            CheckError::Config(format!(
                "spelling dictionary not found; set spelling.dictionary_path or place {} in data/",
                ENGLISH_DICT_FILENAME
            ))
        })?;

        let mut dictionary = Self::new(config.max_edit_distance);
        let loaded = dictionary.load_file(&path)?;
        log::info!("Loaded {} dictionary terms from {}", loaded, path.display());

        for extra in &config.extra_dictionaries {
            let loaded = dictionary.load_file(extra)?;
            log::info!("Loaded {} extra terms from {}", loaded, extra.display());
        }

        Ok(dictionary)
    }

    /// Build a dictionary from a list of words, each with count 1.
    pub fn from_words<I, S>(words: I, max_edit_distance: u8) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new(max_edit_distance);
        for word in words {
            dictionary.load_line(word.as_ref());
        }
        dictionary
    }

    /// Load a dictionary file, returning the number of accepted lines.
    pub fn load_file(&mut self, path: &Path) -> CheckResult<usize> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CheckError::Config(format!("cannot read dictionary {}: {e}", path.display()))
        })?;

        let loaded = self.load_lines(contents.lines());
        if loaded == 0 {
            return Err(CheckError::Config(format!(
                "dictionary {} contains no usable entries",
                path.display()
            )));
        }
        Ok(loaded)
    }

    /// Load dictionary lines, returning how many were accepted.
    pub fn load_lines<'a, I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().filter(|line| self.load_line(line)).count()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Accepts `term` or `term count`; anything else is skipped.
    fn load_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return false;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (term, count) = match parts.as_slice() {
            [term] => (*term, 1),
            [term, count] => match count.parse::<i64>() {
                Ok(count) if count > 0 => (*term, count),
                _ => {
                    log::warn!("Skipping dictionary line with invalid count: {:?}", line);
                    return false;
                }
            },
            _ => {
                log::warn!("Skipping multi-word dictionary line: {:?}", line);
                return false;
            }
        };

        let term = term.to_lowercase();
        self.engine
            .load_dictionary_line(&format!("{} {}", term, count), 0, 1, " ");
        self.words.insert(term);
        true
    }
}

impl DictionaryService for SymSpellDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    fn fuzzy_candidates(&self, word: &str) -> Vec<String> {
        let word_lower = word.to_lowercase();
        self.engine
            .lookup(&word_lower, Verbosity::All, self.max_edit_distance)
            .into_iter()
            .map(|suggestion| suggestion.term)
            .filter(|term| *term != word_lower)
            .collect()
    }

    fn edit_distance(&self, a: &str, b: &str) -> usize {
        strsim::damerau_levenshtein(a, b)
    }
}
