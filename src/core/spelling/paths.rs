//! Dictionary Path Resolution
//!
//! Locates the frequency dictionary at runtime, handling both development mode
//! (files in the source tree) and installed mode (user data directory).

use std::path::{Path, PathBuf};

/// English frequency dictionary filename (82,765 entries from SymSpell)
pub const ENGLISH_DICT_FILENAME: &str = "frequency_dictionary_en_82_765.txt";

/// Resolves the path to the English frequency dictionary.
///
/// Checks locations in order:
/// 1. Explicit path (if provided and present)
/// 2. Development paths (`data/`, `resources/`, `$CARGO_MANIFEST_DIR/data/`)
/// 3. User data directory
///
/// Returns `None` if the dictionary cannot be found.
pub fn resolve_dictionary_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        log::warn!("Configured dictionary {} does not exist", path.display());
    }

    let dev_paths = [
        PathBuf::from("data").join(ENGLISH_DICT_FILENAME),
        PathBuf::from("resources").join(ENGLISH_DICT_FILENAME),
        std::env::var("CARGO_MANIFEST_DIR")
            .map(|dir| PathBuf::from(dir).join("data").join(ENGLISH_DICT_FILENAME))
            .unwrap_or_default(),
    ];

    for path in &dev_paths {
        if path.is_file() {
            return Some(path.clone());
        }
    }

    get_user_data_dir()
        .map(|dir| dir.join(ENGLISH_DICT_FILENAME))
        .filter(|path| path.is_file())
}

/// Gets the user data directory for WriteRight.
///
/// Returns `~/.local/share/writeright/` on Linux,
/// `%APPDATA%\writeright\` on Windows.
pub fn get_user_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("writeright"))
}
