use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::annotate::OverlapPolicy;
use crate::core::error::{CheckError, CheckResult};

/// Environment variable consulted for the rewrite endpoint token.
pub const HF_TOKEN_ENV: &str = "WRITERIGHT_HF_TOKEN";

/// Default rewrite model (Hugging Face text2text).
pub const DEFAULT_HF_MODEL: &str = "vennify/t5-base-grammar-correction";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spelling: SpellingConfig,
    pub grammar: GrammarConfig,
    pub rewrite: RewriteConfig,
    pub annotation: AnnotationConfig,
    pub data: DataConfig,
}

/// Dictionary-based spell checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    pub enabled: bool,
    /// Frequency dictionary (`word count` per line) or plain word list.
    /// Resolved from the usual locations when unset.
    pub dictionary_path: Option<PathBuf>,
    /// Extra word lists layered on top of the main dictionary.
    pub extra_dictionaries: Vec<PathBuf>,
    /// Suggestions kept per misspelled word.
    pub max_suggestions: usize,
    /// Largest edit distance considered for candidates (SymSpell caps this at 2).
    pub max_edit_distance: u8,
    /// Never flag tokens made only of digits.
    pub skip_numeric: bool,
    /// Words that are never flagged, compared case-insensitively.
    pub protected_words: Vec<String>,
}

/// Rule-based grammar checking through a LanguageTool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    pub enabled: bool,
    pub base_url: String,
    /// LanguageTool language code.
    pub language: String,
    /// Rule ids LanguageTool should not report.
    pub disabled_rules: Vec<String>,
    pub timeout_secs: u64,
}

/// Which backend produces the corrected rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteProvider {
    /// Hugging Face Inference text2text model
    HuggingFace,
    /// Local Ollama model
    Ollama,
}

/// Holistic grammar rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub enabled: bool,
    pub provider: RewriteProvider,
    pub model: String,
    /// Override the provider's default endpoint.
    pub base_url: Option<String>,
    /// Bearer token for the Hugging Face endpoint.
    pub api_token: Option<String>,
    /// Upper bound on generated length.
    pub max_length: usize,
    pub timeout_secs: u64,
}

/// Markup generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub overlap_policy: OverlapPolicy,
    /// Suggestions shown in a tooltip.
    pub max_suggestions: usize,
    /// HTML-escape the original text as well as the tooltip.
    pub escape_text: bool,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dictionary_path: None,
            extra_dictionaries: Vec::new(),
            max_suggestions: 5,
            max_edit_distance: 2,
            skip_numeric: true,
            protected_words: Vec::new(),
        }
    }
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8081".to_string(),
            language: "en-GB".to_string(),
            disabled_rules: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: RewriteProvider::HuggingFace,
            model: DEFAULT_HF_MODEL.to_string(),
            base_url: None,
            api_token: None,
            max_length: 128,
            timeout_secs: 120,
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Merge,
            max_suggestions: 5,
            escape_text: false,
        }
    }
}

impl RewriteConfig {
    /// Configured token, falling back to [`HF_TOKEN_ENV`].
    pub fn api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(HF_TOKEN_ENV).ok().filter(|t| !t.is_empty()))
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/writeright/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path. Unlike [`AppConfig::load`],
    /// a missing or invalid file is an error.
    pub fn load_from(path: &Path) -> CheckResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CheckError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&contents).map_err(|e| {
            CheckError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("writeright"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("writeright").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
