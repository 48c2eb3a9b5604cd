//! LanguageTool Client
//!
//! Talks to a LanguageTool server (`languagetool-server.jar` or the public API)
//! through its `/v2/check` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::{GrammarHit, GrammarService};
use crate::config::GrammarConfig;
use crate::core::error::{CheckError, CheckResult};

const SERVICE: &str = "grammar";

/// LanguageTool HTTP client.
pub struct LanguageToolClient {
    base_url: String,
    language: String,
    disabled_rules: Vec<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Debug, Deserialize)]
struct LtMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    rule: Option<LtRule>,
}

#[derive(Debug, Deserialize)]
struct LtReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct LtRule {
    id: String,
}

impl LanguageToolClient {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> CheckResult<Self> {
        Self::with_timeout(base_url, language, Duration::from_secs(30))
    }

    pub fn from_config(config: &GrammarConfig) -> CheckResult<Self> {
        let client = Self::with_timeout(
            config.base_url.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(client.with_disabled_rules(config.disabled_rules.clone()))
    }

    fn with_timeout(
        base_url: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> CheckResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
            disabled_rules: Vec::new(),
            client,
        })
    }

    /// Rule ids the server should not report.
    pub fn with_disabled_rules(mut self, rules: Vec<String>) -> Self {
        self.disabled_rules = rules;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn check_url(&self) -> String {
        format!("{}/v2/check", self.base_url)
    }
}

#[async_trait]
impl GrammarService for LanguageToolClient {
    #[instrument(skip(self, text), fields(language = %self.language, chars = text.chars().count()))]
    async fn check(&self, text: &str) -> CheckResult<Vec<GrammarHit>> {
        let mut form = vec![
            ("text", text.to_string()),
            ("language", self.language.clone()),
        ];
        if !self.disabled_rules.is_empty() {
            form.push(("disabledRules", self.disabled_rules.join(",")));
        }

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(self.check_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CheckError::unavailable(
                SERVICE,
                format!("LanguageTool returned {}: {}", status.as_u16(), body),
            ));
        }

        let body: CheckResponse = resp
            .json()
            .await
            .map_err(|e| CheckError::unavailable(SERVICE, format!("invalid response: {e}")))?;

        log::debug!(
            "LanguageTool returned {} matches in {}ms",
            body.matches.len(),
            start.elapsed().as_millis()
        );

        let positions = Utf16Positions::new(text);
        Ok(body
            .matches
            .into_iter()
            .map(|m| {
                let (offset, length) = positions.to_chars(m.offset, m.length);
                GrammarHit {
                    offset,
                    length,
                    message: m.message,
                    replacements: m.replacements.into_iter().map(|r| r.value).collect(),
                    rule_id: m.rule.map(|r| r.id),
                }
            })
            .collect())
    }
}

/// Maps LanguageTool's UTF-16 code unit offsets to char offsets.
struct Utf16Positions {
    /// Char index for every UTF-16 unit position, plus the end
    char_at: Vec<usize>,
}

impl Utf16Positions {
    fn new(text: &str) -> Self {
        let mut char_at = Vec::with_capacity(text.len() + 1);
        let mut chars = 0;
        for c in text.chars() {
            for _ in 0..c.len_utf16() {
                char_at.push(chars);
            }
            chars += 1;
        }
        char_at.push(chars);
        Self { char_at }
    }

    /// Convert a UTF-16 span; spans the text cannot hold are passed through.
    fn to_chars(&self, offset: usize, length: usize) -> (usize, usize) {
        match (
            self.char_at.get(offset),
            offset.checked_add(length).and_then(|end| self.char_at.get(end)),
        ) {
            (Some(&start), Some(&end)) => (start, end - start),
            _ => (offset, length),
        }
    }
}
