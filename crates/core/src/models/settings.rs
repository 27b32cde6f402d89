use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use super::news::DEFAULT_NEWS_LIMIT;

pub const COINGECKO_KEY_VAR: &str = "COINGECKO_API_KEY";
pub const CRYPTOPANIC_KEY_VAR: &str = "CRYPTOPANIC_API_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Tunable behaviour of the dashboard pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of news items kept per refresh.
    pub news_limit: usize,

    /// Maximum number of headlines passed to the summary prompt.
    pub headline_limit: usize,

    /// Freshness window of the price cache, in seconds.
    pub quote_ttl_secs: u64,

    /// Freshness window of the news cache, in seconds.
    pub news_ttl_secs: u64,

    /// Text-generation model identifier.
    pub model: String,

    /// Output token ceiling for the generated summary.
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_limit: DEFAULT_NEWS_LIMIT,
            headline_limit: 3,
            quote_ttl_secs: 5 * 60,
            news_ttl_secs: 10 * 60,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// The three provider keys. Loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub coingecko_api_key: String,
    pub cryptopanic_api_key: String,
    pub anthropic_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("coingecko_api_key", &"<redacted>")
            .field("cryptopanic_api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read the keys from process environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the keys through `lookup`. Blank values count as missing, and
    /// every missing name is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |name: &str| match lookup(name).map(|v| v.trim().to_string()) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let coingecko_api_key = fetch(COINGECKO_KEY_VAR);
        let cryptopanic_api_key = fetch(CRYPTOPANIC_KEY_VAR);
        let anthropic_api_key = fetch(ANTHROPIC_KEY_VAR);

        if !missing.is_empty() {
            return Err(CoreError::MissingCredentials(missing));
        }

        Ok(Self {
            coingecko_api_key,
            cryptopanic_api_key,
            anthropic_api_key,
        })
    }
}
