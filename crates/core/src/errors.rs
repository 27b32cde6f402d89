use thiserror::Error;

/// Unified error type for the entire crypto-briefing-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("HTTP error ({provider}): status {status}")]
    Http {
        provider: String,
        status: u16,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Response content ────────────────────────────────────────────
    #[error("Price data missing for asset: {asset_id}")]
    MissingAsset { asset_id: String },

    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; CryptoPanic takes its token as a
        // query parameter, so everything after '?' is dropped.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip the query string from any URL embedded in `msg`.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
