use serde::{Deserialize, Serialize};

/// Prefix of every fallback summary.
pub const FALLBACK_PREFIX: &str = "Unable to generate AI analysis";

/// Where a summary's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    /// Text returned by the generation provider.
    Generated,
    /// Descriptive placeholder built from a generation failure.
    Fallback,
}

/// The natural-language market summary shown on the dashboard.
/// `text` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub text: String,
    pub source: SummarySource,
}

impl MarketSummary {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: SummarySource::Generated,
        }
    }

    pub fn fallback(reason: impl std::fmt::Display) -> Self {
        Self {
            text: format!("{FALLBACK_PREFIX}: {reason}"),
            source: SummarySource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SummarySource::Fallback
    }
}
