use serde::{Deserialize, Serialize};

/// Average 24h change above which the market reads as greedy.
pub const GREED_THRESHOLD: f64 = 2.0;
/// Average 24h change above which the market reads as optimistic.
pub const OPTIMISTIC_THRESHOLD: f64 = 0.0;
/// Average 24h change above which the market reads as cautious.
pub const CAUTIOUS_THRESHOLD: f64 = -2.0;

/// Coarse market mood derived from the tracked assets' 24h changes.
///
/// Variants are declared from most bearish to most bullish, so the derived
/// `Ord` follows the mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Fear,
    Cautious,
    Optimistic,
    Greed,
}

impl SentimentLabel {
    /// Map two 24h percentage changes to a label.
    ///
    /// The thresholds are strict: an average of exactly 2.0 is `Optimistic`,
    /// exactly 0.0 is `Cautious`, exactly -2.0 is `Fear`. A NaN average
    /// matches no threshold and falls through to `Fear`.
    pub fn derive(change_a: f64, change_b: f64) -> Self {
        Self::from_average(average_change(change_a, change_b))
    }

    pub fn from_average(avg: f64) -> Self {
        if avg > GREED_THRESHOLD {
            SentimentLabel::Greed
        } else if avg > OPTIMISTIC_THRESHOLD {
            SentimentLabel::Optimistic
        } else if avg > CAUTIOUS_THRESHOLD {
            SentimentLabel::Cautious
        } else {
            SentimentLabel::Fear
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Greed => "😎",
            SentimentLabel::Optimistic => "🙂",
            SentimentLabel::Cautious => "😐",
            SentimentLabel::Fear => "😰",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Greed => write!(f, "Greed"),
            SentimentLabel::Optimistic => write!(f, "Optimistic"),
            SentimentLabel::Cautious => write!(f, "Cautious"),
            SentimentLabel::Fear => write!(f, "Fear"),
        }
    }
}

/// Sentiment label plus the average change that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSentiment {
    pub label: SentimentLabel,
    pub average_change_pct: f64,
}

impl MarketSentiment {
    pub fn from_changes(change_a: f64, change_b: f64) -> Self {
        let average_change_pct = average_change(change_a, change_b);
        Self {
            label: SentimentLabel::from_average(average_change_pct),
            average_change_pct,
        }
    }
}

fn average_change(change_a: f64, change_b: f64) -> f64 {
    (change_a + change_b) / 2.0
}
