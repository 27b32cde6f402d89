use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spot price snapshot for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub asset_id: String,
    pub price_usd: f64,
    /// 24-hour change in percent (e.g. 1.5 means +1.5%).
    pub change_24h_pct: f64,
}

impl AssetQuote {
    pub fn new(asset_id: impl Into<String>, price_usd: f64, change_24h_pct: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            price_usd,
            change_24h_pct,
        }
    }

    /// A quote is usable when the price is finite and non-negative and the
    /// change is finite.
    pub fn is_valid(&self) -> bool {
        self.price_usd.is_finite() && self.price_usd >= 0.0 && self.change_24h_pct.is_finite()
    }
}

/// Quotes keyed by asset id.
pub type QuoteSet = HashMap<String, AssetQuote>;

/// Lowercase the requested ids and drop repeats, keeping first-seen order.
pub fn normalize_asset_ids(asset_ids: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(asset_ids.len());
    for id in asset_ids {
        let id = id.to_lowercase();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Cache key for a quote request: the normalized ids, sorted and comma-joined.
pub fn quote_cache_key(asset_ids: &[String]) -> String {
    let mut ids = normalize_asset_ids(asset_ids);
    ids.sort();
    ids.join(",")
}

/// Format a USD amount with thousands separators, e.g. `97123.456` with two
/// decimals gives `"97,123.46"`. No currency sign is added.
pub fn format_usd(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Values that round to zero keep no sign.
    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
