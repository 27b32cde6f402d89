use serde::{Deserialize, Serialize};

/// A tracked cryptocurrency.
///
/// **Equality and hashing** are based solely on `id`, NOT on `name` or
/// `symbol`. The id is what the price provider keys its response by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Provider id, lowercased (e.g., "bitcoin", "ethereum")
    pub id: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol, uppercased (e.g., "BTC")
    pub symbol: String,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Asset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into().to_lowercase(),
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
        }
    }

    pub fn bitcoin() -> Self {
        Self::new("bitcoin", "Bitcoin", "BTC")
    }

    pub fn ethereum() -> Self {
        Self::new("ethereum", "Ethereum", "ETH")
    }

    /// Card label, e.g. "Bitcoin (BTC)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The fixed pair of assets the dashboard reports on, in display order.
pub fn tracked_assets() -> Vec<Asset> {
    vec![Asset::bitcoin(), Asset::ethereum()]
}

/// Provider ids of the tracked assets, in display order.
pub fn tracked_asset_ids() -> Vec<String> {
    tracked_assets().into_iter().map(|a| a.id).collect()
}
