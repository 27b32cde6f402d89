use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::news::NewsItem;
use crate::models::price::QuoteSet;

/// Source of spot prices and 24h changes.
///
/// Implementations must return a quote for every requested id or fail;
/// a partial set is never a success.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch current USD quotes for the given provider ids.
    async fn fetch_quotes(&self, asset_ids: &[String]) -> Result<QuoteSet, CoreError>;
}

/// Source of recent news headlines.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch at most `limit` items, newest first as supplied by the provider.
    async fn fetch_news(&self, limit: usize) -> Result<Vec<NewsItem>, CoreError>;
}

/// Parameters of one text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub max_tokens: u32,
    /// Single user-role message.
    pub prompt: String,
}

/// A text-generation backend.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SummaryProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Return the text of the first content segment of the response.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, CoreError>;
}
