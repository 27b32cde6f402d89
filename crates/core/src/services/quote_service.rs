use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::cache::TimedCache;
use crate::models::price::{normalize_asset_ids, quote_cache_key, QuoteSet};
use crate::providers::traits::QuoteProvider;

/// Quote sets keyed by the sorted, comma-joined asset ids.
pub type QuoteCache = TimedCache<String, QuoteSet>;

/// Fetches quotes from the price provider behind a freshness-windowed cache.
///
/// Cache strategy:
/// - A cached set younger than the cache's window is returned as-is, no call made.
/// - Otherwise the provider is called and the result replaces the entry.
/// - Failures are returned to the caller and never cached.
pub struct QuoteService {
    provider: Box<dyn QuoteProvider>,
}

impl QuoteService {
    pub fn new(provider: Box<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Quotes for `asset_ids`, from cache when fresh. The result is keyed by
    /// the lowercased ids.
    pub async fn get_quotes(
        &self,
        cache: &mut QuoteCache,
        asset_ids: &[String],
    ) -> Result<QuoteSet, CoreError> {
        self.get_quotes_at(cache, asset_ids, Utc::now()).await
    }

    /// Same as `get_quotes`, with freshness judged at `now`.
    pub async fn get_quotes_at(
        &self,
        cache: &mut QuoteCache,
        asset_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<QuoteSet, CoreError> {
        // Ids differing only in case or repeated name the same request.
        let asset_ids = normalize_asset_ids(asset_ids);
        if asset_ids.is_empty() {
            return Ok(QuoteSet::new());
        }

        let key = quote_cache_key(&asset_ids);
        if let Some(quotes) = cache.get_fresh(&key, now) {
            debug!(key = %key, "quote cache hit");
            return Ok(quotes.clone());
        }

        let quotes = self.fetch_quotes(&asset_ids).await?;
        info!(
            provider = self.provider.name(),
            assets = quotes.len(),
            "fetched quotes"
        );
        cache.insert(key, quotes.clone(), now);
        Ok(quotes)
    }

    /// Internal: call the provider and check that the answer covers exactly
    /// the requested ids with usable values.
    async fn fetch_quotes(&self, asset_ids: &[String]) -> Result<QuoteSet, CoreError> {
        let mut fetched = self.provider.fetch_quotes(asset_ids).await?;

        let mut quotes = QuoteSet::with_capacity(asset_ids.len());
        for id in asset_ids {
            let quote = fetched.remove(id).ok_or_else(|| CoreError::MissingAsset {
                asset_id: id.clone(),
            })?;
            if !quote.is_valid() {
                return Err(CoreError::Api {
                    provider: self.provider.name().to_string(),
                    message: format!(
                        "Invalid quote returned for {id}: price {}, change {} (must be finite, price non-negative)",
                        quote.price_usd, quote.change_24h_pct
                    ),
                });
            }
            quotes.insert(id.clone(), quote);
        }

        Ok(quotes)
    }
}
