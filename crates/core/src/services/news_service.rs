use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::cache::TimedCache;
use crate::models::news::NewsItem;
use crate::providers::traits::NewsProvider;

/// Latest news keyed by the requested limit.
pub type NewsCache = TimedCache<usize, Vec<NewsItem>>;

/// Fetches headlines behind a freshness-windowed cache.
///
/// News is secondary to prices: `get_news` never fails, a provider error
/// yields an empty list. Use `try_get_news` to see the error.
pub struct NewsService {
    provider: Box<dyn NewsProvider>,
}

impl NewsService {
    pub fn new(provider: Box<dyn NewsProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Up to `limit` headlines; empty on failure.
    pub async fn get_news(&self, cache: &mut NewsCache, limit: usize) -> Vec<NewsItem> {
        self.get_news_at(cache, limit, Utc::now()).await
    }

    pub async fn get_news_at(
        &self,
        cache: &mut NewsCache,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<NewsItem> {
        match self.try_get_news_at(cache, limit, now).await {
            Ok(items) => items,
            Err(e) => {
                warn!(provider = self.provider.name(), "news unavailable: {e}");
                Vec::new()
            }
        }
    }

    /// Like `get_news_at`, but reports the failure instead of degrading.
    pub async fn try_get_news_at(
        &self,
        cache: &mut NewsCache,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<NewsItem>, CoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        if let Some(items) = cache.get_fresh(&limit, now) {
            debug!(limit, "news cache hit");
            return Ok(items.clone());
        }

        let mut items = self.provider.fetch_news(limit).await?;
        // Providers are asked for `limit`, but the bound is enforced here.
        items.truncate(limit);
        info!(provider = self.provider.name(), items = items.len(), "fetched news");

        cache.insert(limit, items.clone(), now);
        Ok(items)
    }
}
