pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    asset::{tracked_assets, Asset},
    price::QuoteSet,
    sentiment::MarketSentiment,
    settings::{Credentials, Settings},
    snapshot::{DashboardSnapshot, PipelineStage, RefreshFailure, RefreshOutcome},
};
use providers::registry::ProviderRegistry;
use services::{
    news_service::{NewsCache, NewsService},
    quote_service::{QuoteCache, QuoteService},
    summary_service::SummaryService,
};
use tracing::{debug, info, warn};

use errors::CoreError;

/// Main entry point for the Crypto Briefing core library.
///
/// One `refresh` runs the whole pipeline: fetch prices, fetch news, derive
/// sentiment and request a summary. The only state kept between refreshes is
/// the two time-bounded caches.
#[must_use]
pub struct CryptoDashboard {
    assets: Vec<Asset>,
    settings: Settings,
    quote_service: QuoteService,
    news_service: NewsService,
    summary_service: SummaryService,
    quote_cache: QuoteCache,
    news_cache: NewsCache,
}

impl std::fmt::Debug for CryptoDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoDashboard")
            .field("assets", &self.assets)
            .field("settings", &self.settings)
            .field("cached_quote_sets", &self.quote_cache.len())
            .field("cached_news_lists", &self.news_cache.len())
            .finish()
    }
}

impl CryptoDashboard {
    /// Dashboard backed by the default live providers.
    pub fn new(credentials: &Credentials, settings: Settings) -> Self {
        Self::with_providers(ProviderRegistry::new_with_defaults(credentials), settings)
    }

    /// Dashboard backed by arbitrary providers (alternative hosts, test doubles).
    pub fn with_providers(registry: ProviderRegistry, settings: Settings) -> Self {
        let ProviderRegistry {
            quotes,
            news,
            summary,
        } = registry;

        Self {
            assets: tracked_assets(),
            quote_service: QuoteService::new(quotes),
            news_service: NewsService::new(news),
            summary_service: SummaryService::new(summary, &settings),
            quote_cache: QuoteCache::with_ttl_secs(settings.quote_ttl_secs),
            news_cache: NewsCache::with_ttl_secs(settings.news_ttl_secs),
            settings,
        }
    }

    #[must_use]
    pub fn tracked_assets(&self) -> &[Asset] {
        &self.assets
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Provider names in pipeline order (prices, news, summary).
    #[must_use]
    pub fn provider_names(&self) -> [&str; 3] {
        [
            self.quote_service.provider_name(),
            self.news_service.provider_name(),
            self.summary_service.provider_name(),
        ]
    }

    /// Drop all cached quotes and news so the next refresh refetches.
    pub fn clear_caches(&mut self) {
        self.quote_cache.clear();
        self.news_cache.clear();
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Run the pipeline, reusing cached data inside its freshness window.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        self.refresh_at(Utc::now()).await
    }

    /// Clear the caches, then run the pipeline.
    pub async fn force_refresh(&mut self) -> RefreshOutcome {
        self.clear_caches();
        self.refresh().await
    }

    /// Run the pipeline with cache freshness judged at `now`.
    ///
    /// All stages run in order. A price failure does not stop the news fetch,
    /// but the run ends as `Unavailable` and no summary is requested.
    pub async fn refresh_at(&mut self, now: DateTime<Utc>) -> RefreshOutcome {
        let asset_ids: Vec<String> = self.assets.iter().map(|a| a.id.clone()).collect();

        debug!(stage = %PipelineStage::FetchPrices, "refresh stage");
        let prices = self
            .quote_service
            .get_quotes_at(&mut self.quote_cache, &asset_ids, now)
            .await;

        debug!(stage = %PipelineStage::FetchNews, "refresh stage");
        let news = self
            .news_service
            .get_news_at(&mut self.news_cache, self.settings.news_limit, now)
            .await;

        debug!(stage = %PipelineStage::DeriveAndSummarize, "refresh stage");
        let quotes = match prices {
            Ok(quotes) => quotes,
            Err(error) => {
                // News is dropped with the run: nothing renders without prices.
                return Self::unavailable(PipelineStage::FetchPrices, error, now);
            }
        };

        let sentiment = match derive_sentiment(&self.assets, &quotes) {
            Ok(sentiment) => sentiment,
            Err(error) => return Self::unavailable(PipelineStage::DeriveAndSummarize, error, now),
        };

        let prompt = match self.summary_service.build_prompt(&self.assets, &quotes, &news) {
            Ok(prompt) => prompt,
            Err(error) => return Self::unavailable(PipelineStage::DeriveAndSummarize, error, now),
        };
        let summary = self.summary_service.generate_summary(&prompt).await;

        debug!(stage = %PipelineStage::Done, "refresh stage");
        info!(
            sentiment = %sentiment.label,
            news = news.len(),
            fallback_summary = summary.is_fallback(),
            "refresh complete"
        );

        RefreshOutcome::Ready(DashboardSnapshot {
            assets: self.assets.clone(),
            quotes,
            news,
            sentiment,
            summary,
            refreshed_at: now,
        })
    }

    fn unavailable(stage: PipelineStage, error: CoreError, now: DateTime<Utc>) -> RefreshOutcome {
        warn!(stage = %stage, "refresh unavailable: {error}");
        RefreshOutcome::Unavailable(RefreshFailure {
            stage,
            error,
            refreshed_at: now,
        })
    }
}

/// Sentiment over the two tracked assets' 24h changes.
fn derive_sentiment(assets: &[Asset], quotes: &QuoteSet) -> Result<MarketSentiment, CoreError> {
    let change_of = |asset: &Asset| {
        quotes
            .get(&asset.id)
            .map(|q| q.change_24h_pct)
            .ok_or_else(|| CoreError::MissingAsset {
                asset_id: asset.id.clone(),
            })
    };

    match assets {
        [first, second] => Ok(MarketSentiment::from_changes(change_of(first)?, change_of(second)?)),
        _ => Err(CoreError::Api {
            provider: "dashboard".into(),
            message: format!("sentiment needs exactly two tracked assets, got {}", assets.len()),
        }),
    }
}
