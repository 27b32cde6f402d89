// ═══════════════════════════════════════════════════════════════════
// Service Tests — QuoteService, NewsService, SummaryService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crypto_briefing_core::errors::CoreError;
use crypto_briefing_core::models::asset::{tracked_asset_ids, tracked_assets};
use crypto_briefing_core::models::news::NewsItem;
use crypto_briefing_core::models::price::{AssetQuote, QuoteSet};
use crypto_briefing_core::models::settings::Settings;
use crypto_briefing_core::models::summary::FALLBACK_PREFIX;
use crypto_briefing_core::providers::traits::{
    GenerationRequest, NewsProvider, QuoteProvider, SummaryProvider,
};
use crypto_briefing_core::services::news_service::{NewsCache, NewsService};
use crypto_briefing_core::services::quote_service::{QuoteCache, QuoteService};
use crypto_briefing_core::services::summary_service::SummaryService;

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

fn quotes(btc_change: f64, eth_change: f64) -> QuoteSet {
    let mut q = QuoteSet::new();
    q.insert("bitcoin".into(), AssetQuote::new("bitcoin", 97123.456, btc_change));
    q.insert("ethereum".into(), AssetQuote::new("ethereum", 3456.789, eth_change));
    q
}

fn news(n: usize) -> Vec<NewsItem> {
    (1..=n)
        .map(|i| NewsItem::new(format!("Headline {i}"), "CoinDesk", t0()))
        .collect()
}

/// Returns a fixed quote set (or error) and counts calls.
struct MockQuoteProvider {
    response: Result<QuoteSet, String>,
    calls: Arc<AtomicUsize>,
}

impl MockQuoteProvider {
    fn ok(q: QuoteSet) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                response: Ok(q),
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn failing(message: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                response: Err(message.to_string()),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "MockQuotes"
    }

    async fn fetch_quotes(&self, _asset_ids: &[String]) -> Result<QuoteSet, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(|message| CoreError::Api {
            provider: "MockQuotes".into(),
            message,
        })
    }
}

/// Prices exactly the ids it is asked for and records the last request.
struct EchoQuoteProvider {
    last_request: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
}

impl EchoQuoteProvider {
    fn new() -> Self {
        Self {
            last_request: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl QuoteProvider for EchoQuoteProvider {
    fn name(&self) -> &str {
        "EchoQuotes"
    }

    async fn fetch_quotes(&self, asset_ids: &[String]) -> Result<QuoteSet, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = asset_ids.to_vec();
        Ok(asset_ids
            .iter()
            .map(|id| (id.clone(), AssetQuote::new(id.as_str(), 100.0, 1.0)))
            .collect())
    }
}

struct MockNewsProvider {
    response: Result<Vec<NewsItem>, String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    fn name(&self) -> &str {
        "MockNews"
    }

    async fn fetch_news(&self, _limit: usize) -> Result<Vec<NewsItem>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(CoreError::Network)
    }
}

/// Records the last request and answers with a fixed text (or error).
struct MockSummaryProvider {
    response: Result<String, String>,
    last_request: Arc<Mutex<Option<GenerationRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl MockSummaryProvider {
    fn new(response: Result<&str, &str>) -> Self {
        Self {
            response: response.map(str::to_string).map_err(str::to_string),
            last_request: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SummaryProvider for MockSummaryProvider {
    fn name(&self) -> &str {
        "MockSummary"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.response.clone().map_err(|message| CoreError::Api {
            provider: "MockSummary".into(),
            message,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteService
// ═══════════════════════════════════════════════════════════════════

mod quote_service {
    use super::*;

    #[tokio::test]
    async fn fetches_and_caches() {
        let (provider, calls) = MockQuoteProvider::ok(quotes(1.0, 2.0));
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let first = service
            .get_quotes_at(&mut cache, &tracked_asset_ids(), t0())
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn second_fetch_within_five_minutes_uses_cache() {
        let (provider, calls) = MockQuoteProvider::ok(quotes(1.0, 2.0));
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);
        let ids = tracked_asset_ids();

        let first = service.get_quotes_at(&mut cache, &ids, t0()).await.unwrap();
        let second = service
            .get_quotes_at(&mut cache, &ids, t0() + Duration::seconds(299))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_after_five_minutes_calls_provider_again() {
        let (provider, calls) = MockQuoteProvider::ok(quotes(1.0, 2.0));
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);
        let ids = tracked_asset_ids();

        service.get_quotes_at(&mut cache, &ids, t0()).await.unwrap();
        service
            .get_quotes_at(&mut cache, &ids, t0() + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The refetch restamps the entry.
        service
            .get_quotes_at(&mut cache, &ids, t0() + Duration::minutes(6))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_returned_and_not_cached() {
        let (provider, calls) = MockQuoteProvider::failing("boom");
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);
        let ids = tracked_asset_ids();

        let err = service.get_quotes_at(&mut cache, &ids, t0()).await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
        assert!(cache.is_empty());

        assert!(service.get_quotes_at(&mut cache, &ids, t0()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn partial_provider_answer_is_missing_asset() {
        let mut partial = quotes(1.0, 2.0);
        partial.remove("ethereum");
        let (provider, _) = MockQuoteProvider::ok(partial);
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let err = service
            .get_quotes_at(&mut cache, &tracked_asset_ids(), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingAsset { ref asset_id } if asset_id == "ethereum"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn invalid_quote_is_rejected() {
        let mut bad = quotes(1.0, 2.0);
        bad.insert("bitcoin".into(), AssetQuote::new("bitcoin", f64::NAN, 1.0));
        let (provider, _) = MockQuoteProvider::ok(bad);
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        assert!(matches!(
            service.get_quotes_at(&mut cache, &tracked_asset_ids(), t0()).await,
            Err(CoreError::Api { .. })
        ));
    }

    #[tokio::test]
    async fn extra_assets_are_dropped() {
        let mut extra = quotes(1.0, 2.0);
        extra.insert("solana".into(), AssetQuote::new("solana", 200.0, 3.0));
        let (provider, _) = MockQuoteProvider::ok(extra);
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let got = service
            .get_quotes_at(&mut cache, &tracked_asset_ids(), t0())
            .await
            .unwrap();
        assert_eq!(got.len(), 2);
        assert!(!got.contains_key("solana"));
    }

    #[tokio::test]
    async fn empty_request_makes_no_call() {
        let (provider, calls) = MockQuoteProvider::ok(quotes(1.0, 2.0));
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let got = service.get_quotes_at(&mut cache, &[], t0()).await.unwrap();
        assert!(got.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ids_differing_in_case_share_one_cached_set() {
        let provider = EchoQuoteProvider::new();
        let (calls, last_request) = (provider.calls.clone(), provider.last_request.clone());
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let first = service
            .get_quotes_at(&mut cache, &["Bitcoin".to_string()], t0())
            .await
            .unwrap();
        assert!(first.contains_key("bitcoin"));
        assert_eq!(*last_request.lock().unwrap(), ["bitcoin"]);

        let second = service
            .get_quotes_at(&mut cache, &["bitcoin".to_string()], t0())
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second["bitcoin"].asset_id, "bitcoin");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_ids_are_requested_once() {
        let provider = EchoQuoteProvider::new();
        let last_request = provider.last_request.clone();
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);

        let got = service
            .get_quotes_at(
                &mut cache,
                &["bitcoin".to_string(), "bitcoin".to_string()],
                t0(),
            )
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert!(got.contains_key("bitcoin"));
        assert_eq!(*last_request.lock().unwrap(), ["bitcoin"]);
    }

    #[tokio::test]
    async fn wall_clock_lookup_reuses_fresh_entry() {
        let (provider, calls) = MockQuoteProvider::ok(quotes(1.0, 2.0));
        let service = QuoteService::new(Box::new(provider));
        let mut cache = QuoteCache::with_ttl_secs(300);
        let ids = tracked_asset_ids();

        let first = service.get_quotes(&mut cache, &ids).await.unwrap();
        let second = service.get_quotes(&mut cache, &ids).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// NewsService
// ═══════════════════════════════════════════════════════════════════

mod news_service {
    use super::*;

    fn service(response: Result<Vec<NewsItem>, String>) -> (NewsService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = MockNewsProvider {
            response,
            calls: calls.clone(),
        };
        (NewsService::new(Box::new(provider)), calls)
    }

    #[tokio::test]
    async fn returns_items_in_order() {
        let (service, _) = service(Ok(news(3)));
        let mut cache = NewsCache::with_ttl_secs(600);
        let items = service.get_news_at(&mut cache, 5, t0()).await;
        let titles: Vec<&str> = items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Headline 1", "Headline 2", "Headline 3"]);
    }

    #[tokio::test]
    async fn enforces_limit_even_if_provider_overshoots() {
        let (service, _) = service(Ok(news(9)));
        let mut cache = NewsCache::with_ttl_secs(600);
        assert_eq!(service.get_news_at(&mut cache, 5, t0()).await.len(), 5);
    }

    #[tokio::test]
    async fn failure_degrades_to_empty() {
        let (service, _) = service(Err("connection refused".into()));
        let mut cache = NewsCache::with_ttl_secs(600);
        let items = service.get_news_at(&mut cache, 5, t0()).await;
        assert!(items.is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn try_variant_reports_failure() {
        let (service, _) = service(Err("connection refused".into()));
        let mut cache = NewsCache::with_ttl_secs(600);
        let err = service.try_get_news_at(&mut cache, 5, t0()).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[tokio::test]
    async fn ten_minute_freshness_window() {
        let (service, calls) = service(Ok(news(5)));
        let mut cache = NewsCache::with_ttl_secs(600);

        service.get_news_at(&mut cache, 5, t0()).await;
        service
            .get_news_at(&mut cache, 5, t0() + Duration::minutes(9))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        service
            .get_news_at(&mut cache, 5, t0() + Duration::minutes(10))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_limit_makes_no_call() {
        let (service, calls) = service(Ok(news(5)));
        let mut cache = NewsCache::with_ttl_secs(600);
        assert!(service.get_news_at(&mut cache, 0, t0()).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wall_clock_lookup_reuses_fresh_entry() {
        let (service, calls) = service(Ok(news(5)));
        let mut cache = NewsCache::with_ttl_secs(600);

        let first = service.get_news(&mut cache, 3).await;
        let second = service.get_news(&mut cache, 3).await;

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SummaryService
// ═══════════════════════════════════════════════════════════════════

mod summary_service {
    use super::*;

    fn service(provider: MockSummaryProvider) -> SummaryService {
        SummaryService::new(Box::new(provider), &Settings::default())
    }

    #[test]
    fn prompt_contains_both_assets_to_two_decimals() {
        let svc = service(MockSummaryProvider::new(Ok("x")));
        let prompt = svc
            .build_prompt(&tracked_assets(), &quotes(1.23456, -0.5), &news(2))
            .unwrap();

        assert!(prompt.contains("- Bitcoin: $97,123.46 (24h change: 1.23%)"));
        assert!(prompt.contains("- Ethereum: $3,456.79 (24h change: -0.50%)"));
        assert!(prompt.starts_with("Analyze this cryptocurrency market data"));
        assert!(prompt.contains("3-4 sentences"));
        assert!(prompt.contains("Key market movements"));
        assert!(prompt.contains("Notable trends"));
        assert!(prompt.contains("What to watch for"));
        assert!(prompt.ends_with("Be objective and data-driven."));
    }

    #[test]
    fn prompt_has_at_most_three_headlines() {
        let svc = service(MockSummaryProvider::new(Ok("x")));
        let prompt = svc
            .build_prompt(&tracked_assets(), &quotes(1.0, 1.0), &news(5))
            .unwrap();

        assert!(prompt.contains("- Headline 1"));
        assert!(prompt.contains("- Headline 2"));
        assert!(prompt.contains("- Headline 3"));
        assert!(!prompt.contains("Headline 4"));
        assert!(!prompt.contains("Headline 5"));
    }

    #[test]
    fn prompt_without_news_still_builds() {
        let svc = service(MockSummaryProvider::new(Ok("x")));
        let prompt = svc
            .build_prompt(&tracked_assets(), &quotes(1.0, 1.0), &[])
            .unwrap();
        assert!(prompt.contains("Recent News Headlines:\n\n"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let svc = service(MockSummaryProvider::new(Ok("x")));
        let q = quotes(1.0, -1.0);
        let n = news(4);
        let a = svc.build_prompt(&tracked_assets(), &q, &n).unwrap();
        let b = svc.build_prompt(&tracked_assets(), &q, &n).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_requires_every_asset_quote() {
        let svc = service(MockSummaryProvider::new(Ok("x")));
        let mut q = quotes(1.0, 1.0);
        q.remove("bitcoin");
        let err = svc.build_prompt(&tracked_assets(), &q, &[]).unwrap_err();
        assert!(matches!(err, CoreError::MissingAsset { ref asset_id } if asset_id == "bitcoin"));
    }

    #[tokio::test]
    async fn generate_sends_model_and_token_ceiling() {
        let provider = MockSummaryProvider::new(Ok("Bitcoin led the market higher."));
        let last_request = provider.last_request.clone();
        let svc = service(provider);

        let summary = svc.generate_summary("the prompt").await;
        assert!(!summary.is_fallback());
        assert_eq!(summary.text, "Bitcoin led the market higher.");

        let request = last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "claude-sonnet-4-20250514");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.prompt, "the prompt");
    }

    #[tokio::test]
    async fn provider_failure_becomes_fallback_text() {
        let provider = MockSummaryProvider::new(Err("invalid x-api-key"));
        let calls = provider.calls.clone();
        let svc = service(provider);

        let summary = svc.generate_summary("p").await;
        assert!(summary.is_fallback());
        assert!(!summary.text.is_empty());
        assert!(summary.text.starts_with(FALLBACK_PREFIX));
        assert!(summary.text.contains("invalid x-api-key"));
        // No retry.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_output_becomes_fallback_text() {
        let svc = service(MockSummaryProvider::new(Ok("   ")));
        let summary = svc.generate_summary("p").await;
        assert!(summary.is_fallback());
        assert!(summary.text.contains("Empty response from MockSummary"));
    }

    #[tokio::test]
    async fn try_generate_exposes_error() {
        let svc = service(MockSummaryProvider::new(Err("down")));
        assert!(matches!(
            svc.try_generate("p").await,
            Err(CoreError::Api { .. })
        ));
    }
}
