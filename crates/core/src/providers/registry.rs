use crate::models::settings::Credentials;

use super::anthropic::AnthropicProvider;
use super::coingecko::CoinGeckoProvider;
use super::cryptopanic::CryptoPanicProvider;
use super::traits::{NewsProvider, QuoteProvider, SummaryProvider};

/// The three upstream services the dashboard reads from.
///
/// Swapping one provider (or a test double) touches only this struct;
/// services only see the traits.
pub struct ProviderRegistry {
    pub quotes: Box<dyn QuoteProvider>,
    pub news: Box<dyn NewsProvider>,
    pub summary: Box<dyn SummaryProvider>,
}

impl ProviderRegistry {
    pub fn new(
        quotes: Box<dyn QuoteProvider>,
        news: Box<dyn NewsProvider>,
        summary: Box<dyn SummaryProvider>,
    ) -> Self {
        Self {
            quotes,
            news,
            summary,
        }
    }

    /// CoinGecko, CryptoPanic and Anthropic, keyed with `credentials`.
    pub fn new_with_defaults(credentials: &Credentials) -> Self {
        Self::new(
            Box::new(CoinGeckoProvider::new(credentials.coingecko_api_key.clone())),
            Box::new(CryptoPanicProvider::new(credentials.cryptopanic_api_key.clone())),
            Box::new(AnthropicProvider::new(credentials.anthropic_api_key.clone())),
        )
    }

    /// Provider names in pipeline order, for logs and the page footer.
    pub fn names(&self) -> [&str; 3] {
        [self.quotes.name(), self.news.name(), self.summary.name()]
    }
}
