use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::{AssetQuote, QuoteSet};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER: &str = "CoinGecko";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko `simple/price` provider.
///
/// - **Requires**: demo API key, sent in the `x-cg-demo-api-key` header.
/// - **Endpoint**: `/simple/price?ids=bitcoin,ethereum&vs_currencies=usd&include_24hr_change=true`
///
/// CoinGecko keys its response by the lowercase coin id ("bitcoin"),
/// the same id the dashboard tracks assets by.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the provider at a different host (proxies, paid plans).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Parse a `simple/price` body into quotes for exactly `asset_ids`.
    ///
    /// Fails if any requested id is absent or lacks a price or change.
    pub fn parse_quotes(body: &str, asset_ids: &[String]) -> Result<QuoteSet, CoreError> {
        let resp: SimplePriceResponse =
            serde_json::from_str(body).map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse price response: {e}"),
            })?;

        let mut quotes = QuoteSet::with_capacity(asset_ids.len());
        for id in asset_ids {
            let entry = resp.get(id).ok_or_else(|| CoreError::MissingAsset {
                asset_id: id.clone(),
            })?;

            let price_usd = entry.usd.ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No USD price for {id}"),
            })?;
            let change_24h_pct = entry.usd_24h_change.ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No 24h change for {id}"),
            })?;

            let quote = AssetQuote::new(id.clone(), price_usd, change_24h_pct);
            if !quote.is_valid() {
                return Err(CoreError::Api {
                    provider: PROVIDER.into(),
                    message: format!(
                        "Invalid quote for {id}: price {price_usd}, change {change_24h_pct}"
                    ),
                });
            }
            quotes.insert(id.clone(), quote);
        }

        Ok(quotes)
    }
}

// ── CoinGecko API response types ────────────────────────────────────

type SimplePriceResponse = HashMap<String, SimplePriceEntry>;

#[derive(Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_quotes(&self, asset_ids: &[String]) -> Result<QuoteSet, CoreError> {
        let url = format!("{}/simple/price", self.base_url);
        let ids = asset_ids.join(",");

        let resp = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[
                ("ids", ids.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Http {
                provider: PROVIDER.into(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Self::parse_quotes(&body, asset_ids)
    }
}
