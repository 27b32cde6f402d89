use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::news::NewsItem;
use super::traits::NewsProvider;

const BASE_URL: &str = "https://cryptopanic.com/api/v1";
const PROVIDER: &str = "CryptoPanic";

/// CryptoPanic posts provider for crypto news.
///
/// - **Requires**: auth token, passed as the `auth_token` query parameter.
/// - **Endpoint**: `/posts/?auth_token={key}&public=true`
///
/// The token travels in the URL, so transport errors are reported with the
/// query string redacted (see `CoreError::from(reqwest::Error)`).
pub struct CryptoPanicProvider {
    client: Client,
    auth_token: String,
    base_url: String,
}

impl CryptoPanicProvider {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self::with_base_url(auth_token, BASE_URL)
    }

    pub fn with_base_url(auth_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            auth_token: auth_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Parse a posts body, keeping provider order and at most `limit` items.
    /// Posts with an unparseable `published_at` are skipped.
    pub fn parse_posts(body: &str, limit: usize) -> Result<Vec<NewsItem>, CoreError> {
        let resp: PostsResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse posts response: {e}"),
        })?;

        let items = resp
            .results
            .into_iter()
            .filter_map(|post| {
                let published_at = match DateTime::parse_from_rfc3339(&post.published_at) {
                    Ok(ts) => ts.with_timezone(&Utc),
                    Err(e) => {
                        tracing::warn!(
                            title = %post.title,
                            published_at = %post.published_at,
                            "skipping news item with bad timestamp: {e}"
                        );
                        return None;
                    }
                };
                Some(NewsItem::new(post.title, post.source.title, published_at))
            })
            .take(limit)
            .collect();

        Ok(items)
    }
}

// ── CryptoPanic API response types ──────────────────────────────────

#[derive(Deserialize)]
struct PostsResponse {
    #[serde(default)]
    results: Vec<Post>,
}

#[derive(Deserialize)]
struct Post {
    title: String,
    source: PostSource,
    published_at: String,
}

#[derive(Deserialize)]
struct PostSource {
    title: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NewsProvider for CryptoPanicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_news(&self, limit: usize) -> Result<Vec<NewsItem>, CoreError> {
        let url = format!("{}/posts/", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("auth_token", self.auth_token.as_str()), ("public", "true")])
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
        Self::parse_posts(&body, limit)
    }
}
