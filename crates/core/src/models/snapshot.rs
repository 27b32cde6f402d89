use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use super::asset::Asset;
use super::news::NewsItem;
use super::price::{AssetQuote, QuoteSet};
use super::sentiment::MarketSentiment;
use super::summary::MarketSummary;

/// Stages of one dashboard refresh, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    FetchPrices,
    FetchNews,
    DeriveAndSummarize,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::FetchPrices => write!(f, "fetch prices"),
            PipelineStage::FetchNews => write!(f, "fetch news"),
            PipelineStage::DeriveAndSummarize => write!(f, "derive and summarize"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

/// Everything the front end needs to draw one refresh.
/// Built once per refresh and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Tracked assets in display order.
    pub assets: Vec<Asset>,
    pub quotes: QuoteSet,
    pub news: Vec<NewsItem>,
    pub sentiment: MarketSentiment,
    pub summary: MarketSummary,
    pub refreshed_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn quote(&self, asset_id: &str) -> Option<&AssetQuote> {
        self.quotes.get(asset_id)
    }

    /// Tracked assets paired with their quotes, in display order.
    pub fn priced_assets(&self) -> Vec<(&Asset, &AssetQuote)> {
        self.assets
            .iter()
            .filter_map(|asset| self.quote(&asset.id).map(|quote| (asset, quote)))
            .collect()
    }

    pub fn summary_text(&self) -> &str {
        &self.summary.text
    }
}

/// Why a refresh could not produce a snapshot.
#[derive(Debug)]
pub struct RefreshFailure {
    /// Stage whose failure suppressed the snapshot.
    pub stage: PipelineStage,
    pub error: CoreError,
    pub refreshed_at: DateTime<Utc>,
}

/// Result of one pipeline run.
#[derive(Debug)]
pub enum RefreshOutcome {
    Ready(DashboardSnapshot),
    /// Aggregate failure: primary data (prices) is unavailable.
    Unavailable(RefreshFailure),
}

impl RefreshOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, RefreshOutcome::Ready(_))
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            RefreshOutcome::Ready(snapshot) => Some(snapshot),
            RefreshOutcome::Unavailable(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&RefreshFailure> {
        match self {
            RefreshOutcome::Ready(_) => None,
            RefreshOutcome::Unavailable(failure) => Some(failure),
        }
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        match self {
            RefreshOutcome::Ready(snapshot) => snapshot.refreshed_at,
            RefreshOutcome::Unavailable(failure) => failure.refreshed_at,
        }
    }
}
