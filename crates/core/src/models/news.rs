use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of news items kept per refresh.
pub const DEFAULT_NEWS_LIMIT: usize = 5;

/// A single news headline, in the order the provider returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub source_name: String,
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        source_name: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            source_name: source_name.into(),
            published_at,
        }
    }
}
