use std::fmt::Write as _;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::news::NewsItem;
use crate::models::price::{format_usd, QuoteSet};
use crate::models::settings::Settings;
use crate::models::summary::MarketSummary;
use crate::providers::traits::{GenerationRequest, SummaryProvider};

const PROMPT_HEADER: &str =
    "Analyze this cryptocurrency market data and provide a brief summary:";

const PROMPT_INSTRUCTIONS: &str = "Provide a concise analysis in 3-4 sentences covering:
1. Key market movements
2. Notable trends
3. What to watch for

Be objective and data-driven.";

/// Builds the summary prompt and asks the generation provider for text.
///
/// Generation is a single call with no retry. Its failures never leave this
/// service: they become a fallback `MarketSummary` naming the reason.
pub struct SummaryService {
    provider: Box<dyn SummaryProvider>,
    model: String,
    max_tokens: u32,
    headline_limit: usize,
}

impl SummaryService {
    pub fn new(provider: Box<dyn SummaryProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            headline_limit: settings.headline_limit,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Format the prompt: one price line per asset (in `assets` order), then
    /// at most `headline_limit` headlines, then the fixed instructions.
    ///
    /// Every asset must have a quote in `quotes`.
    pub fn build_prompt(
        &self,
        assets: &[Asset],
        quotes: &QuoteSet,
        news: &[NewsItem],
    ) -> Result<String, CoreError> {
        let mut prompt = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(prompt, "{PROMPT_HEADER}\n");

        prompt.push_str("Price Data:\n");
        for asset in assets {
            let quote = quotes.get(&asset.id).ok_or_else(|| CoreError::MissingAsset {
                asset_id: asset.id.clone(),
            })?;
            let _ = writeln!(
                prompt,
                "- {}: ${} (24h change: {:.2}%)",
                asset.name,
                format_usd(quote.price_usd, 2),
                quote.change_24h_pct
            );
        }

        prompt.push_str("\nRecent News Headlines:\n");
        for item in news.iter().take(self.headline_limit) {
            let _ = writeln!(prompt, "- {}", item.title);
        }

        prompt.push('\n');
        prompt.push_str(PROMPT_INSTRUCTIONS);
        Ok(prompt)
    }

    /// Ask the provider for a summary of `prompt`, falling back to a
    /// descriptive message on any failure.
    pub async fn generate_summary(&self, prompt: &str) -> MarketSummary {
        match self.try_generate(prompt).await {
            Ok(text) => {
                info!(provider = self.provider.name(), chars = text.len(), "generated summary");
                MarketSummary::generated(text)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), "summary generation failed: {e}");
                MarketSummary::fallback(e)
            }
        }
    }

    /// The provider call without the fallback.
    pub async fn try_generate(&self, prompt: &str) -> Result<String, CoreError> {
        let request = GenerationRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            prompt: prompt.to_string(),
        };
        let text = self.provider.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(CoreError::EmptyResponse {
                provider: self.provider.name().to_string(),
            });
        }
        Ok(text)
    }
}
