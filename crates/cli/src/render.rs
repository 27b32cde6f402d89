use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use crypto_briefing_core::errors::CoreError;
use crypto_briefing_core::models::news::NewsItem;
use crypto_briefing_core::models::price::format_usd;
use crypto_briefing_core::models::sentiment::MarketSentiment;
use crypto_briefing_core::models::snapshot::{DashboardSnapshot, RefreshFailure, RefreshOutcome};
use serde_json::json;
use std::fmt::Write as _;

const TITLE: &str = "🤖 Crypto AI Briefing Dashboard";
const RULE: &str = "────────────────────────────────────────────────────────────";
const PRICES_UNAVAILABLE: &str = "Unable to fetch cryptocurrency data. Please check your API keys.";
const NO_NEWS: &str = "No news available at the moment.";

/// Full page for one refresh.
pub fn render_outcome(outcome: &RefreshOutcome, providers: [&str; 3]) -> String {
    let mut out = String::new();
    out.push_str(&render_header(outcome.refreshed_at()));

    match outcome {
        RefreshOutcome::Ready(snapshot) => out.push_str(&render_snapshot(snapshot)),
        RefreshOutcome::Unavailable(failure) => out.push_str(&render_failure(failure)),
    }

    let _ = writeln!(out, "{RULE}");
    let [prices, news, summary] = providers;
    let _ = writeln!(
        out,
        "{}",
        format!("Data provided by {prices} • News from {news} • AI Analysis by {summary}").dimmed()
    );
    out
}

fn render_header(refreshed_at: DateTime<Utc>) -> String {
    let local = refreshed_at.with_timezone(&Local);
    format!(
        "{}\n{}\n\n",
        TITLE.bold(),
        format!("Last updated: {}", local.format("%B %d, %Y at %I:%M %p")).dimmed()
    )
}

fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    for (asset, quote) in snapshot.priced_assets() {
        let _ = writeln!(
            out,
            "{:<20} {:>14}  {}",
            asset.label().bold(),
            format!("${}", format_usd(quote.price_usd, 0)),
            format_change(quote.change_24h_pct)
        );
    }
    out.push_str(&render_sentiment(&snapshot.sentiment));

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "{}\n", "🧠 AI Market Analysis".bold());
    let _ = writeln!(out, "{}", snapshot.summary_text());

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "{}\n", "📰 Latest Crypto News".bold());
    out.push_str(&render_news(&snapshot.news));
    out
}

fn render_sentiment(sentiment: &MarketSentiment) -> String {
    format!(
        "{:<20} {:>14}  {}\n",
        "Market Sentiment".bold(),
        format!("{} {}", sentiment.label, sentiment.label.emoji()),
        format_change(sentiment.average_change_pct)
    )
}

fn render_news(news: &[NewsItem]) -> String {
    if news.is_empty() {
        return format!("{NO_NEWS}\n");
    }

    let mut out = String::new();
    for item in news {
        let _ = writeln!(out, "{}", item.title.bold());
        let _ = writeln!(
            out,
            "  {}\n",
            format!(
                "{} • {}",
                item.source_name,
                item.published_at.format("%Y-%m-%d %H:%M UTC")
            )
            .dimmed()
        );
    }
    out
}

fn render_failure(failure: &RefreshFailure) -> String {
    format!(
        "{}\n{}\n",
        PRICES_UNAVAILABLE.red().bold(),
        format!("Reason ({}): {}", failure.stage, failure.error).dimmed()
    )
}

/// Startup banner for missing credentials.
pub fn render_config_error(error: &CoreError) -> String {
    format!(
        "⚠️ API keys not configured. Set them in the environment or a .env file.\n{error}"
    )
}

/// "▲ 1.23%" in green, "▼ 1.23%" in red.
pub fn format_change(change_pct: f64) -> String {
    if change_pct >= 0.0 {
        format!("▲ {:.2}%", change_pct).green().to_string()
    } else {
        format!("▼ {:.2}%", change_pct.abs()).red().to_string()
    }
}

pub fn refresh_prompt() -> String {
    "[Enter] refresh   [f] force refresh   [q] quit".dimmed().to_string()
}

/// Machine-readable form of an outcome.
pub fn outcome_json(outcome: &RefreshOutcome) -> serde_json::Value {
    match outcome {
        RefreshOutcome::Ready(snapshot) => json!({ "status": "ready", "snapshot": snapshot }),
        RefreshOutcome::Unavailable(failure) => json!({
            "status": "unavailable",
            "stage": failure.stage,
            "error": failure.error.to_string(),
            "refreshed_at": failure.refreshed_at,
        }),
    }
}
