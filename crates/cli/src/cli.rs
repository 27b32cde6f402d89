use clap::Parser;
use crypto_briefing_core::models::news::DEFAULT_NEWS_LIMIT;
use crypto_briefing_core::models::settings::Settings;

// cli framework:
// "> crypto-briefing [--once] [--json] [--news-limit N] [--model ID]"
#[derive(Debug, Parser)]
#[command(
    name = "crypto-briefing",
    version,
    about = "Bitcoin and Ethereum prices, crypto news and an AI market briefing in the terminal"
)]
pub struct Cli {
    /// Render one refresh and exit instead of waiting for input
    #[arg(long)]
    pub once: bool,

    /// Print the refresh as JSON and exit
    #[arg(long)]
    pub json: bool,

    /// Number of news items to show (at most 5)
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_NEWS_LIMIT as u8,
        value_parser = clap::value_parser!(u8).range(0..=DEFAULT_NEWS_LIMIT as i64)
    )]
    pub news_limit: u8,

    /// Text-generation model identifier
    #[arg(long, value_name = "ID")]
    pub model: Option<String>,
}

impl Cli {
    /// Pipeline settings with command line overrides applied.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            news_limit: usize::from(self.news_limit),
            ..Settings::default()
        };
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        settings
    }

    /// Whether to stay open for refresh input after the first render.
    pub fn interactive(&self) -> bool {
        !self.once && !self.json
    }
}

/// What the user asked for at the refresh prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Refresh, reusing fresh cached data.
    Refresh,
    /// Clear caches, then refresh.
    ForceRefresh,
    Quit,
    Unknown,
}

impl Action {
    pub fn from_input(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "r" | "refresh" => Action::Refresh,
            "f" | "force" => Action::ForceRefresh,
            "q" | "quit" | "exit" => Action::Quit,
            _ => Action::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_settings() {
        let cli = Cli::try_parse_from(["crypto-briefing"]).unwrap();
        assert!(cli.interactive());
        assert_eq!(cli.settings(), Settings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cli = Cli::try_parse_from([
            "crypto-briefing",
            "--news-limit",
            "2",
            "--model",
            "claude-test",
            "--once",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(settings.news_limit, 2);
        assert_eq!(settings.model, "claude-test");
        assert!(!cli.interactive());
    }

    #[test]
    fn news_limit_above_five_is_rejected() {
        assert!(Cli::try_parse_from(["crypto-briefing", "--news-limit", "6"]).is_err());
    }

    #[test]
    fn json_is_not_interactive() {
        let cli = Cli::try_parse_from(["crypto-briefing", "--json"]).unwrap();
        assert!(!cli.interactive());
    }

    #[test]
    fn actions_from_input() {
        assert_eq!(Action::from_input("\n"), Action::Refresh);
        assert_eq!(Action::from_input("R"), Action::Refresh);
        assert_eq!(Action::from_input(" f "), Action::ForceRefresh);
        assert_eq!(Action::from_input("quit"), Action::Quit);
        assert_eq!(Action::from_input("xyz"), Action::Unknown);
    }
}
