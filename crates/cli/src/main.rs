use anyhow::{anyhow, Result};
use clap::Parser;
use crypto_briefing_core::models::settings::Credentials;
use crypto_briefing_core::models::snapshot::RefreshOutcome;
use crypto_briefing_core::CryptoDashboard;
use tokio::io::{AsyncBufReadExt, BufReader};

mod cli;
mod logging;
mod render;

use cli::{Action, Cli};

fn preprocess() {
    // grant access to .env
    dotenv::dotenv().ok();

    // initialise logger
    logging::init();
}

// The pipeline makes its calls one after another; one thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    preprocess();
    let cli = Cli::parse();
    tracing::debug!("Command line input recorded: {cli:?}");

    // Missing keys stop the program before any request is made.
    let credentials =
        Credentials::from_env().map_err(|e| anyhow!(render::render_config_error(&e)))?;

    let mut dashboard = CryptoDashboard::new(&credentials, cli.settings());
    tracing::info!(providers = ?dashboard.provider_names(), "dashboard ready");

    let outcome = dashboard.refresh().await;
    show(&cli, &dashboard, &outcome)?;
    if !cli.interactive() {
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("{}", render::refresh_prompt());
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match Action::from_input(&line) {
            Action::Refresh => dashboard.refresh().await,
            Action::ForceRefresh => dashboard.force_refresh().await,
            Action::Quit => break,
            Action::Unknown => continue,
        };
        show(&cli, &dashboard, &outcome)?;
    }

    Ok(())
}

fn show(cli: &Cli, dashboard: &CryptoDashboard, outcome: &RefreshOutcome) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&render::outcome_json(outcome))?);
    } else {
        println!("{}", render::render_outcome(outcome, dashboard.provider_names()));
    }
    Ok(())
}
