//! # Financial News Dashboard
//!
//! A terminal dashboard for the latest Finance, Cryptocurrency, Stock Market
//! and ESG headlines, backed by the NewsAPI `everything` endpoint.
//!
//! ## Features
//!
//! - Fixed topical categories mapped to canned search expressions
//! - Day-window and article-count filters, adjustable from an interactive prompt
//! - Renders each article as a Markdown card (image, title, source, date, description)
//! - Memoizes identical requests for one hour so re-rendering is free
//! - Optional JSON snapshot export of every successful page
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... fin_news_dashboard --category crypto --days 7
//! ```
//!
//! ## Architecture
//!
//! 1. **Credential**: Resolve the API key from the secret store, else prompt
//! 2. **Fetching**: One GET per render pass, through a time-bounded cache
//! 3. **Rendering**: Cards or an error banner, printed as Markdown
//! 4. **Loop**: Re-render on refresh or filter changes until `quit`

use clap::Parser;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cache;
mod cli;
mod config;
mod credentials;
mod dashboard;
mod error;
mod models;
mod outputs;
mod utils;

use api::build_fetcher;
use cli::Cli;
use config::DashboardConfig;
use credentials::{CredentialProvider, PromptCredentials, SecretStoreCredentials};
use dashboard::Session;
use models::QueryParams;
use utils::{Clock, SystemClock, ensure_writable_dir};

const DEFAULT_SECRETS_FILE: &str = "secrets.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries the rendered page, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fin_news_dashboard starting up");

    let args = Cli::parse();
    debug!(
        category = %args.category,
        days = args.days,
        count = args.count,
        once = args.once,
        "Parsed CLI arguments"
    );

    let config = DashboardConfig::load(args.config.as_deref())?;

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Credential + Dashboard ----
    let secrets_file = args
        .secrets_file
        .clone()
        .or_else(|| config.secrets_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE));
    let mut store = SecretStoreCredentials::new(args.api_key.clone()).with_secrets_file(&secrets_file)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let fetcher = build_fetcher(&config, Arc::clone(&clock))?;
    let params = QueryParams {
        category: args.category,
        days: args.days,
        count: args.count,
    };
    let placeholder = config.placeholder_image.clone();
    let mut stdout = io::stdout().lock();

    let started = if args.no_prompt {
        Session::start(
            &mut [&mut store as &mut dyn CredentialProvider],
            fetcher,
            params,
            placeholder,
            &secrets_file,
            &mut stdout,
        )?
    } else {
        let mut prompt = PromptCredentials::new(io::stdin().lock(), io::stderr());
        Session::start(
            &mut [
                &mut store as &mut dyn CredentialProvider,
                &mut prompt as &mut dyn CredentialProvider,
            ],
            fetcher,
            params,
            placeholder,
            &secrets_file,
            &mut stdout,
        )?
    };

    let Some(session) = started else {
        return Ok(());
    };
    let mut session = session
        .with_json_output_dir(args.json_output_dir.clone())
        .with_clock(clock);

    let renders = if args.once {
        session.render(&mut stdout).await?;
        1
    } else {
        session.run(io::stdin().lock(), &mut stdout).await?
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        renders,
        last_category = %session.params().category,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
