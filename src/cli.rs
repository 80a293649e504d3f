//! Command-line interface definitions for the Financial News Dashboard.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The credential and secrets file can also be provided via environment variables.

use crate::models::{Category, DEFAULT_COUNT, DEFAULT_DAYS, parse_count, parse_days};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the dashboard.
///
/// The three filters mirror the dashboard sidebar and only set the starting
/// state; they can be changed from the interactive prompt afterwards.
///
/// # Examples
///
/// ```sh
/// # Interactive dashboard, key from the environment
/// NEWS_API_KEY=... fin_news_dashboard
///
/// # One page of crypto news from the last week
/// fin_news_dashboard --category crypto --days 7 --count 20 --once
///
/// # Also export each page as JSON
/// fin_news_dashboard -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News category to show
    #[arg(short = 'C', long, value_enum, default_value_t = Category::Finance)]
    pub category: Category,

    /// Show news from the last N days (1-7)
    #[arg(short, long, default_value_t = DEFAULT_DAYS, value_parser = parse_days)]
    pub days: u32,

    /// Number of articles to display (5-30)
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
    pub count: u32,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// YAML secrets file holding NEWS_API_KEY (overrides the config file)
    #[arg(long, env = "NEWS_SECRETS_FILE")]
    pub secrets_file: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for JSON snapshots of each page
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Render a single page and exit
    #[arg(long)]
    pub once: bool,

    /// Never prompt for the API key; exit if none is configured
    #[arg(long)]
    pub no_prompt: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["fin_news_dashboard"]);

        assert_eq!(cli.category, Category::Finance);
        assert_eq!(cli.days, 3);
        assert_eq!(cli.count, 10);
        assert!(!cli.once);
        assert!(cli.json_output_dir.is_none());
    }

    #[test]
    fn test_cli_filters() {
        let cli = Cli::parse_from([
            "fin_news_dashboard",
            "--category",
            "stock-market",
            "--days",
            "7",
            "--count",
            "30",
            "--once",
        ]);

        assert_eq!(cli.category, Category::StockMarket);
        assert_eq!(cli.days, 7);
        assert_eq!(cli.count, 30);
        assert!(cli.once);
    }

    #[test]
    fn test_cli_short_flags_and_alias() {
        let cli = Cli::parse_from([
            "fin_news_dashboard",
            "-C",
            "crypto",
            "-d",
            "1",
            "-n",
            "5",
            "-j",
            "/tmp/json",
        ]);

        assert_eq!(cli.category, Category::Cryptocurrency);
        assert_eq!(cli.days, 1);
        assert_eq!(cli.count, 5);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_cli_rejects_out_of_range_filters() {
        assert!(Cli::try_parse_from(["fin_news_dashboard", "--days", "8"]).is_err());
        assert!(Cli::try_parse_from(["fin_news_dashboard", "--count", "4"]).is_err());
        assert!(Cli::try_parse_from(["fin_news_dashboard", "--category", "sports"]).is_err());
    }
}
