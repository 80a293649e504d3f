//! JSON snapshot export of successful dashboard pages.
//!
//! Files are organized by date with the category slug as the name:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── finance.json
//!     └── esg.json
//! ```
//!
//! Snapshots are write-only; the dashboard never reads them back, so a later
//! render of the same category on the same day simply overwrites the file.

use crate::models::{Article, Category, DateWindow, NewsResponse, QueryParams};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// What gets written for one page.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub generated_at: DateTime<Local>,
    pub category: Category,
    pub query: &'static str,
    pub days: u32,
    pub count: u32,
    pub window: DateWindow,
    pub total_results: Option<u64>,
    pub articles: &'a [Article],
}

impl<'a> DashboardSnapshot<'a> {
    pub fn new(response: &'a NewsResponse, params: &QueryParams, now: DateTime<Local>) -> Self {
        Self {
            generated_at: now,
            category: params.category,
            query: params.category.search_query(),
            days: params.days,
            count: params.count,
            window: response
                .window
                .unwrap_or_else(|| DateWindow::ending_at(now, params.days)),
            total_results: response.total_results,
            articles: &response.articles,
        }
    }
}

/// Write the page for `params` to `{json_output_dir}/{date}/{category}.json`.
///
/// # Returns
///
/// The path of the written file, or an error if directory creation,
/// serialization or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, category = %params.category))]
pub async fn write_snapshot(
    response: &NewsResponse,
    params: &QueryParams,
    now: DateTime<Local>,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let snapshot = DashboardSnapshot::new(response, params, now);
    let json = serde_json::to_string_pretty(&snapshot)?;

    let dated_dir = PathBuf::from(json_output_dir).join(now.date_naive().format("%Y-%m-%d").to_string());
    if let Err(e) = fs::create_dir_all(&dated_dir).await {
        error!(dir = %dated_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = dated_dir.join(format!("{}.json", params.category.slug()));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = response.articles.len(), "Wrote JSON snapshot");
    Ok(path)
}
