//! The dashboard: turning fetch outcomes into cards, and the render loop.
//!
//! A render pass is one fetch (or cache hit) followed by one printed page.
//! The page shows either one [`ArticleCard`] per article or a single
//! [`Banner`] explaining why there are none. Neither an API error nor a
//! transport failure ends the loop; only `quit` or end of input does.

use crate::api::FetchNews;
use crate::credentials::{CredentialProvider, missing_credential_help, resolve_credential};
use crate::error::{FetchError, ParamError};
use crate::models::{Article, Category, FetchRequest, NewsResponse, QueryParams, parse_count, parse_days};
use crate::outputs::{json, markdown};
use crate::utils::{Clock, SystemClock, published_date};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Shown when an API error response carries no `message`.
pub const UNKNOWN_API_ERROR: &str = "Unknown error";
/// Headline of the banner for transport and decode failures.
pub const FETCH_FAILED: &str = "Failed to fetch news data";

/// One article, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub image: String,
    pub image_is_placeholder: bool,
    pub title: String,
    pub url: String,
    pub source: String,
    /// `YYYY-MM-DD` part of `publishedAt`.
    pub published: String,
    pub description: String,
}

impl ArticleCard {
    pub fn from_article(article: &Article, placeholder: &str) -> Self {
        let (image, image_is_placeholder) =
            image_or_placeholder(article.url_to_image.as_deref(), placeholder);
        Self {
            image,
            image_is_placeholder,
            title: article.title.clone(),
            url: article.url.clone(),
            source: article.source.name.clone(),
            published: published_date(&article.published_at).to_string(),
            description: article.description.clone().unwrap_or_default(),
        }
    }
}

/// Best-effort image, else placeholder.
///
/// The article image is used only when it is present, non-blank and an
/// absolute `http`/`https` URL. Missing, broken and unsupported images are
/// not distinguished; all of them get the placeholder.
pub fn image_or_placeholder(url_to_image: Option<&str>, placeholder: &str) -> (String, bool) {
    let usable = url_to_image
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Url::parse(s).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some());
    match usable {
        Some(url) => (url.to_string(), false),
        None => (placeholder.to_string(), true),
    }
}

/// Why a page has no cards.
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    /// The response decoded but `status != "ok"`.
    ApiError { message: String },
    /// The fetch itself failed; `diagnostic` is a one-line description.
    FetchFailed { diagnostic: String },
}

impl Banner {
    /// The text shown to the user as the error.
    pub fn message(&self) -> &str {
        match self {
            Banner::ApiError { message } => message,
            Banner::FetchFailed { .. } => FETCH_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Cards(Vec<ArticleCard>),
    Banner(Banner),
}

impl DashboardView {
    pub fn from_outcome(outcome: &Result<Arc<NewsResponse>, FetchError>, placeholder: &str) -> Self {
        match outcome {
            Ok(response) if response.is_ok() => DashboardView::Cards(
                response
                    .articles
                    .iter()
                    .map(|article| ArticleCard::from_article(article, placeholder))
                    .collect(),
            ),
            Ok(response) => DashboardView::Banner(Banner::ApiError {
                message: response
                    .message
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
            }),
            Err(e) => DashboardView::Banner(Banner::FetchFailed {
                diagnostic: format!("Error fetching news: {}", single_line(&e.to_string())),
            }),
        }
    }

    pub fn cards(&self) -> &[ArticleCard] {
        match self {
            DashboardView::Cards(cards) => cards,
            DashboardView::Banner(_) => &[],
        }
    }

    pub fn banner(&self) -> Option<&Banner> {
        match self {
            DashboardView::Banner(banner) => Some(banner),
            DashboardView::Cards(_) => None,
        }
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A line of input to the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Refresh,
    Update(QueryParams),
    Help,
    Quit,
}

/// Interpret one input line against the current filters.
///
/// Filter updates are `key=value` tokens (`category=`, `days=`, `count=`, or
/// their one-letter forms) and may be combined on one line. An invalid token
/// rejects the whole line, leaving the filters unchanged.
pub fn parse_command(line: &str, current: QueryParams) -> Result<Command, ParamError> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "r" | "refresh" => return Ok(Command::Refresh),
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "h" | "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    let mut params = current;
    for token in trimmed.split_whitespace() {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ParamError::UnknownCommand(token.to_string()))?;
        match key.to_ascii_lowercase().as_str() {
            "category" | "c" => params.category = value.parse::<Category>()?,
            "days" | "d" => params.days = parse_days(value)?,
            "count" | "n" => params.count = parse_count(value)?,
            _ => return Err(ParamError::UnknownCommand(token.to_string())),
        }
    }
    Ok(Command::Update(params))
}

/// Usage text for the render loop.
pub fn help_text() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.slug())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Commands:\n\
         \x20 <enter> | refresh        re-render with the current filters\n\
         \x20 category=<name>          one of: {categories} (also: crypto, stocks)\n\
         \x20 days=<1-7>               news from the last N days\n\
         \x20 count=<5-30>             number of articles to display\n\
         \x20 help                     show this text\n\
         \x20 quit                     leave the dashboard\n\
         Filters can be combined, e.g. `category=esg days=7 count=20`."
    )
}

/// One user's dashboard: a fetcher, a resolved credential and the current filters.
pub struct Session<F> {
    fetcher: F,
    credential: String,
    params: QueryParams,
    placeholder: String,
    json_output_dir: Option<String>,
    clock: Arc<dyn Clock>,
}

impl<F> Session<F>
where
    F: FetchNews,
{
    pub fn new(fetcher: F, credential: String, params: QueryParams, placeholder: String) -> Self {
        Self {
            fetcher,
            credential,
            params,
            placeholder,
            json_output_dir: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Resolve the API key and open a session on `fetcher`.
    ///
    /// When no provider has a key, the setup help is written to `out`, nothing
    /// is fetched and `None` is returned.
    pub fn start<W: Write>(
        providers: &mut [&mut dyn CredentialProvider],
        fetcher: F,
        params: QueryParams,
        placeholder: String,
        secrets_file: &Path,
        out: &mut W,
    ) -> Result<Option<Self>, Box<dyn Error>> {
        match resolve_credential(providers)? {
            Some(credential) => Ok(Some(Self::new(fetcher, credential, params, placeholder))),
            None => {
                warn!("No News API key available; nothing fetched");
                writeln!(out, "{}", missing_credential_help(Some(secrets_file)))?;
                out.flush()?;
                Ok(None)
            }
        }
    }

    /// Also export every successful page as JSON under `dir`.
    pub fn with_json_output_dir(mut self, dir: Option<String>) -> Self {
        self.json_output_dir = dir;
        self
    }

    /// Timestamp snapshots with `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn params(&self) -> QueryParams {
        self.params
    }

    /// Run one render pass: fetch (or hit the cache), build the view, print the page.
    #[instrument(level = "info", skip_all, fields(category = %self.params.category, days = self.params.days, count = self.params.count))]
    pub async fn render<W: Write>(&self, out: &mut W) -> Result<DashboardView, Box<dyn Error>> {
        let request = FetchRequest::from_params(&self.params, &self.credential);
        let outcome = self.fetcher.fetch(&request).await;
        let view = DashboardView::from_outcome(&outcome, &self.placeholder);

        match view.banner() {
            Some(banner) => warn!(error = %banner.message(), "Rendered error banner"),
            None => info!(cards = view.cards().len(), "Rendered news cards"),
        }

        out.write_all(markdown::render_page(&self.params, &view).as_bytes())?;
        out.flush()?;

        if let (Some(dir), Ok(response)) = (&self.json_output_dir, &outcome) {
            if response.is_ok() {
                match json::write_snapshot(response, &self.params, self.clock.now(), dir).await {
                    Ok(path) => debug!(path = %path.display(), "Exported JSON snapshot"),
                    Err(e) => error!(error = %e, "Failed to write JSON snapshot"),
                }
            }
        }

        Ok(view)
    }

    /// Render once, then keep re-rendering on user commands until `quit` or end of input.
    ///
    /// Returns the number of render passes performed.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<usize, Box<dyn Error>> {
        self.render(out).await?;
        let mut renders = 1;
        write_prompt(out)?;

        for line in input.lines() {
            let line = line?;
            match parse_command(&line, self.params) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => writeln!(out, "{}", help_text())?,
                Ok(Command::Refresh) => {
                    self.render(out).await?;
                    renders += 1;
                }
                Ok(Command::Update(params)) => {
                    debug!(?params, "Filters changed");
                    self.params = params;
                    self.render(out).await?;
                    renders += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Rejected dashboard input");
                    writeln!(out, "Invalid input: {e}")?;
                }
            }
            write_prompt(out)?;
        }

        info!(renders, "Dashboard session ended");
        Ok(renders)
    }
}

fn write_prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "\n[enter] refresh | category=.. days=.. count=.. | help | quit\n> ")?;
    out.flush()
}
