//! Data models for dashboard filters, NewsAPI responses and cache keys.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: The fixed topical filters and their canned search expressions
//! - [`QueryParams`]: The validated sidebar filters (category, day window, count)
//! - [`NewsResponse`] / [`Article`]: The decoded body of a NewsAPI `everything` call
//! - [`FetchRequest`]: The full argument tuple of a fetch, used as the cache key
//! - [`DateWindow`]: The `[from, to]` calendar range sent to the API
//!
//! The response models keep NewsAPI's camelCase on the wire through
//! `#[serde(rename_all = "camelCase")]`.

use crate::error::ParamError;
use chrono::{DateTime, Duration, Local, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Allowed values for the "last N days" filter.
pub const DAYS_RANGE: RangeInclusive<u32> = 1..=7;
/// Allowed values for the "number of articles" filter.
pub const COUNT_RANGE: RangeInclusive<u32> = 5..=30;

pub const DEFAULT_DAYS: u32 = 3;
pub const DEFAULT_COUNT: u32 = 10;

/// A fixed topical filter.
///
/// Each category maps to one boolean search expression understood by
/// NewsAPI's `q` parameter. The mapping is static and never derived from
/// user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Finance,
    #[value(alias = "crypto")]
    Cryptocurrency,
    #[value(alias = "stocks")]
    StockMarket,
    Esg,
    All,
}

impl Category {
    /// Every category, in the order the selector lists them.
    pub const ALL: [Category; 5] = [
        Category::Finance,
        Category::Cryptocurrency,
        Category::StockMarket,
        Category::Esg,
        Category::All,
    ];

    /// The canned search expression sent as `q`.
    pub fn search_query(self) -> &'static str {
        match self {
            Category::Finance => "financial OR banking OR economy",
            Category::Cryptocurrency => "cryptocurrency OR bitcoin OR blockchain",
            Category::StockMarket => "stock market OR wall street OR nasdaq OR dow jones",
            Category::Esg => "ESG OR sustainable investing OR green finance",
            Category::All => "(financial OR cryptocurrency OR stock market OR ESG)",
        }
    }

    /// Human-facing label, as shown in the filter summary.
    pub fn label(self) -> &'static str {
        match self {
            Category::Finance => "Finance",
            Category::Cryptocurrency => "Cryptocurrency",
            Category::StockMarket => "Stock Market",
            Category::Esg => "ESG",
            Category::All => "All",
        }
    }

    /// Kebab-case name, used for file names and the interactive prompt.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Finance => "finance",
            Category::Cryptocurrency => "cryptocurrency",
            Category::StockMarket => "stock-market",
            Category::Esg => "esg",
            Category::All => "all",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ParamError;

    /// Accepts the clap names and aliases case-insensitively, plus the
    /// space-separated labels ("Stock Market").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(' ', "-");
        <Category as ValueEnum>::from_str(&normalized, true)
            .map_err(|_| ParamError::UnknownCategory(s.trim().to_string()))
    }
}

/// The validated dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams {
    pub category: Category,
    pub days: u32,
    pub count: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            category: Category::Finance,
            days: DEFAULT_DAYS,
            count: DEFAULT_COUNT,
        }
    }
}

fn check_days(days: i64) -> Result<u32, ParamError> {
    u32::try_from(days)
        .ok()
        .filter(|d| DAYS_RANGE.contains(d))
        .ok_or(ParamError::DaysOutOfRange {
            got: days,
            min: *DAYS_RANGE.start(),
            max: *DAYS_RANGE.end(),
        })
}

fn check_count(count: i64) -> Result<u32, ParamError> {
    u32::try_from(count)
        .ok()
        .filter(|c| COUNT_RANGE.contains(c))
        .ok_or(ParamError::CountOutOfRange {
            got: count,
            min: *COUNT_RANGE.start(),
            max: *COUNT_RANGE.end(),
        })
}

/// Parse and range-check a day window. Shared by clap and the interactive loop.
pub fn parse_days(s: &str) -> Result<u32, ParamError> {
    let n = s
        .trim()
        .parse::<i64>()
        .map_err(|_| ParamError::NotANumber(s.trim().to_string()))?;
    check_days(n)
}

/// Parse and range-check an article count. Shared by clap and the interactive loop.
pub fn parse_count(s: &str) -> Result<u32, ParamError> {
    let n = s
        .trim()
        .parse::<i64>()
        .map_err(|_| ParamError::NotANumber(s.trim().to_string()))?;
    check_count(n)
}

/// The publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A single article as returned by NewsAPI.
///
/// Decoded verbatim and never mutated; its lifetime is one render pass
/// (or one cache window when the response is memoized).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ArticleSource,
    /// ISO-8601 timestamp, e.g. `2025-05-06T14:30:00Z`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// One article with a `null` field must not sink the whole page.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The decoded body of an `everything` call.
///
/// NewsAPI reports failures in-band: `status` is `"error"` and `code` /
/// `message` describe why, while `articles` is absent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// The date window this page was queried with; set by the fetcher.
    #[serde(skip)]
    pub window: Option<DateWindow>,
}

impl NewsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// The full argument tuple of a fetch.
///
/// Doubles as the cache key: two requests hit the same entry only if query,
/// day window, count and credential all match.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub query: String,
    pub days: u32,
    pub count: u32,
    pub credential: String,
}

impl FetchRequest {
    pub fn new(query: impl Into<String>, days: u32, count: u32, credential: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            days,
            count,
            credential: credential.into(),
        }
    }

    pub fn from_params(params: &QueryParams, credential: &str) -> Self {
        Self::new(
            params.category.search_query(),
            params.days,
            params.count,
            credential,
        )
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("query", &self.query)
            .field("days", &self.days)
            .field("count", &self.count)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Calendar range `[now - days, now]` in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn ending_at(now: DateTime<Local>, days: u32) -> Self {
        let start = now - Duration::days(i64::from(days));
        Self {
            from: start.date_naive(),
            to: now.date_naive(),
        }
    }

    /// `from` formatted as `YYYY-MM-DD`.
    pub fn from_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// `to` formatted as `YYYY-MM-DD`.
    pub fn to_param(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_search_queries_match_table() {
        let expected = [
            (Category::Finance, "financial OR banking OR economy"),
            (Category::Cryptocurrency, "cryptocurrency OR bitcoin OR blockchain"),
            (
                Category::StockMarket,
                "stock market OR wall street OR nasdaq OR dow jones",
            ),
            (Category::Esg, "ESG OR sustainable investing OR green finance"),
            (
                Category::All,
                "(financial OR cryptocurrency OR stock market OR ESG)",
            ),
        ];
        for (category, query) in expected {
            assert!(!category.search_query().is_empty());
            assert_eq!(category.search_query(), query);
        }
        assert_eq!(Category::ALL.len(), expected.len());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("finance".parse::<Category>(), Ok(Category::Finance));
        assert_eq!("Crypto".parse::<Category>(), Ok(Category::Cryptocurrency));
        assert_eq!("Stock Market".parse::<Category>(), Ok(Category::StockMarket));
        assert_eq!("stocks".parse::<Category>(), Ok(Category::StockMarket));
        assert_eq!("ESG".parse::<Category>(), Ok(Category::Esg));
        assert_eq!(" all ".parse::<Category>(), Ok(Category::All));
        assert_eq!(
            "sports".parse::<Category>(),
            Err(ParamError::UnknownCategory("sports".to_string()))
        );
    }

    #[test]
    fn test_category_slug_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_filter_bounds() {
        assert_eq!(parse_days("1"), Ok(1));
        assert_eq!(parse_days("7"), Ok(7));
        assert_eq!(parse_count("5"), Ok(5));
        assert_eq!(parse_count("30"), Ok(30));
        assert_eq!(
            parse_days("0"),
            Err(ParamError::DaysOutOfRange { got: 0, min: 1, max: 7 })
        );
        assert_eq!(
            parse_count("31"),
            Err(ParamError::CountOutOfRange { got: 31, min: 5, max: 30 })
        );
        assert!(parse_days("-2").is_err());
    }

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.category, Category::Finance);
        assert_eq!(params.days, 3);
        assert_eq!(params.count, 10);
    }

    #[test]
    fn test_parse_days_and_count() {
        assert_eq!(parse_days("5"), Ok(5));
        assert_eq!(parse_days("x"), Err(ParamError::NotANumber("x".to_string())));
        assert!(parse_days("8").is_err());
        assert_eq!(parse_count(" 20 "), Ok(20));
        assert!(parse_count("4").is_err());
    }

    #[test]
    fn test_date_window_three_days() {
        let now = Local.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        let window = DateWindow::ending_at(now, 3);
        assert_eq!(window.from_param(), "2025-05-03");
        assert_eq!(window.to_param(), "2025-05-06");
    }

    #[test]
    fn test_date_window_crosses_month() {
        let now = Local.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        let window = DateWindow::ending_at(now, 7);
        assert_eq!(window.from_param(), "2025-02-23");
        assert_eq!(window.to_param(), "2025-03-02");
    }

    #[test]
    fn test_fetch_request_debug_redacts_credential() {
        let req = FetchRequest::new("bitcoin", 3, 10, "super-secret-key");
        let dbg = format!("{:?}", req);
        assert!(dbg.contains("bitcoin"));
        assert!(!dbg.contains("super-secret-key"));
    }

    #[test]
    fn test_fetch_request_key_includes_credential() {
        let params = QueryParams::default();
        let a = FetchRequest::from_params(&params, "key-a");
        let b = FetchRequest::from_params(&params, "key-b");
        assert_ne!(a, b);
        assert_eq!(a, FetchRequest::from_params(&params, "key-a"));
    }

    #[test]
    fn test_news_response_ok_deserialization() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Reuters"},
                "author": "Jane Doe",
                "title": "Markets rally",
                "description": "Stocks rose.",
                "url": "https://example.com/a",
                "urlToImage": null,
                "publishedAt": "2025-05-06T14:30:00Z",
                "content": "Body"
            }]
        }"#;
        let resp: NewsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.total_results, Some(1));
        assert_eq!(resp.articles.len(), 1);
        let article = &resp.articles[0];
        assert_eq!(article.source.name, "Reuters");
        assert_eq!(article.url_to_image, None);
        assert_eq!(article.published_at, "2025-05-06T14:30:00Z");
    }

    #[test]
    fn test_article_with_null_fields_keeps_the_page() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"source": null, "title": null, "url": null, "publishedAt": null},
                {"source": {"id": null, "name": "Reuters"}, "title": "Markets rally",
                 "url": "https://example.com/a", "publishedAt": "2025-05-06T14:30:00Z"}
            ]
        }"#;
        let resp: NewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.articles.len(), 2);
        assert_eq!(resp.articles[0].title, "");
        assert_eq!(resp.articles[0].source.name, "");
        assert_eq!(resp.articles[1].title, "Markets rally");
    }

    #[test]
    fn test_news_response_error_deserialization() {
        let json = r#"{"status":"error","code":"rateLimited","message":"rateLimited"}"#;
        let resp: NewsResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_ok());
        assert!(resp.articles.is_empty());
        assert_eq!(resp.message.as_deref(), Some("rateLimited"));
    }
}
