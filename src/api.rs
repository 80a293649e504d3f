//! NewsAPI access with time-bounded response caching.
//!
//! # Architecture
//!
//! The module uses a trait-based design so each layer can be swapped or tested
//! in isolation:
//! - [`NewsTransport`]: One HTTP GET returning the raw body
//! - [`ReqwestTransport`]: The `reqwest` implementation of [`NewsTransport`]
//! - [`FetchNews`]: Core trait turning a [`FetchRequest`] into a decoded [`NewsResponse`]
//! - [`HttpFetcher`]: Computes the date window, builds the query and decodes the body
//! - [`CachedFetcher`]: Decorator that memoizes any [`FetchNews`] implementation
//!
//! # Failure Policy
//!
//! A transport failure or an undecodable body is returned as a [`FetchError`]
//! after one attempt; there is no retry. An HTTP error status is *not* a
//! failure: NewsAPI reports errors as a JSON body with `status: "error"`, and
//! that body is returned like any other response.

use crate::cache::TtlCache;
use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::models::{DateWindow, FetchRequest, NewsResponse};
use crate::utils::{Clock, truncate_for_log};
use chrono::Duration;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, info, instrument, warn};

/// A query string parameter as sent on the wire.
pub type QueryPair = (&'static str, String);

/// A single HTTP GET against the news endpoint.
pub trait NewsTransport {
    /// Issue the request and return the response body, whatever its status code.
    async fn get(&self, url: &str, query: &[QueryPair]) -> Result<String, FetchError>;
}

/// [`NewsTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: StdDuration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl NewsTransport for ReqwestTransport {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn get(&self, url: &str, query: &[QueryPair]) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(Box::new(e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(Box::new(e)))?;
        debug!(
            %status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "news endpoint responded"
        );
        Ok(body)
    }
}

/// Trait for fetching one page of articles.
///
/// Implementors turn a [`FetchRequest`] into a decoded response. Responses are
/// shared behind an [`Arc`] so that caching decorators can hand out the same
/// page repeatedly without copying it.
pub trait FetchNews {
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<NewsResponse>, FetchError>;
}

/// Fetches from the NewsAPI `everything` endpoint through a [`NewsTransport`].
pub struct HttpFetcher<T> {
    transport: T,
    endpoint: String,
    language: String,
    sort_by: String,
    clock: Arc<dyn Clock>,
}

impl<T> HttpFetcher<T> {
    pub fn new(transport: T, config: &DashboardConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            sort_by: config.sort_by.clone(),
            clock,
        }
    }

    /// The full query string for `request` over `window`.
    pub fn query_for(&self, request: &FetchRequest, window: &DateWindow) -> Vec<QueryPair> {
        vec![
            ("q", request.query.clone()),
            ("from", window.from_param()),
            ("to", window.to_param()),
            ("language", self.language.clone()),
            ("sortBy", self.sort_by.clone()),
            ("apiKey", request.credential.clone()),
            ("pageSize", request.count.to_string()),
        ]
    }
}

impl<T> fmt::Debug for HttpFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .field("sort_by", &self.sort_by)
            .finish()
    }
}

impl<T> FetchNews for HttpFetcher<T>
where
    T: NewsTransport,
{
    #[instrument(level = "info", skip_all, fields(query = %request.query, days = request.days, count = request.count))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<NewsResponse>, FetchError> {
        let t0 = Instant::now();
        let window = DateWindow::ending_at(self.clock.now(), request.days);
        let query = self.query_for(request, &window);

        let body = match self.transport.get(&self.endpoint, &query).await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Error fetching news"
                );
                return Err(e);
            }
        };

        let mut response: NewsResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    error = %e,
                    response_preview = %truncate_for_log(&body, 300),
                    "News endpoint returned a body that is not a news response"
                );
                return Err(FetchError::Decode(e));
            }
        };

        response.window = Some(window);
        info!(
            status = %response.status,
            articles = response.articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched news page"
        );
        Ok(Arc::new(response))
    }
}

/// Decorator that memoizes successful responses of any [`FetchNews`] implementation.
///
/// Identical requests within the cache window are answered from memory without
/// touching the inner fetcher. Failures are never stored, so the next render
/// after a transport error goes back to the network.
pub struct CachedFetcher<F> {
    inner: F,
    cache: TtlCache<FetchRequest, Arc<NewsResponse>>,
    clock: Arc<dyn Clock>,
}

impl<F> CachedFetcher<F>
where
    F: FetchNews,
{
    pub fn new(inner: F, cache: TtlCache<FetchRequest, Arc<NewsResponse>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
        }
    }
}

impl<F> fmt::Debug for CachedFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFetcher")
            .field("ttl_secs", &self.cache.ttl().num_seconds())
            .finish()
    }
}

impl<F> FetchNews for CachedFetcher<F>
where
    F: FetchNews,
{
    #[instrument(level = "debug", skip_all)]
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<NewsResponse>, FetchError> {
        let now = self.clock.now();
        if let Some(hit) = self.cache.get(request, now) {
            debug!(?request, "serving news page from cache");
            return Ok(hit);
        }

        debug!(?request, "cache miss; fetching");
        let response = self.inner.fetch(request).await?;
        self.cache.purge_expired(now);
        self.cache.insert(request.clone(), Arc::clone(&response), now);
        debug!(entries = self.cache.len(), "stored news page");
        Ok(response)
    }
}

/// The fetcher stack used by the dashboard.
pub type DashboardFetcher = CachedFetcher<HttpFetcher<ReqwestTransport>>;

/// Build the production fetcher stack from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed (e.g. the TLS
/// backend fails to initialize).
pub fn build_fetcher(config: &DashboardConfig, clock: Arc<dyn Clock>) -> Result<DashboardFetcher, reqwest::Error> {
    let transport = ReqwestTransport::new(
        StdDuration::from_secs(config.timeout_secs),
        &config.user_agent,
    )?;
    let http = HttpFetcher::new(transport, config, Arc::clone(&clock));
    let cache = TtlCache::new(Duration::seconds(i64::from(config.cache_ttl_secs)));
    info!(
        endpoint = %config.endpoint,
        ttl_secs = config.cache_ttl_secs,
        timeout_secs = config.timeout_secs,
        "Fetcher ready"
    );
    Ok(CachedFetcher::new(http, cache, clock))
}
