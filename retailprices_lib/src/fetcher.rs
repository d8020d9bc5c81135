//! Retrying page fetcher that walks `NextPageLink` cursors.

use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use rand::Rng;
use retailprices_api::types::{PricePage, Record};
use retailprices_api::{Client, PriceQuery};

use crate::error::PricesError;

/// Backoff policy for a single page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 16000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("AZURE_PRICES_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("AZURE_PRICES_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("AZURE_PRICES_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Position in a paginated result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// Nothing fetched yet; the next request is built from the query.
    Start,
    /// The next request goes to this `NextPageLink`, unchanged.
    Next(String),
    /// The last page has been seen.
    Done,
}

/// Fetches price pages one request at a time, retrying transient failures.
pub struct PageFetcher {
    inner: Client,
    retry: RetryConfig,
}

impl PageFetcher {
    /// Creates a fetcher whose retry policy comes from the environment.
    pub fn new(client: Client) -> Self {
        Self {
            inner: client,
            retry: RetryConfig::from_env(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &Client {
        &self.inner
    }

    async fn retry_request<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, PricesError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PricesError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}): {}; retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        err,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fetches the page at `cursor` and returns it together with the cursor
    /// that follows it. Returns `None` once the cursor is [`Cursor::Done`].
    pub async fn fetch_next(
        &self,
        query: &PriceQuery,
        cursor: Cursor,
    ) -> Result<Option<(PricePage, Cursor)>, PricesError> {
        let page = match &cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => {
                self.retry_request("first page", || async {
                    self.inner.get_prices(query).await.map_err(PricesError::from)
                })
                .await?
            }
            Cursor::Next(link) => {
                self.retry_request("next page", || async {
                    self.inner.get_next_page(link).await.map_err(PricesError::from)
                })
                .await?
            }
        };

        if page.count_mismatch() {
            tracing::warn!(
                "API page reported {} items but returned {}",
                page.count.unwrap_or_default(),
                page.items.len()
            );
        }

        let next = match page.next_cursor() {
            Some(link) => {
                tracing::debug!("Next page of results detected: {}", link);
                Cursor::Next(link.to_string())
            }
            None => Cursor::Done,
        };
        tracing::debug!("Fetched page with {} items", page.items.len());
        Ok(Some((page, next)))
    }

    /// Lazily walks every page of `query`, starting over on each call.
    pub fn pages<'a>(
        &'a self,
        query: &'a PriceQuery,
    ) -> impl Stream<Item = Result<PricePage, PricesError>> + 'a {
        stream::try_unfold(Cursor::Start, move |cursor| self.fetch_next(query, cursor))
    }

    /// Lazily yields every record of `query` in server order. A page is only
    /// requested once the records before it have been consumed.
    pub fn records<'a>(
        &'a self,
        query: &'a PriceQuery,
    ) -> impl Stream<Item = Result<Record, PricesError>> + 'a {
        self.pages(query)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<_, PricesError>)))
            .try_flatten()
    }
}

fn is_retryable(err: &PricesError) -> bool {
    match err {
        PricesError::Api(api_err) => match api_err {
            retailprices_api::Error::RequestFailed(_) => true,
            retailprices_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            retailprices_api::Error::InvalidUrl { .. } | retailprices_api::Error::ParseFailed(_) => {
                false
            }
        },
        PricesError::InvalidInput(_) => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
