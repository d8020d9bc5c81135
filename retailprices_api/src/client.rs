//! HTTP client for the Azure Retail Prices API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{PriceQuery, Query},
    types::PricePage,
    user_agent::get_user_agent,
    Error,
};

/// Production endpoint of the retail prices API.
pub const DEFAULT_ENDPOINT: &str = "https://prices.azure.com/api/retail/prices";

/// Request timeout for a single page fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Azure Retail Prices API.
///
/// Each call fetches exactly one page; following `NextPageLink` is left to
/// the caller so retry policy can wrap a single request.
pub struct Client {
    /// Full URL of the prices endpoint, without query string.
    endpoint: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production endpoint.
    pub fn new() -> Result<Self, Error> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a new client with a custom endpoint. Used for testing with wiremock.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, Error> {
        Url::parse(endpoint).map_err(|e| Error::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The URL the first page of `query` is fetched from.
    pub fn get_url(&self, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(query.add_to_url(&url))
    }

    async fn get<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::ParseFailed(e.to_string())
        })?;

        Ok(parsed)
    }

    /// Fetches the first page of prices matching the query.
    pub async fn get_prices(&self, query: &PriceQuery) -> Result<PricePage, Error> {
        let url = self.get_url(query)?;
        self.get::<PricePage>(url).await
    }

    /// Fetches the page behind a `NextPageLink`. The link is requested as
    /// given; it already carries the filter and paging state.
    pub async fn get_next_page(&self, cursor: &str) -> Result<PricePage, Error> {
        let url = Url::parse(cursor).map_err(|e| Error::InvalidUrl {
            url: cursor.to_string(),
            reason: e.to_string(),
        })?;
        self.get::<PricePage>(url).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_body_untouched() {
        assert_eq!(truncate_body("{\"error\":\"bad\"}"), "{\"error\":\"bad\"}");
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = format!("{}é{}", "x".repeat(1999), "y".repeat(100));
        let out = truncate_body(&body);
        assert!(out.starts_with(&"x".repeat(1999)));
        assert!(out.ends_with("...[truncated]"));
    }

    #[test]
    fn invalid_endpoint_rejected() {
        assert!(matches!(
            Client::with_endpoint("not a url"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn get_url_without_filter_has_no_filter_param() {
        let client = Client::with_endpoint("https://example.com/api/retail/prices").unwrap();
        let url = client
            .get_url(&PriceQuery::default().with_currency("GBP"))
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("currencyCode".to_string(), "'GBP'".to_string())]
        );
    }
}
