//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for the price scope parameters.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the currency prices are quoted in (e.g. `GBP`, `EUR`).
    fn with_currency(mut self, currency: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().currency = Some(currency.to_string());
        self
    }

    /// Pins the API version (e.g. `2023-01-01-preview`).
    fn with_api_version(mut self, api_version: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().api_version = Some(api_version.to_string());
        self
    }
}

/// Fields shared by all query types. `None` leaves the API default in place
/// (USD, latest stable version).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryCommon {
    /// Currency code, sent as `currencyCode='XXX'`.
    pub currency: Option<String>,
    /// Value for the `api-version` parameter.
    pub api_version: Option<String>,
}

impl QueryCommon {
    /// Appends the scope parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(api_version) = &self.api_version {
            url.query_pairs_mut()
                .append_pair("api-version", api_version.as_str());
        }
        if let Some(currency) = &self.currency {
            url.query_pairs_mut()
                .append_pair("currencyCode", format!("'{}'", currency).as_str());
        }
        url
    }
}
