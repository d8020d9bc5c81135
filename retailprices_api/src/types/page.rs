use serde::{Deserialize, Serialize};

use super::record::Record;

/// One page of results from the retail prices endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PricePage {
    pub billing_currency: Option<String>,
    pub customer_entity_id: Option<String>,
    pub customer_entity_type: Option<String>,
    pub items: Vec<Record>,
    /// Absolute URL of the next page. Absent or null on the last page.
    pub next_page_link: Option<String>,
    /// Number of items the server claims to have put on this page.
    pub count: Option<i64>,
}

impl PricePage {
    /// The continuation link, if another page follows. An empty link counts as none.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor().is_none()
    }

    /// True when `Count` is present and disagrees with the items received.
    pub fn count_mismatch(&self) -> bool {
        match self.count {
            Some(count) => count != self.items.len() as i64,
            None => false,
        }
    }
}
