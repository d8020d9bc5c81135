use url::Url;

use super::common::{Query, QueryCommon};
use super::filter::{Constraint, Filter};

/// Query against the retail prices endpoint: scope parameters plus an
/// optional `$filter`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceQuery {
    pub common: QueryCommon,
    pub filter: Filter,
}

impl Query for PriceQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        let expr = self.filter.to_expression();
        if !expr.is_empty() {
            url.query_pairs_mut().append_pair("$filter", expr.as_str());
        }
        url
    }
}

impl PriceQuery {
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_constraint(mut self, constraint: &Constraint) -> Self {
        self.filter.push(&constraint.field, &constraint.value);
        self
    }

    pub fn with_constraints(mut self, constraints: &[Constraint]) -> Self {
        for constraint in constraints {
            self.filter.push(&constraint.field, &constraint.value);
        }
        self
    }
}
