//! Decides which constraints go to the API and which are applied locally.

use retailprices_api::{Constraint, Filter};

/// Fields the retail prices API accepts in `$filter`. Constraints on any
/// other field are evaluated client-side against each returned record.
pub const FILTERABLE_FIELDS: &[&str] = &[
    "armRegionName",
    "location",
    "meterId",
    "meterName",
    "productId",
    "skuId",
    "productName",
    "skuName",
    "serviceName",
    "serviceId",
    "serviceFamily",
    "priceType",
    "armSkuName",
];

pub fn is_filterable(field: &str) -> bool {
    FILTERABLE_FIELDS.contains(&field)
}

/// Constraints split into the server-side `$filter` and the local remainder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub remote: Filter,
    pub local: Filter,
}

impl QueryPlan {
    pub fn from_constraints(constraints: &[Constraint]) -> Self {
        let mut plan = Self::default();
        for constraint in constraints {
            let target = if is_filterable(&constraint.field) {
                &mut plan.remote
            } else {
                &mut plan.local
            };
            target.push(&constraint.field, &constraint.value);
        }
        if !plan.local.is_empty() {
            let fields: Vec<&str> = plan.local.groups().iter().map(|g| g.field.as_str()).collect();
            tracing::debug!("Filtering client-side on {}", fields.join(", "));
        }
        plan
    }
}
