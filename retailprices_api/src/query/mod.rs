mod common;
pub use self::common::{Query, QueryCommon};

mod filter;
pub use self::filter::{escape_string, Constraint, Filter, FilterExpression, FilterGroup};

mod price;
pub use self::price::PriceQuery;
