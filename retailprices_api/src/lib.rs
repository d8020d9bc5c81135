mod client;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::{Client, DEFAULT_ENDPOINT};
pub use self::errors::Error;
pub use self::query::{
    escape_string, Constraint, Filter, FilterExpression, FilterGroup, PriceQuery, Query,
    QueryCommon,
};
