//! Library layer for the Azure retail prices tool: retrying page fetcher,
//! query planning, projection and the end-to-end pipeline.
//!
//! Wraps the `retailprices_api` crate with retry/backoff, input validation
//! and client-side filtering for fields the API cannot filter on.

pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod plan;
pub mod projection;
pub mod validation;

pub use retailprices_api;
pub use retailprices_api::types;
pub use retailprices_api::{
    Client, Constraint, Filter, FilterExpression, PriceQuery, Query, DEFAULT_ENDPOINT,
};

pub use error::PricesError;
pub use fetcher::{Cursor, PageFetcher, RetryConfig};
pub use pipeline::{Pipeline, PipelineOutput};
pub use plan::QueryPlan;
pub use projection::{ColumnSpec, ProjectedRow, Projector, PLACEHOLDER};
