//! Wires planning, fetching and projection into one run.

use std::pin::pin;

use futures::future;
use futures::stream::{Stream, TryStreamExt};
use retailprices_api::{Constraint, PriceQuery};

use crate::error::PricesError;
use crate::fetcher::PageFetcher;
use crate::plan::QueryPlan;
use crate::projection::{ColumnSpec, ProjectedRow, Projector};

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub columns: ColumnSpec,
    pub rows: Vec<ProjectedRow>,
    /// Records received from the API, including ones dropped by local filtering.
    pub records_fetched: usize,
}

/// A single query: remote filter, local narrowing and column selection.
pub struct Pipeline<'a> {
    fetcher: &'a PageFetcher,
    query: PriceQuery,
    projector: Projector,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a PageFetcher, constraints: &[Constraint], columns: ColumnSpec) -> Self {
        let plan = QueryPlan::from_constraints(constraints);
        Self {
            fetcher,
            query: PriceQuery::default().with_filter(plan.remote),
            projector: Projector::new(columns, plan.local),
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.query.common.currency = Some(currency.to_string());
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.query.common.api_version = Some(api_version.to_string());
        self
    }

    pub fn query(&self) -> &PriceQuery {
        &self.query
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// One item per fetched record: its row, or `None` if the local filter
    /// dropped it.
    fn projected(&self) -> impl Stream<Item = Result<Option<ProjectedRow>, PricesError>> + '_ {
        let projector = &self.projector;
        self.fetcher
            .records(&self.query)
            .map_ok(move |record| projector.apply(&record))
    }

    /// Lazily yields projected rows as pages arrive.
    pub fn rows(&self) -> impl Stream<Item = Result<ProjectedRow, PricesError>> + '_ {
        self.projected().try_filter_map(|row| future::ready(Ok(row)))
    }

    /// Runs the query to completion. `progress` is called after every record
    /// with the number of records fetched and rows kept so far.
    ///
    /// Any fetch error aborts the run; no rows are returned in that case.
    pub async fn collect<F>(&self, mut progress: F) -> Result<PipelineOutput, PricesError>
    where
        F: FnMut(usize, usize),
    {
        let filter = self.query.filter.to_expression();
        if filter.is_empty() {
            tracing::debug!("Querying without a filter");
        } else {
            tracing::debug!("Querying with filter: {}", filter);
        }

        let mut projected = pin!(self.projected());
        let mut rows = Vec::new();
        let mut records_fetched = 0usize;
        while let Some(row) = projected.try_next().await? {
            records_fetched += 1;
            rows.extend(row);
            progress(records_fetched, rows.len());
        }

        tracing::info!(
            "{} items found from Azure Prices API, {} kept",
            records_fetched,
            rows.len()
        );
        Ok(PipelineOutput {
            columns: self.projector.columns().clone(),
            rows,
            records_fetched,
        })
    }
}
