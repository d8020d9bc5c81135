//! Client-side narrowing and column selection over price records.

use retailprices_api::types::{display_value, Record};
use retailprices_api::Filter;
use serde::Serialize;
use serde_json::Value;

/// Columns shown when the caller selects none.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "serviceName",
    "productName",
    "skuName",
    "armRegionName",
    "meterName",
    "type",
    "retailPrice",
    "unitOfMeasure",
    "currencyCode",
];

/// Cell value for a column the record does not have.
pub const PLACEHOLDER: Value = Value::Null;

/// Ordered list of output columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSpec(Vec<String>);

impl ColumnSpec {
    /// An empty list falls back to [`DEFAULT_COLUMNS`].
    pub fn new(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::default()
        } else {
            Self(names)
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self(DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

/// One output row, one cell per column of the [`ColumnSpec`] it was built with.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectedRow(Vec<Value>);

impl ProjectedRow {
    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    /// Cells as display text; placeholders become empty strings.
    pub fn texts(&self) -> Vec<String> {
        self.0.iter().map(display_value).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Drops records that fail the local filter and projects the rest onto the
/// selected columns.
#[derive(Clone, Debug, Default)]
pub struct Projector {
    columns: ColumnSpec,
    filter: Filter,
}

impl Projector {
    pub fn new(columns: ColumnSpec, filter: Filter) -> Self {
        Self { columns, filter }
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// True if every group of the local filter has a value equal to the
    /// record's text for that field. A missing field never matches.
    pub fn accepts(&self, record: &Record) -> bool {
        self.filter.groups().iter().all(|group| {
            record
                .text(&group.field)
                .is_some_and(|text| group.values.iter().any(|v| *v == text))
        })
    }

    pub fn project(&self, record: &Record) -> ProjectedRow {
        ProjectedRow(
            self.columns
                .iter()
                .map(|column| record.get(column).cloned().unwrap_or(PLACEHOLDER))
                .collect(),
        )
    }

    pub fn apply(&self, record: &Record) -> Option<ProjectedRow> {
        self.accepts(record).then(|| self.project(record))
    }
}
