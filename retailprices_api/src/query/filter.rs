//! Builds OData `$filter` expressions out of field-equals-value constraints.
//!
//! Constraints on the same field are OR'd together and the resulting groups
//! are AND'd, so `[(a, 1), (b, 2), (a, 3)]` becomes
//! `(a eq '1' or a eq '3') and (b eq '2')`.

use std::fmt;

/// One field-equals-value restriction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub value: String,
}

impl Constraint {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// All accepted values for a single field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterGroup {
    pub field: String,
    pub values: Vec<String>,
}

/// Ordered set of [`FilterGroup`]s.
///
/// Groups keep the order in which their field was first seen and values keep
/// insertion order, so the same constraint list always yields the same
/// expression text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    groups: Vec<FilterGroup>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from constraints, in order.
    pub fn from_constraints<'a, I>(constraints: I) -> Self
    where
        I: IntoIterator<Item = &'a Constraint>,
    {
        let mut filter = Self::new();
        for constraint in constraints {
            filter.push(&constraint.field, &constraint.value);
        }
        filter
    }

    /// Adds `field eq value`, joining an existing group for `field` if there is one.
    pub fn push(&mut self, field: &str, value: &str) {
        match self.groups.iter_mut().find(|g| g.field == field) {
            Some(group) => group.values.push(value.to_string()),
            None => self.groups.push(FilterGroup {
                field: field.to_string(),
                values: vec![value.to_string()],
            }),
        }
    }

    pub fn with_constraint(mut self, field: &str, value: &str) -> Self {
        self.push(field, value);
        self
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Renders the filter as an OData expression. An empty filter renders as
    /// the empty expression, which callers must not send.
    pub fn to_expression(&self) -> FilterExpression {
        let expr = self
            .groups
            .iter()
            .map(|group| {
                let alternatives = group
                    .values
                    .iter()
                    .map(|value| format!("{} eq {}", group.field, escape_string(value)))
                    .collect::<Vec<_>>()
                    .join(" or ");
                format!("({})", alternatives)
            })
            .collect::<Vec<_>>()
            .join(" and ");
        FilterExpression(expr)
    }
}

/// A rendered `$filter` value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterExpression(String);

impl FilterExpression {
    /// The "no filter" expression.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quotes a string literal for OData. Embedded single quotes are doubled.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
