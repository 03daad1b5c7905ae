//! PostgREST query string builder.
//!
//! Renders `select`, horizontal filters, `order` and `limit` into the
//! query pairs PostgREST expects (`?select=*&status=eq.pending&order=created_at.desc`).

use std::fmt::Display;

use crate::backend::models::SortOrder;

/// A table query: column selection, filters, ordering and limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to return. Defaults to `*`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Disjunction of `column = value` conditions.
    pub fn or_eq(mut self, conditions: &[(&str, &str)]) -> Self {
        let rendered: Vec<String> = conditions
            .iter()
            .map(|(column, value)| format!("{}.eq.{}", column, quote(value)))
            .collect();
        self.filters
            .push(("or".to_string(), format!("({})", rendered.join(","))));
        self
    }

    /// Append an ordering term. Terms apply in the order they were added.
    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        let direction = match order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render as URL query pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        )];
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Values containing PostgREST reserved characters must be double-quoted
/// inside `or=()` lists.
fn quote(value: &str) -> String {
    if value.contains([',', '(', ')', '.', ':', '"']) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
