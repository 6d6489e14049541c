//! Flat, uniformly keyed tables handed to the export layer.

use serde_json::{Map, Value};

/// One flat record. Keys keep insertion order, so every row of a table lists
/// its columns in the same order.
pub type Row = Map<String, Value>;

/// A named sequence of uniformly keyed rows.
///
/// Every row carries exactly the keys listed in `columns`. Tables are built by
/// the registries, the joiner and the enrichment stage; callers treat them as
/// read-only output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given column layout.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, filling any missing column with null and dropping keys
    /// that are not part of the layout.
    pub fn push(&mut self, mut row: Row) {
        let mut ordered = Map::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = row.remove(column).unwrap_or(Value::Null);
            ordered.insert(column.clone(), value);
        }
        self.rows.push(ordered);
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the subset of `required` that is not a column of this table.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom. Missing cells read as null.
    pub fn column(&self, column: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|row| row.get(column).unwrap_or(&Value::Null))
            .collect()
    }
}
