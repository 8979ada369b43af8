//! Display records rendered by the dashboard widgets

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::QueryOutcome;

/// Slice colors for the keyword-score pie chart
pub const PIE_COLORS: [&str; 10] = [
    "blue", "red", "green", "orange", "purple", "pink", "brown", "gray", "yellow", "teal",
];

/// A rendered table: column headers plus one value per column per record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub records: Vec<Vec<Value>>,
    /// Rows are empty because the query failed, not for lack of data
    pub degraded: bool,
}

impl TableView {
    /// Reshape a query outcome; failures render as an empty, degraded table
    pub fn from_outcome<T, F>(columns: &[&str], outcome: QueryOutcome<T>, row: F) -> Self
    where
        F: Fn(T) -> Vec<Value>,
    {
        let degraded = outcome.is_degraded();
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            records: outcome.into_rows().into_iter().map(row).collect(),
            degraded,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one column, by header name
    pub fn column(&self, name: &str) -> Vec<&Value> {
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => self.records.iter().filter_map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }
}

/// A rendered pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub degraded: bool,
}

/// Dropdown choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardOptions {
    pub keywords: Vec<String>,
    pub universities: Vec<String>,
    pub faculty: Vec<String>,
    pub degraded: bool,
}
