//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the encoded value of a single spreadsheet cell.
//! CONTEXT: `CellValue` is what the encoder produces from a record field and
//! what the writer collaborator renders. A `RowBuffer` is one data row of
//! cells aligned by index with the table's column descriptors.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::value::format_datetime;

/// The encoded value of a cell. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    /// Decimal input converted to a double. Precision loss is accepted.
    FixedPoint(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// Canonical string form of a unique identifier.
    UniqueId(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the cell, used by aggregations.
    /// Text, booleans, dates and empty cells are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Float(f) | CellValue::FixedPoint(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the display value of the cell as a String.
    pub fn display_value(&self, datetime_format: &str) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Float(n) | CellValue::FixedPoint(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) | CellValue::UniqueId(s) => s.clone(),
            CellValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            CellValue::DateTime(dt) => format_datetime(dt, datetime_format),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

/// One encoded data row, aligned by index with the column descriptors.
pub type RowBuffer = Vec<CellValue>;
