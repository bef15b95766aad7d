//! FILENAME: engine/src/error.rs

use thiserror::Error;

/// Failures of the record-to-table pipeline. Any of these aborts the export
/// before a table descriptor is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("record source is absent")]
    NullSource,

    #[error("record source yielded no records and no schema was supplied")]
    EmptySource,

    #[error("record {record_index} has no field named '{column}'")]
    FieldResolution { column: String, record_index: usize },

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("table has no columns")]
    NoColumns,

    #[error("{0} data rows exceed the addressable row range")]
    TooManyRows(usize),

    #[error("{0} columns exceed the addressable column range")]
    TooManyColumns(usize),

    #[error("invalid export configuration: {0}")]
    InvalidConfig(String),
}
