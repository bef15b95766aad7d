//! FILENAME: persistence/src/error.rs

use engine::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Column index {0} exceeds the worksheet column limit")]
    ColumnOutOfRange(usize),
}
