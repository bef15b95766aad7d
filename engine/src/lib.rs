//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the record-to-table pipeline.
//! CONTEXT: records -> SchemaReader -> RowProjector (encode + widen) ->
//! TableBuilder. The result is handed to a writer collaborator.

pub mod cell;
pub mod config;
pub mod coord;
pub mod encoder;
pub mod error;
pub mod projector;
pub mod record;
pub mod schema;
pub mod table;
pub mod value;
pub mod width;

// Re-export commonly used types at the crate root
pub use cell::{CellValue, RowBuffer};
pub use config::ExportConfig;
pub use coord::{coord_to_a1, index_to_col, range_to_a1, CellCoord};
pub use encoder::{fallback_text, CellEncoder, EncodeFn};
pub use error::ExportError;
pub use projector::{Projection, RowProjector};
pub use record::{DynRecord, Record};
pub use schema::{ColumnDescriptor, Schema, SchemaReader};
pub use table::{TableBuilder, TableData, TableDescriptor, TableRegion};
pub use value::{
    format_datetime, is_valid_datetime_format, FieldValue, TypeTag, GENERIC_DATETIME_FORMAT,
};
pub use width::{export_units, ColumnWidthEstimator, ColumnWidths};

/// Runs the whole pipeline over `source`.
///
/// `None` models an absent record source. With no `schema` the first record
/// determines the columns, so an empty source is an error; with a schema an
/// empty source yields a header-only table. Any error aborts before a table
/// is produced.
pub fn tabulate<I>(
    source: Option<I>,
    schema: Option<&Schema>,
    encoder: &CellEncoder,
    config: &ExportConfig,
) -> Result<TableData, ExportError>
where
    I: IntoIterator,
    I::Item: Record,
{
    config.validate()?;

    let mut records = source.map(|s| s.into_iter().peekable());
    let columns = SchemaReader::infer(records.as_mut(), schema)?;
    let records = records.ok_or(ExportError::NullSource)?;

    let projection = RowProjector::new(&columns, encoder, config).project(records)?;
    let data = TableBuilder::new(config).build(columns, projection.rows, projection.widths)?;

    log::info!(
        target: "EXPORT",
        "tabulated table='{}' columns={} rows={}",
        data.table.name,
        data.table.columns.len(),
        data.rows.len()
    );

    Ok(data)
}
