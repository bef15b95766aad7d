//! FILENAME: persistence/src/lib.rs
//! Export Persistence Module
//!
//! Runs the record pipeline into an `ExportBundle` and hands it to a writer.
//! The XLSX writer is the stock `TableSink`; serialization itself is done by
//! `rust_xlsxwriter`.

mod error;
mod xlsx_writer;

pub use error::PersistenceError;
pub use xlsx_writer::{save_xlsx, xlsx_to_buffer, XlsxWriter};

use engine::{tabulate, CellEncoder, ExportConfig, Record, Schema, TableData};
use pivot_engine::{PivotDescriptor, PivotSettings, PivotSpecBuilder};

// ============================================================================
// EXPORT BUNDLE
// ============================================================================

/// Everything a writer needs for one export call.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub data: TableData,
    /// Present whenever pivot settings were supplied, even for a header-only
    /// table; writers decide whether there is anything to materialize.
    pub pivot: Option<PivotDescriptor>,
    pub config: ExportConfig,
}

impl ExportBundle {
    /// True when the pivot should be laid out: it exists and has source rows.
    pub fn has_materializable_pivot(&self) -> bool {
        self.pivot
            .as_ref()
            .map_or(false, |p| p.source_row_count() > 0)
    }
}

/// Runs the pipeline and resolves the pivot. Nothing is returned on error.
pub fn build_export<I>(
    source: Option<I>,
    schema: Option<&Schema>,
    settings: Option<&PivotSettings>,
    encoder: &CellEncoder,
    config: &ExportConfig,
) -> Result<ExportBundle, PersistenceError>
where
    I: IntoIterator,
    I::Item: Record,
{
    let data = tabulate(source, schema, encoder, config)?;
    let pivot = settings.map(|s| PivotSpecBuilder::new(&data.table).build(s));

    Ok(ExportBundle {
        data,
        pivot,
        config: config.clone(),
    })
}

// ============================================================================
// WRITER SEAM
// ============================================================================

/// A destination for a finished export.
pub trait TableSink {
    /// Renders the header, data rows, widths and table region.
    fn write_table(&mut self, data: &TableData, config: &ExportConfig) -> Result<(), PersistenceError>;

    /// Renders the derived cross-tabulation. Only called when the source table
    /// has data rows.
    fn write_pivot(
        &mut self,
        pivot: &PivotDescriptor,
        data: &TableData,
        config: &ExportConfig,
    ) -> Result<(), PersistenceError>;
}

/// Writes `bundle` to `sink`: the table first, then the pivot if there is one
/// with data behind it.
pub fn export_to<S: TableSink + ?Sized>(sink: &mut S, bundle: &ExportBundle) -> Result<(), PersistenceError> {
    sink.write_table(&bundle.data, &bundle.config)?;

    match &bundle.pivot {
        Some(pivot) if bundle.has_materializable_pivot() => {
            sink.write_pivot(pivot, &bundle.data, &bundle.config)?;
        }
        Some(_) => {
            log::debug!(target: "EXPORT", "table has no data rows, pivot not materialized");
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{DynRecord, TypeTag};
    use pivot_engine::AggregationType;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
    }

    impl TableSink for RecordingSink {
        fn write_table(&mut self, data: &TableData, _config: &ExportConfig) -> Result<(), PersistenceError> {
            self.calls.push(format!("table {}", data.table.region.to_a1()));
            Ok(())
        }

        fn write_pivot(
            &mut self,
            pivot: &PivotDescriptor,
            _data: &TableData,
            _config: &ExportConfig,
        ) -> Result<(), PersistenceError> {
            self.calls.push(format!("pivot {}", pivot.column_aggregations.len()));
            Ok(())
        }
    }

    fn settings() -> PivotSettings {
        PivotSettings::new()
            .row_label("PRODUCT")
            .column_label("CA_NET", AggregationType::Sum)
    }

    #[test]
    fn test_sink_receives_table_then_pivot() {
        let records = vec![
            DynRecord::new().with("PRODUCT", "A").with("CA_NET", 10),
            DynRecord::new().with("PRODUCT", "B").with("CA_NET", 20),
        ];
        let bundle = build_export(
            Some(records),
            None,
            Some(&settings()),
            &CellEncoder::standard(),
            &ExportConfig::default(),
        )
        .unwrap();

        let mut sink = RecordingSink::default();
        export_to(&mut sink, &bundle).unwrap();
        assert_eq!(sink.calls, vec!["table A1:B3", "pivot 1"]);
    }

    #[test]
    fn test_header_only_skips_pivot() {
        let schema = Schema::new()
            .column("PRODUCT", TypeTag::Text)
            .column("CA_NET", TypeTag::Integer);
        let bundle = build_export(
            Some(Vec::<DynRecord>::new()),
            Some(&schema),
            Some(&settings()),
            &CellEncoder::standard(),
            &ExportConfig::default(),
        )
        .unwrap();

        // The descriptor still resolves; it just has nothing behind it.
        let pivot = bundle.pivot.as_ref().unwrap();
        assert_eq!(pivot.row_field_indices.as_slice(), &[0]);
        assert!(!bundle.has_materializable_pivot());

        let mut sink = RecordingSink::default();
        export_to(&mut sink, &bundle).unwrap();
        assert_eq!(sink.calls, vec!["table A1:B1"]);
    }

    #[test]
    fn test_no_settings_no_pivot() {
        let records = vec![DynRecord::new().with("PRODUCT", "A")];
        let bundle = build_export(
            Some(records),
            None,
            None,
            &CellEncoder::standard(),
            &ExportConfig::default(),
        )
        .unwrap();
        assert!(bundle.pivot.is_none());
    }
}
