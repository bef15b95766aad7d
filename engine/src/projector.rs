//! FILENAME: engine/src/projector.rs
//! PURPOSE: The single forward pass over the record source.
//! CONTEXT: Each record is visited once, in source order. For every column the
//! field is fetched by name, encoded, and measured. Stopping iteration early
//! (or an error) leaves nothing behind: results exist only on success.

use crate::cell::RowBuffer;
use crate::config::ExportConfig;
use crate::encoder::CellEncoder;
use crate::error::ExportError;
use crate::record::Record;
use crate::schema::ColumnDescriptor;
use crate::width::{ColumnWidthEstimator, ColumnWidths};

/// Output of the forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub rows: Vec<RowBuffer>,
    pub widths: ColumnWidths,
}

pub struct RowProjector<'a> {
    columns: &'a [ColumnDescriptor],
    encoder: &'a CellEncoder,
    config: &'a ExportConfig,
}

impl<'a> RowProjector<'a> {
    pub fn new(
        columns: &'a [ColumnDescriptor],
        encoder: &'a CellEncoder,
        config: &'a ExportConfig,
    ) -> Self {
        RowProjector {
            columns,
            encoder,
            config,
        }
    }

    /// Consumes `records` and returns every encoded row plus final widths.
    pub fn project<I>(&self, records: I) -> Result<Projection, ExportError>
    where
        I: IntoIterator,
        I::Item: Record,
    {
        let mut widths = ColumnWidthEstimator::new(self.columns, self.config);
        let mut rows = Vec::new();

        for (record_index, record) in records.into_iter().enumerate() {
            rows.push(self.project_record(&record, record_index, &mut widths)?);
        }

        log::debug!(
            target: "EXPORT",
            "projected rows={} columns={}",
            rows.len(),
            self.columns.len()
        );

        Ok(Projection {
            rows,
            widths: widths.finish(self.config),
        })
    }

    fn project_record<R: Record>(
        &self,
        record: &R,
        record_index: usize,
        widths: &mut ColumnWidthEstimator,
    ) -> Result<RowBuffer, ExportError> {
        let mut row = Vec::with_capacity(self.columns.len());

        for column in self.columns {
            let value = record
                .field(&column.name)
                .ok_or_else(|| ExportError::FieldResolution {
                    column: column.name.clone(),
                    record_index,
                })?;

            widths.observe(column.index, value.text_len(&self.config.datetime_format));
            row.push(self.encoder.encode(column.type_tag, value));
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::record::DynRecord;
    use crate::value::TypeTag;

    fn sales_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("PRODUCT", TypeTag::Text, 0),
            ColumnDescriptor::new("CA_NET", TypeTag::Integer, 1),
        ]
    }

    #[test]
    fn test_rows_follow_column_order() {
        let columns = sales_columns();
        let encoder = CellEncoder::standard();
        let config = ExportConfig::default();
        // Field order in the record differs from the column order.
        let records = vec![
            DynRecord::new().with("CA_NET", 10).with("PRODUCT", "A"),
            DynRecord::new().with("CA_NET", 20).with("PRODUCT", "B"),
        ];

        let projection = RowProjector::new(&columns, &encoder, &config)
            .project(records)
            .unwrap();

        assert_eq!(
            projection.rows,
            vec![
                vec![CellValue::Text("A".to_string()), CellValue::Integer(10)],
                vec![CellValue::Text("B".to_string()), CellValue::Integer(20)],
            ]
        );
        assert_eq!(projection.widths.chars, vec![11, 10]);
    }

    #[test]
    fn test_long_value_widens_column() {
        let columns = sales_columns();
        let encoder = CellEncoder::standard();
        let config = ExportConfig::default();
        let records = vec![DynRecord::new()
            .with("PRODUCT", "A fairly long product name")
            .with("CA_NET", 1)];

        let projection = RowProjector::new(&columns, &encoder, &config)
            .project(records)
            .unwrap();
        assert_eq!(projection.widths.chars[0], 26 + 2);
    }

    #[test]
    fn test_null_is_empty_with_zero_width() {
        let columns = sales_columns();
        let encoder = CellEncoder::standard();
        let config = ExportConfig::default();
        let records = vec![DynRecord::new()
            .with("PRODUCT", Option::<String>::None)
            .with("CA_NET", Option::<i32>::None)];

        let projection = RowProjector::new(&columns, &encoder, &config)
            .project(records)
            .unwrap();
        assert_eq!(projection.rows[0], vec![CellValue::Empty, CellValue::Empty]);
        assert_eq!(projection.widths.chars, vec![11, 10]);
    }

    #[test]
    fn test_missing_field_aborts() {
        let columns = sales_columns();
        let encoder = CellEncoder::standard();
        let config = ExportConfig::default();
        let records = vec![
            DynRecord::new().with("PRODUCT", "A").with("CA_NET", 10),
            DynRecord::new().with("PRODUCT", "B"),
        ];

        let err = RowProjector::new(&columns, &encoder, &config)
            .project(records)
            .unwrap_err();
        assert_eq!(
            err,
            ExportError::FieldResolution {
                column: "CA_NET".to_string(),
                record_index: 1,
            }
        );
    }

    #[test]
    fn test_source_is_pulled_lazily_once() {
        use std::cell::Cell;

        let columns = sales_columns();
        let encoder = CellEncoder::standard();
        let config = ExportConfig::default();
        let pulled = Cell::new(0usize);
        let records = (0..5).map(|i| {
            pulled.set(pulled.get() + 1);
            DynRecord::new().with("PRODUCT", format!("P{}", i)).with("CA_NET", i)
        });

        let projection = RowProjector::new(&columns, &encoder, &config)
            .project(records)
            .unwrap();
        assert_eq!(projection.rows.len(), 5);
        assert_eq!(pulled.get(), 5);
    }
}
