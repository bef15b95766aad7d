//! FILENAME: persistence/src/xlsx_writer.rs

use crate::{export_to, ExportBundle, PersistenceError, TableSink};
use engine::{CellValue, ExportConfig, TableData};
use pivot_engine::{summarize, PivotDescriptor};
use rust_xlsxwriter::{
    Format, Table, TableColumn, TableStyle, Workbook as XlsxWorkbook, Worksheet, XlsxError,
};
use std::path::Path;

/// `TableSink` backed by an in-memory `rust_xlsxwriter` workbook.
pub struct XlsxWriter {
    xlsx: XlsxWorkbook,
}

impl XlsxWriter {
    pub fn new() -> Self {
        XlsxWriter {
            xlsx: XlsxWorkbook::new(),
        }
    }

    pub fn save(mut self, path: &Path) -> Result<(), PersistenceError> {
        self.xlsx.save(path)?;
        Ok(())
    }

    pub fn into_buffer(mut self) -> Result<Vec<u8>, PersistenceError> {
        Ok(self.xlsx.save_to_buffer()?)
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for XlsxWriter {
    fn write_table(&mut self, data: &TableData, config: &ExportConfig) -> Result<(), PersistenceError> {
        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format(&config.excel_datetime_format);
        let table = &data.table;

        let worksheet = self.xlsx.add_worksheet();
        worksheet.set_name(&config.sheet_name)?;

        for column in &table.columns {
            let col = col_u16(column.index)?;
            worksheet.write_string_with_format(0, col, &column.name, &header_format)?;
            if let Some(width) = data.widths.char_width(column.index, config.units_per_char) {
                worksheet.set_column_width(col, width)?;
            }
        }

        for (i, row) in data.rows.iter().enumerate() {
            let excel_row = table.region.start_row + 1 + i as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, excel_row, col_u16(col_idx)?, cell, &date_format)?;
            }
        }

        if table.columns.is_empty() {
            return Ok(());
        }

        let region = table.region;
        let first_col = col_u16(region.start_col as usize)?;
        let last_col = col_u16(region.end_col as usize)?;

        if table.has_data() {
            let columns: Vec<TableColumn> = table
                .columns
                .iter()
                .map(|c| TableColumn::new().set_header(&c.name))
                .collect();
            let xlsx_table = Table::new()
                .set_name(&table.display_name)
                .set_columns(&columns)
                .set_style(table_style(&table.style_name))
                .set_banded_rows(table.banded_rows)
                .set_banded_columns(table.banded_columns)
                .set_autofilter(table.filterable);
            worksheet.add_table(region.start_row, first_col, region.end_row, last_col, &xlsx_table)?;
        } else if table.filterable {
            // A structured table needs a data row; filter the header instead.
            worksheet.autofilter(region.start_row, first_col, region.end_row, last_col)?;
        }

        log::info!(
            target: "XLSX",
            "wrote sheet '{}' table '{}' {}",
            config.sheet_name,
            table.name,
            region.to_a1()
        );
        Ok(())
    }

    fn write_pivot(
        &mut self,
        pivot: &PivotDescriptor,
        data: &TableData,
        config: &ExportConfig,
    ) -> Result<(), PersistenceError> {
        let summary = summarize(pivot, &data.table, &data.rows);
        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format(&config.excel_datetime_format);
        let label_cols = pivot.row_field_indices.len();

        let worksheet = self.xlsx.add_worksheet();
        worksheet.set_name(&config.pivot_sheet_name)?;

        for (col_idx, title) in summary.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col_u16(col_idx)?, title, &header_format)?;
        }

        let mut excel_row = 1u32;
        // Without row fields the single group equals the grand total.
        if label_cols > 0 {
            for row in &summary.rows {
                for (col_idx, label) in row.labels.iter().enumerate() {
                    write_cell(worksheet, excel_row, col_u16(col_idx)?, label, &date_format)?;
                }
                write_values(worksheet, excel_row, label_cols, &row.values)?;
                excel_row += 1;
            }
            worksheet.write_string_with_format(excel_row, 0, "Grand Total", &header_format)?;
        }
        write_values(worksheet, excel_row, label_cols, &summary.grand_total)?;

        worksheet.autofit();
        worksheet.set_active(true);

        log::info!(
            target: "XLSX",
            "wrote pivot sheet '{}' groups={}",
            config.pivot_sheet_name,
            summary.rows.len()
        );
        Ok(())
    }
}

/// Writes `bundle` to an XLSX file at `path`.
pub fn save_xlsx(bundle: &ExportBundle, path: &Path) -> Result<(), PersistenceError> {
    let mut writer = XlsxWriter::new();
    export_to(&mut writer, bundle)?;
    writer.save(path)
}

/// Renders `bundle` as XLSX bytes.
pub fn xlsx_to_buffer(bundle: &ExportBundle) -> Result<Vec<u8>, PersistenceError> {
    let mut writer = XlsxWriter::new();
    export_to(&mut writer, bundle)?;
    writer.into_buffer()
}

fn col_u16(index: usize) -> Result<u16, PersistenceError> {
    u16::try_from(index).map_err(|_| PersistenceError::ColumnOutOfRange(index))
}

fn write_number(worksheet: &mut Worksheet, row: u32, col: u16, n: f64) -> Result<(), XlsxError> {
    if n.is_finite() {
        worksheet.write_number(row, col, n)?;
    } else {
        worksheet.write_string(row, col, n.to_string())?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Integer(n) => write_number(worksheet, row, col, *n as f64)?,
        CellValue::Float(n) | CellValue::FixedPoint(n) => write_number(worksheet, row, col, *n)?,
        CellValue::Text(s) | CellValue::UniqueId(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, date_format)?;
        }
    }
    Ok(())
}

fn write_values(
    worksheet: &mut Worksheet,
    row: u32,
    first_col: usize,
    values: &[Option<f64>],
) -> Result<(), PersistenceError> {
    for (i, value) in values.iter().enumerate() {
        if let Some(n) = value {
            write_number(worksheet, row, col_u16(first_col + i)?, *n)?;
        }
    }
    Ok(())
}

fn table_style(name: &str) -> TableStyle {
    match name {
        "TableStyleLight1" => TableStyle::Light1,
        "TableStyleLight9" => TableStyle::Light9,
        "TableStyleLight15" => TableStyle::Light15,
        "TableStyleMedium2" => TableStyle::Medium2,
        "TableStyleMedium9" => TableStyle::Medium9,
        "TableStyleMedium16" => TableStyle::Medium16,
        "TableStyleDark1" => TableStyle::Dark1,
        "TableStyleDark9" => TableStyle::Dark9,
        "" | "None" => TableStyle::None,
        other => {
            log::warn!(target: "XLSX", "unknown table style '{}', using TableStyleMedium16", other);
            TableStyle::Medium16
        }
    }
}
