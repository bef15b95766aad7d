//! FILENAME: engine/src/table.rs
//! PURPOSE: Assembles the structured table region over header + data rows.
//! CONTEXT: The header sits on the region's first row and data starts one row
//! below. A table with no data rows still spans its header row; consumers
//! check `has_data()` rather than treating that as an error.

use serde::{Deserialize, Serialize};

use crate::cell::RowBuffer;
use crate::config::ExportConfig;
use crate::coord::{range_to_a1, CellCoord};
use crate::error::ExportError;
use crate::schema::ColumnDescriptor;
use crate::width::ColumnWidths;

/// Rectangular span of a table, 0-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRegion {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl TableRegion {
    pub fn start(&self) -> CellCoord {
        (self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellCoord {
        (self.end_row, self.end_col)
    }

    /// Number of rows below the header.
    pub fn data_row_count(&self) -> u32 {
        self.end_row - self.start_row
    }

    pub fn column_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn to_a1(&self) -> String {
        range_to_a1(self.start(), self.end())
    }
}

/// A finalized table: identity, region and ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub region: TableRegion,
    pub columns: Vec<ColumnDescriptor>,
    /// Style name (e.g., "TableStyleMedium16")
    pub style_name: String,
    pub banded_rows: bool,
    pub banded_columns: bool,
    /// Header carries filter buttons over the whole region.
    pub filterable: bool,
}

impl TableDescriptor {
    pub fn data_row_count(&self) -> u32 {
        self.region.data_row_count()
    }

    pub fn has_data(&self) -> bool {
        self.data_row_count() > 0
    }

    /// Index of the column named `name`.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// A table together with its encoded rows and final widths, ready for a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub table: TableDescriptor,
    pub rows: Vec<RowBuffer>,
    pub widths: ColumnWidths,
}

pub struct TableBuilder<'a> {
    config: &'a ExportConfig,
}

impl<'a> TableBuilder<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        TableBuilder { config }
    }

    /// Anchors the table at A1. `columns` must not be empty.
    pub fn build(
        &self,
        columns: Vec<ColumnDescriptor>,
        rows: Vec<RowBuffer>,
        widths: ColumnWidths,
    ) -> Result<TableData, ExportError> {
        let region = anchored_region(rows.len(), columns.len())?;

        let table = TableDescriptor {
            id: self.config.table_id,
            name: self.config.table_name.clone(),
            display_name: self.config.table_display_name.clone(),
            region,
            columns,
            style_name: self.config.table_style.clone(),
            banded_rows: true,
            banded_columns: false,
            filterable: true,
        };

        log::debug!(
            target: "EXPORT",
            "table '{}' id={} region={}",
            table.name,
            table.id,
            region.to_a1()
        );

        Ok(TableData { table, rows, widths })
    }
}

fn anchored_region(row_count: usize, column_count: usize) -> Result<TableRegion, ExportError> {
    if column_count == 0 {
        return Err(ExportError::NoColumns);
    }
    let end_row = u32::try_from(row_count).map_err(|_| ExportError::TooManyRows(row_count))?;
    let end_col =
        u32::try_from(column_count - 1).map_err(|_| ExportError::TooManyColumns(column_count))?;
    Ok(TableRegion {
        start_row: 0,
        start_col: 0,
        end_row,
        end_col,
    })
}
