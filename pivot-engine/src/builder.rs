//! FILENAME: pivot-engine/src/builder.rs
//! Resolves pivot settings against a finalized table.
//!
//! Names that match no column are skipped rather than rejected, so one set of
//! settings can be reused across datasets that lack some of the columns.

use engine::TableDescriptor;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{FieldIndex, PivotDescriptor, PivotSettings, ValueField};

pub struct PivotSpecBuilder<'a> {
    table: &'a TableDescriptor,
    index_by_name: FxHashMap<&'a str, FieldIndex>,
}

impl<'a> PivotSpecBuilder<'a> {
    pub fn new(table: &'a TableDescriptor) -> Self {
        let index_by_name = table
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.index))
            .collect();
        PivotSpecBuilder {
            table,
            index_by_name,
        }
    }

    /// Runs on column metadata only, so a header-only table still resolves.
    pub fn build(&self, settings: &PivotSettings) -> PivotDescriptor {
        let mut row_field_indices: SmallVec<[FieldIndex; 4]> = SmallVec::new();
        for name in &settings.row_labels {
            match self.resolve(name) {
                // A field sits on the row axis at most once.
                Some(index) if row_field_indices.contains(&index) => {
                    log::debug!(target: "PIVOT", "duplicate row label '{}' ignored", name);
                }
                Some(index) => row_field_indices.push(index),
                None => {}
            }
        }

        let mut column_aggregations = Vec::with_capacity(settings.column_labels.len());
        for label in &settings.column_labels {
            if let Some(index) = self.resolve(&label.name) {
                column_aggregations.push(ValueField::new(index, label.aggregation, label.name.clone()));
            }
        }

        log::info!(
            target: "PIVOT",
            "resolved pivot over '{}' row_fields={} value_fields={}",
            self.table.name,
            row_field_indices.len(),
            column_aggregations.len()
        );

        PivotDescriptor {
            source_table: self.table.name.clone(),
            source_region: self.table.region,
            row_field_indices,
            column_aggregations,
        }
    }

    fn resolve(&self, name: &str) -> Option<FieldIndex> {
        let found = self.index_by_name.get(name).copied();
        if found.is_none() {
            log::debug!(
                target: "PIVOT",
                "label '{}' matches no column of '{}', skipped",
                name,
                self.table.name
            );
        }
        found
    }
}
