//! FILENAME: pivot-engine/src/definition.rs
//! Pivot Table Definition - caller settings and the resolved descriptor.
//!
//! `PivotSettings` is what the caller asks for, by column name.
//! `PivotDescriptor` is the same request resolved against a table's columns,
//! by index, ready for a writer to build a cross-tabulation from.

use engine::TableRegion;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index into the source table columns (0-based).
pub type FieldIndex = usize;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for value fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Count,
    Average,
    Min,
    Max,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

impl AggregationType {
    /// Caption prefix used in value field headers ("Sum of CA_NET").
    pub fn label(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Count => "Count",
            AggregationType::Average => "Average",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
        }
    }
}

// ============================================================================
// SETTINGS (input)
// ============================================================================

/// A value column requested by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLabel {
    pub name: String,
    pub aggregation: AggregationType,
}

/// Caller-supplied pivot configuration, keyed by column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PivotSettings {
    /// Columns grouped on the row axis, outer to inner.
    pub row_labels: Vec<String>,
    /// Columns aggregated in the values area, in insertion order.
    pub column_labels: Vec<ColumnLabel>,
}

impl PivotSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_label(mut self, name: impl Into<String>) -> Self {
        self.row_labels.push(name.into());
        self
    }

    /// Adds a value column. Re-adding a name replaces its function in place,
    /// keeping its position.
    pub fn column_label(mut self, name: impl Into<String>, aggregation: AggregationType) -> Self {
        let name = name.into();
        match self.column_labels.iter_mut().find(|l| l.name == name) {
            Some(label) => label.aggregation = aggregation,
            None => self.column_labels.push(ColumnLabel { name, aggregation }),
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// DESCRIPTOR (output)
// ============================================================================

/// Represents a value field with its aggregation function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueField {
    /// Index of the source column.
    pub source_index: FieldIndex,

    /// The aggregation function to apply.
    pub aggregation: AggregationType,

    /// Display name; the source column name.
    pub name: String,
}

impl ValueField {
    pub fn new(source_index: FieldIndex, aggregation: AggregationType, name: String) -> Self {
        ValueField {
            source_index,
            aggregation,
            name,
        }
    }

    /// e.g. "Sum of CA_NET"
    pub fn caption(&self) -> String {
        format!("{} of {}", self.aggregation.label(), self.name)
    }
}

/// Pivot settings resolved against a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotDescriptor {
    /// Name of the table the pivot reads from.
    pub source_table: String,

    /// Region of the source table, header row included.
    pub source_region: TableRegion,

    /// Resolved row fields, in the order they were requested.
    pub row_field_indices: SmallVec<[FieldIndex; 4]>,

    /// Resolved value fields, in the order they were requested.
    pub column_aggregations: Vec<ValueField>,
}

impl PivotDescriptor {
    /// True when nothing resolved; a writer has nothing to lay out.
    pub fn is_empty(&self) -> bool {
        self.row_field_indices.is_empty() && self.column_aggregations.is_empty()
    }

    /// Returns the number of source rows (excluding the header).
    pub fn source_row_count(&self) -> u32 {
        self.source_region.data_row_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_label_keeps_insertion_order() {
        let settings = PivotSettings::new()
            .column_label("CA_NET", AggregationType::Sum)
            .column_label("QTE_VENDUE", AggregationType::Average)
            .column_label("CA_BRUT", AggregationType::Max);
        let names: Vec<&str> = settings.column_labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["CA_NET", "QTE_VENDUE", "CA_BRUT"]);
    }

    #[test]
    fn test_column_label_replaces_in_place() {
        let settings = PivotSettings::new()
            .column_label("A", AggregationType::Sum)
            .column_label("B", AggregationType::Sum)
            .column_label("A", AggregationType::Count);
        assert_eq!(settings.column_labels.len(), 2);
        assert_eq!(settings.column_labels[0].name, "A");
        assert_eq!(settings.column_labels[0].aggregation, AggregationType::Count);
    }

    #[test]
    fn test_settings_from_json() {
        let settings = PivotSettings::from_json(
            r#"{
                "rowLabels": ["PRODUCT", "MONTH"],
                "columnLabels": [
                    {"name": "CA_NET", "aggregation": "Sum"},
                    {"name": "QTE_VENDUE", "aggregation": "Average"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(settings.row_labels, vec!["PRODUCT", "MONTH"]);
        assert_eq!(settings.column_labels[1].aggregation, AggregationType::Average);
    }

    #[test]
    fn test_caption() {
        let field = ValueField::new(1, AggregationType::Sum, "CA_NET".to_string());
        assert_eq!(field.caption(), "Sum of CA_NET");
    }
}
