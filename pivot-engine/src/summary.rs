//! FILENAME: pivot-engine/src/summary.rs
//! Pivot Summary - computes the cross-tabulation a descriptor asks for.
//!
//! Algorithm:
//! 1. Group data rows by the typed values of the row fields, keeping the
//!    order in which each group is first seen in the source. `Integer(1)` and
//!    `Text("1")` are different groups, as are `Empty` and `Text("")`.
//! 2. Feed every value field of every row into its group's accumulator and
//!    into the grand-total accumulator.
//! 3. Finalize each accumulator with its aggregation function.

use chrono::NaiveDateTime;
use engine::{CellValue, RowBuffer, TableDescriptor};
use rustc_hash::FxHashMap;

use crate::definition::{AggregationType, PivotDescriptor};

/// One computed pivot row: its row-field labels and one result per value field.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSummaryRow {
    pub labels: Vec<CellValue>,
    /// `None` when the aggregation has no numeric input (blank cell).
    pub values: Vec<Option<f64>>,
}

/// The materialized pivot: headers, grouped rows and the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSummary {
    /// Row field names followed by value field captions.
    pub header: Vec<String>,
    pub rows: Vec<PivotSummaryRow>,
    pub grand_total: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    sum: f64,
    numeric: usize,
    non_empty: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn add(&mut self, cell: &CellValue) {
        if cell.is_empty() {
            return;
        }
        self.non_empty += 1;
        if let Some(n) = cell.as_number() {
            self.sum += n;
            self.numeric += 1;
            self.min = Some(self.min.map_or(n, |m| m.min(n)));
            self.max = Some(self.max.map_or(n, |m| m.max(n)));
        }
    }

    fn finish(&self, aggregation: AggregationType) -> Option<f64> {
        match aggregation {
            AggregationType::Count => Some(self.non_empty as f64),
            _ if self.numeric == 0 => None,
            AggregationType::Sum => Some(self.sum),
            AggregationType::Average => Some(self.sum / self.numeric as f64),
            AggregationType::Min => self.min,
            AggregationType::Max => self.max,
        }
    }
}

/// Hashable mirror of `CellValue`. Floats compare by bit pattern, with the
/// two zeros folded together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Integer(i64),
    Float(u64),
    FixedPoint(u64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    UniqueId(String),
    Empty,
}

impl GroupKey {
    fn of(cell: &CellValue) -> Self {
        match cell {
            CellValue::Integer(n) => GroupKey::Integer(*n),
            CellValue::Float(n) => GroupKey::Float(float_bits(*n)),
            CellValue::FixedPoint(n) => GroupKey::FixedPoint(float_bits(*n)),
            CellValue::Text(s) => GroupKey::Text(s.clone()),
            CellValue::Boolean(b) => GroupKey::Boolean(*b),
            CellValue::DateTime(dt) => GroupKey::DateTime(*dt),
            CellValue::UniqueId(s) => GroupKey::UniqueId(s.clone()),
            CellValue::Empty => GroupKey::Empty,
        }
    }
}

fn float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

struct Group {
    labels: Vec<CellValue>,
    accumulators: Vec<Accumulator>,
}

/// Computes the pivot for `descriptor` over the table's encoded rows.
pub fn summarize(descriptor: &PivotDescriptor, table: &TableDescriptor, rows: &[RowBuffer]) -> PivotSummary {
    let value_count = descriptor.column_aggregations.len();

    let mut header: Vec<String> = descriptor
        .row_field_indices
        .iter()
        .filter_map(|i| table.columns.get(*i).map(|c| c.name.clone()))
        .collect();
    header.extend(descriptor.column_aggregations.iter().map(|v| v.caption()));

    let mut groups: Vec<Group> = Vec::new();
    let mut group_by_key: FxHashMap<Vec<GroupKey>, usize> = FxHashMap::default();
    let mut total = vec![Accumulator::default(); value_count];

    for row in rows {
        let key: Vec<GroupKey> = descriptor
            .row_field_indices
            .iter()
            .map(|i| row.get(*i).map_or(GroupKey::Empty, GroupKey::of))
            .collect();

        let slot = match group_by_key.get(&key) {
            Some(slot) => *slot,
            None => {
                let labels = descriptor
                    .row_field_indices
                    .iter()
                    .map(|i| row.get(*i).cloned().unwrap_or_default())
                    .collect();
                groups.push(Group {
                    labels,
                    accumulators: vec![Accumulator::default(); value_count],
                });
                group_by_key.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        for (v, field) in descriptor.column_aggregations.iter().enumerate() {
            if let Some(cell) = row.get(field.source_index) {
                groups[slot].accumulators[v].add(cell);
                total[v].add(cell);
            }
        }
    }

    let finish = |accumulators: &[Accumulator]| -> Vec<Option<f64>> {
        descriptor
            .column_aggregations
            .iter()
            .zip(accumulators)
            .map(|(field, acc)| acc.finish(field.aggregation))
            .collect()
    };

    let summary_rows = groups
        .iter()
        .map(|g| PivotSummaryRow {
            labels: g.labels.clone(),
            values: finish(g.accumulators.as_slice()),
        })
        .collect::<Vec<_>>();

    log::debug!(
        target: "PIVOT",
        "summarized {} source rows into {} groups",
        rows.len(),
        summary_rows.len()
    );

    PivotSummary {
        header,
        rows: summary_rows,
        grand_total: finish(total.as_slice()),
    }
}
