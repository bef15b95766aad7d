//! FILENAME: pivot-engine/src/lib.rs
//! Pivot subsystem for the record export pipeline.
//!
//! It depends on `engine` only for shared types (TableDescriptor, CellValue).
//!
//! Layers:
//! - `definition`: Caller settings and the resolved descriptor (WHAT the pivot IS)
//! - `builder`: Name-to-column resolution (HOW settings bind to a table)
//! - `summary`: Summary calculation (WHAT a writer displays)

pub mod builder;
pub mod definition;
pub mod summary;

pub use builder::PivotSpecBuilder;
pub use definition::*;
pub use summary::{summarize, PivotSummary, PivotSummaryRow};
