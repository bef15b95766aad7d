//! FILENAME: engine/src/schema.rs
//! PURPOSE: Determines the ordered column set of an export.
//! CONTEXT: Columns come either from an explicit `Schema` supplied by the
//! caller or from the first record of the source. The order fixed here is
//! never changed afterwards.

use std::iter::Peekable;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::record::Record;
use crate::value::TypeTag;

/// A resolved table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Header text, unique within the table.
    pub name: String,
    pub type_tag: TypeTag,
    /// 0-based position in the table.
    pub index: usize,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_tag: TypeTag, index: usize) -> Self {
        ColumnDescriptor {
            name: name.into(),
            type_tag,
            index,
        }
    }
}

/// Explicit, ordered column declaration supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<(String, TypeTag)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, type_tag: TypeTag) -> Self {
        self.columns.push((name.into(), type_tag));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub struct SchemaReader;

impl SchemaReader {
    /// Resolves the column set for `source`.
    ///
    /// An explicit schema wins and is used verbatim. Otherwise the first record
    /// is peeked (not consumed) and its fields are enumerated in declaration
    /// order, each tagged from its runtime value.
    pub fn infer<I>(
        source: Option<&mut Peekable<I>>,
        schema: Option<&Schema>,
    ) -> Result<Vec<ColumnDescriptor>, ExportError>
    where
        I: Iterator,
        I::Item: Record,
    {
        let source = source.ok_or(ExportError::NullSource)?;

        let columns = match schema {
            Some(schema) => Self::from_schema(schema),
            None => {
                let first = source.peek().ok_or(ExportError::EmptySource)?;
                Self::from_record(first)
            }
        };

        if columns.is_empty() {
            return Err(ExportError::NoColumns);
        }
        Self::check_unique(&columns)?;
        Ok(columns)
    }

    pub fn from_schema(schema: &Schema) -> Vec<ColumnDescriptor> {
        schema
            .columns
            .iter()
            .enumerate()
            .map(|(index, (name, tag))| ColumnDescriptor::new(name.clone(), *tag, index))
            .collect()
    }

    pub fn from_record<R: Record>(record: &R) -> Vec<ColumnDescriptor> {
        record
            .field_names()
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let tag = record
                    .field(name)
                    .map(|v| v.type_tag())
                    .unwrap_or(TypeTag::Other);
                ColumnDescriptor::new(name, tag, index)
            })
            .collect()
    }

    fn check_unique(columns: &[ColumnDescriptor]) -> Result<(), ExportError> {
        let mut seen = FxHashSet::default();
        for column in columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ExportError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(())
    }
}
