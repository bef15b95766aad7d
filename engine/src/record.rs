//! FILENAME: engine/src/record.rs
//! PURPOSE: The view the pipeline has of one source item.
//! CONTEXT: Rust has no runtime field discovery, so a record describes its own
//! fields: names in declaration order plus lookup by name. Typed structs
//! implement `Record` by hand; `DynRecord` covers dynamic data.

use crate::value::FieldValue;

/// A source item exposing a fixed, ordered set of named fields.
pub trait Record {
    /// Field names in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Value of the named field, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_names(&self) -> Vec<&str> {
        (**self).field_names()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field_names(&self) -> Vec<&str> {
        (**self).field_names()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

/// An ordered name/value record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynRecord {
    fields: Vec<(String, FieldValue)>,
}

impl DynRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, or replaces the value of an existing one in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for DynRecord {
    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

impl<N: Into<String>, V: Into<FieldValue>> FromIterator<(N, V)> for DynRecord {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut record = DynRecord::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}
