//! FILENAME: engine/src/encoder.rs
//! PURPOSE: Maps record field values to spreadsheet cell values.
//! CONTEXT: A closed registry keyed by `TypeTag`. It is built once per export
//! and passed by reference; there is no global dispatch table. Encoding never
//! fails: a value with no usable mapping degrades to its string form.

use num_traits::ToPrimitive;
use rustc_hash::FxHashMap;

use crate::cell::CellValue;
use crate::value::{FieldValue, TypeTag, GENERIC_DATETIME_FORMAT};

/// Converts one field value to a cell value. Never called with `Null`.
pub type EncodeFn = fn(FieldValue) -> CellValue;

#[derive(Debug, Clone)]
pub struct CellEncoder {
    mappings: FxHashMap<TypeTag, EncodeFn>,
}

impl CellEncoder {
    /// The standard mapping for every tag except `Other`, which always takes
    /// the string fallback.
    pub fn standard() -> Self {
        let mut mappings: FxHashMap<TypeTag, EncodeFn> = FxHashMap::default();
        mappings.insert(TypeTag::Integer, encode_integer);
        mappings.insert(TypeTag::Float, encode_float);
        mappings.insert(TypeTag::FixedPoint, encode_fixed_point);
        mappings.insert(TypeTag::Text, encode_text);
        mappings.insert(TypeTag::Character, encode_text);
        mappings.insert(TypeTag::Boolean, encode_boolean);
        mappings.insert(TypeTag::DateTime, encode_datetime);
        mappings.insert(TypeTag::UniqueId, encode_unique_id);
        CellEncoder { mappings }
    }

    /// Returns a copy with `tag` mapped to `encode`.
    pub fn with_mapping(mut self, tag: TypeTag, encode: EncodeFn) -> Self {
        self.mappings.insert(tag, encode);
        self
    }

    pub fn has_mapping(&self, tag: TypeTag) -> bool {
        self.mappings.contains_key(&tag)
    }

    pub fn encode(&self, tag: TypeTag, value: FieldValue) -> CellValue {
        if value.is_null() {
            return CellValue::Empty;
        }
        match self.mappings.get(&tag) {
            Some(encode) => encode(value),
            None => fallback_text(value),
        }
    }
}

impl Default for CellEncoder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Generic string conversion. Total over every variant.
pub fn fallback_text(value: FieldValue) -> CellValue {
    match value.to_text(GENERIC_DATETIME_FORMAT) {
        Some(text) => CellValue::Text(text),
        None => CellValue::Empty,
    }
}

fn decimal_to_f64(value: &bigdecimal::BigDecimal) -> Option<f64> {
    value
        .to_f64()
        .filter(|f| f.is_finite())
        .or_else(|| value.to_string().parse::<f64>().ok())
}

fn encode_integer(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Int(n) => CellValue::Integer(n),
        // Narrow to the native signed cell type; beyond it keep the magnitude as a double.
        FieldValue::UInt(n) => match i64::try_from(n) {
            Ok(n) => CellValue::Integer(n),
            Err(_) => CellValue::Float(n as f64),
        },
        FieldValue::Float(f) => CellValue::Float(f),
        other => encode_fixed_point(other),
    }
}

fn encode_float(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Float(f) => CellValue::Float(f),
        FieldValue::Int(n) => CellValue::Float(n as f64),
        FieldValue::UInt(n) => CellValue::Float(n as f64),
        other => encode_fixed_point(other),
    }
}

fn encode_fixed_point(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Decimal(d) => match decimal_to_f64(&d) {
            Some(f) => CellValue::FixedPoint(f),
            None => CellValue::Text(d.to_string()),
        },
        FieldValue::Int(n) => CellValue::FixedPoint(n as f64),
        FieldValue::UInt(n) => CellValue::FixedPoint(n as f64),
        FieldValue::Float(f) => CellValue::FixedPoint(f),
        other => fallback_text(other),
    }
}

fn encode_text(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Text(s) => CellValue::Text(s),
        FieldValue::Char(c) => CellValue::Text(c.to_string()),
        other => fallback_text(other),
    }
}

fn encode_boolean(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Bool(b) => CellValue::Boolean(b),
        other => fallback_text(other),
    }
}

fn encode_datetime(value: FieldValue) -> CellValue {
    match value {
        FieldValue::DateTime(dt) => CellValue::DateTime(dt),
        other => fallback_text(other),
    }
}

fn encode_unique_id(value: FieldValue) -> CellValue {
    match value {
        FieldValue::Uuid(id) => CellValue::UniqueId(id.hyphenated().to_string()),
        other => fallback_text(other),
    }
}
