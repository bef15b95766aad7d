//! FILENAME: engine/src/value.rs
//! PURPOSE: Runtime values read from source records and their semantic type tags.
//! CONTEXT: A record exposes each field as a `FieldValue`. The `TypeTag` is the
//! semantic category used to pick an encoder, independent of the exact Rust
//! type the caller stored (i8 and u64 are both `Integer`).

use std::fmt::Write;

use bigdecimal::BigDecimal;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// chrono format of the generic string conversion of date/time values.
pub const GENERIC_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// True when every specifier in `format` is one chrono understands.
pub fn is_valid_datetime_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Renders `dt` with `format`, falling back to the generic format when chrono
/// rejects a specifier.
pub fn format_datetime(dt: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(format)).is_err() {
        log::warn!(target: "EXPORT", "invalid datetime format '{}', using generic form", format);
        out.clear();
        let _ = write!(out, "{}", dt.format(GENERIC_DATETIME_FORMAT));
    }
    out
}

/// Semantic category of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    Float,
    FixedPoint,
    Text,
    Character,
    Boolean,
    DateTime,
    UniqueId,
    /// No dedicated encoder; rendered through the value's string form.
    Other,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::FixedPoint,
        TypeTag::Text,
        TypeTag::Character,
        TypeTag::Boolean,
        TypeTag::DateTime,
        TypeTag::UniqueId,
        TypeTag::Other,
    ];
}

/// The value of a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(BigDecimal),
    Text(String),
    Char(char),
    Bool(bool),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    /// A value of a type with no mapping, already converted to its string form.
    Other(String),
}

impl FieldValue {
    /// Infers the semantic tag from the runtime variant.
    /// `Null` carries no type information and maps to `Other`.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            FieldValue::Int(_) | FieldValue::UInt(_) => TypeTag::Integer,
            FieldValue::Float(_) => TypeTag::Float,
            FieldValue::Decimal(_) => TypeTag::FixedPoint,
            FieldValue::Text(_) => TypeTag::Text,
            FieldValue::Char(_) => TypeTag::Character,
            FieldValue::Bool(_) => TypeTag::Boolean,
            FieldValue::DateTime(_) => TypeTag::DateTime,
            FieldValue::Uuid(_) => TypeTag::UniqueId,
            FieldValue::Null | FieldValue::Other(_) => TypeTag::Other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The generic string conversion of the value. `None` for `Null`.
    pub fn to_text(&self, datetime_format: &str) -> Option<String> {
        let text = match self {
            FieldValue::Null => return None,
            FieldValue::Int(n) => n.to_string(),
            FieldValue::UInt(n) => n.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Text(s) | FieldValue::Other(s) => s.clone(),
            FieldValue::Char(c) => c.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::DateTime(dt) => format_datetime(dt, datetime_format),
            FieldValue::Uuid(id) => id.hyphenated().to_string(),
        };
        Some(text)
    }

    /// Length of the string form in characters (0 for `Null`).
    pub fn text_len(&self, datetime_format: &str) -> usize {
        match self {
            FieldValue::Text(s) | FieldValue::Other(s) => s.chars().count(),
            FieldValue::Char(_) => 1,
            FieldValue::Uuid(_) => uuid::fmt::Hyphenated::LENGTH,
            other => other
                .to_text(datetime_format)
                .map(|s| s.chars().count())
                .unwrap_or(0),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<BigDecimal> for FieldValue {
    fn from(v: BigDecimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<char> for FieldValue {
    fn from(v: char) -> Self {
        FieldValue::Char(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::DateTime(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        FieldValue::Uuid(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
