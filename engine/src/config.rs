//! FILENAME: engine/src/config.rs
//! PURPOSE: Tunables for an export call.
//! CONTEXT: Built once by the caller and passed by reference through the
//! pipeline. Every field has a default so partial JSON documents load.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::value::{is_valid_datetime_format, GENERIC_DATETIME_FORMAT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Characters added to a header name when seeding a column width.
    pub header_pad: usize,
    /// Characters added to a data value that widens a column.
    pub data_pad: usize,
    /// Multiplier applied to the character estimate before unit conversion.
    pub scale_factor: f64,
    /// Width units per character (1/256 of a character in XLSX).
    pub units_per_char: u32,
    /// Lower bound on the exported width, in units.
    pub min_width_units: u32,
    /// chrono format used for the string form of date/time values.
    pub datetime_format: String,
    /// Spreadsheet number format applied to date/time cells.
    pub excel_datetime_format: String,
    pub sheet_name: String,
    pub pivot_sheet_name: String,
    pub table_name: String,
    pub table_display_name: String,
    pub table_id: u32,
    pub table_style: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            header_pad: 4,
            data_pad: 2,
            scale_factor: 1.25,
            units_per_char: 256,
            min_width_units: 2048,
            datetime_format: GENERIC_DATETIME_FORMAT.to_string(),
            excel_datetime_format: "yyyy-mm-dd hh:mm:ss".to_string(),
            sheet_name: "DATA".to_string(),
            pivot_sheet_name: "PIVOT".to_string(),
            table_name: "Data".to_string(),
            table_display_name: "MYTABLE".to_string(),
            table_id: 1,
            table_style: "TableStyleMedium16".to_string(),
        }
    }
}

impl ExportConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = serde_json::from_str(json)
            .map_err(|e| ExportError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(ExportError::InvalidConfig(format!(
                "scaleFactor must be a positive number, got {}",
                self.scale_factor
            )));
        }
        if self.units_per_char == 0 {
            return Err(ExportError::InvalidConfig(
                "unitsPerChar must be positive".to_string(),
            ));
        }
        if self.sheet_name.is_empty() || self.sheet_name == self.pivot_sheet_name {
            return Err(ExportError::InvalidConfig(
                "sheetName must be non-empty and differ from pivotSheetName".to_string(),
            ));
        }
        if !is_valid_datetime_format(&self.datetime_format) {
            return Err(ExportError::InvalidConfig(format!(
                "datetimeFormat '{}' is not a valid chrono format",
                self.datetime_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ExportConfig::from_json(r#"{"scaleFactor": 1.3, "sheetName": "Stats"}"#).unwrap();
        assert_eq!(config.scale_factor, 1.3);
        assert_eq!(config.sheet_name, "Stats");
        assert_eq!(config.header_pad, 4);
        assert_eq!(config.min_width_units, 2048);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ExportConfig::default();
        let back = ExportConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_bad_scale() {
        let err = ExportConfig::from_json(r#"{"scaleFactor": 0}"#).unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_datetime_format() {
        let err = ExportConfig::from_json(r#"{"datetimeFormat": "%Q"}"#).unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));

        let config = ExportConfig::from_json(r#"{"datetimeFormat": "%d/%m/%Y %H:%M"}"#).unwrap();
        assert_eq!(config.datetime_format, "%d/%m/%Y %H:%M");
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(ExportConfig::from_json("{not json").is_err());
    }
}
