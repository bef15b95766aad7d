//! FILENAME: engine/src/width.rs
//! PURPOSE: Single-pass column width estimation.
//! CONTEXT: Widths are tracked in characters while rows stream through, then
//! converted once to XLSX width units. No second auto-fit pass over the cells.

use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::schema::ColumnDescriptor;

/// Final per-column widths, indexed like the column descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnWidths {
    /// Estimated width in characters.
    pub chars: Vec<usize>,
    /// Exported width in units of 1/256 character.
    pub units: Vec<u32>,
}

impl ColumnWidths {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Exported width of `index` expressed in characters, as spreadsheet
    /// writers expect it.
    pub fn char_width(&self, index: usize, units_per_char: u32) -> Option<f64> {
        self.units
            .get(index)
            .map(|u| *u as f64 / units_per_char as f64)
    }
}

#[derive(Debug, Clone)]
pub struct ColumnWidthEstimator {
    widths: Vec<usize>,
    data_pad: usize,
}

impl ColumnWidthEstimator {
    /// Seeds every column with its header length plus the header pad.
    pub fn new(columns: &[ColumnDescriptor], config: &ExportConfig) -> Self {
        let widths = columns
            .iter()
            .map(|c| c.name.chars().count() + config.header_pad)
            .collect();
        ColumnWidthEstimator {
            widths,
            data_pad: config.data_pad,
        }
    }

    /// Records a rendered value of `len` characters in column `index`.
    /// A width only ever grows.
    pub fn observe(&mut self, index: usize, len: usize) {
        if len == 0 {
            return;
        }
        if let Some(width) = self.widths.get_mut(index) {
            let padded = len + self.data_pad;
            if padded > *width {
                *width = padded;
            }
        }
    }

    pub fn width(&self, index: usize) -> Option<usize> {
        self.widths.get(index).copied()
    }

    pub fn finish(self, config: &ExportConfig) -> ColumnWidths {
        let units = self
            .widths
            .iter()
            .map(|w| export_units(*w, config))
            .collect();
        ColumnWidths {
            chars: self.widths,
            units,
        }
    }
}

/// `max(floor(chars * scale) * units_per_char, min_width_units)`
pub fn export_units(chars: usize, config: &ExportConfig) -> u32 {
    let scaled = (chars as f64 * config.scale_factor).floor();
    let units = (scaled * config.units_per_char as f64).min(u32::MAX as f64) as u32;
    units.max(config.min_width_units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    fn columns(names: &[&str]) -> Vec<ColumnDescriptor> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ColumnDescriptor::new(*n, TypeTag::Text, i))
            .collect()
    }

    #[test]
    fn test_seeded_from_header() {
        let config = ExportConfig::default();
        let est = ColumnWidthEstimator::new(&columns(&["PRODUCT", "CA_NET"]), &config);
        assert_eq!(est.width(0), Some(11));
        assert_eq!(est.width(1), Some(10));
    }

    #[test]
    fn test_grows_with_padding_and_never_shrinks() {
        let config = ExportConfig::default();
        let mut est = ColumnWidthEstimator::new(&columns(&["ID"]), &config);
        assert_eq!(est.width(0), Some(6));

        est.observe(0, 3);
        assert_eq!(est.width(0), Some(6));
        est.observe(0, 5);
        assert_eq!(est.width(0), Some(7));
        est.observe(0, 20);
        assert_eq!(est.width(0), Some(22));
        est.observe(0, 1);
        assert_eq!(est.width(0), Some(22));
    }

    #[test]
    fn test_matches_closed_form() {
        let config = ExportConfig::default();
        let header = "NAME";
        let lens = [3usize, 0, 9, 4, 7];
        let mut est = ColumnWidthEstimator::new(&columns(&[header]), &config);
        for len in lens {
            est.observe(0, len);
        }
        let expected = lens
            .iter()
            .filter(|l| **l > 0)
            .map(|l| l + 2)
            .chain(std::iter::once(header.len() + 4))
            .max()
            .unwrap();
        assert_eq!(est.width(0), Some(expected));
    }

    #[test]
    fn test_empty_value_contributes_nothing() {
        let config = ExportConfig::default();
        let mut est = ColumnWidthEstimator::new(&columns(&[""]), &config);
        est.observe(0, 0);
        assert_eq!(est.width(0), Some(4));
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let config = ExportConfig::default();
        let mut est = ColumnWidthEstimator::new(&columns(&["A"]), &config);
        est.observe(5, 100);
        assert_eq!(est.width(5), None);
    }

    #[test]
    fn test_export_units() {
        let config = ExportConfig::default();
        // floor(22 * 1.25) = 27 -> 27 * 256
        assert_eq!(export_units(22, &config), 6912);
        // small widths clamp to the minimum
        assert_eq!(export_units(5, &config), 2048);

        let wide = ExportConfig { scale_factor: 1.3, ..ExportConfig::default() };
        // floor(10 * 1.3) = 13
        assert_eq!(export_units(10, &wide), 13 * 256);
    }

    #[test]
    fn test_finish() {
        let config = ExportConfig::default();
        let mut est = ColumnWidthEstimator::new(&columns(&["PRODUCT", "X"]), &config);
        est.observe(0, 30);
        let widths = est.finish(&config);
        assert_eq!(widths.chars, vec![32, 5]);
        assert_eq!(widths.units, vec![40 * 256, 2048]);
        assert_eq!(widths.char_width(0, 256), Some(40.0));
    }
}
