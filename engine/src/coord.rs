//! FILENAME: engine/src/coord.rs
//! PURPOSE: Renders 0-based (row, col) coordinates in A1 notation.
//! CONTEXT: Table regions are kept as numeric coordinates and only turned into
//! "A1:B3" strings when a writer or a log line needs them.
//! Column 0 = "A", 25 = "Z", 26 = "AA". Row 0 = "1".

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}

/// ((0, 0), (2, 1)) -> "A1:B3"
pub fn range_to_a1(start: CellCoord, end: CellCoord) -> String {
    format!("{}:{}", coord_to_a1(start), coord_to_a1(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_to_col() {
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(1), "B");
        assert_eq!(index_to_col(25), "Z");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(27), "AB");
        assert_eq!(index_to_col(51), "AZ");
        assert_eq!(index_to_col(52), "BA");
        assert_eq!(index_to_col(701), "ZZ");
        assert_eq!(index_to_col(702), "AAA");
    }

    #[test]
    fn test_coord_to_a1() {
        assert_eq!(coord_to_a1((0, 0)), "A1");
        assert_eq!(coord_to_a1((1, 1)), "B2");
        assert_eq!(coord_to_a1((99, 26)), "AA100");
        assert_eq!(coord_to_a1((49, 25)), "Z50");
    }

    #[test]
    fn test_range_to_a1() {
        assert_eq!(range_to_a1((0, 0), (2, 1)), "A1:B3");
        assert_eq!(range_to_a1((0, 0), (0, 5)), "A1:F1");
    }
}
