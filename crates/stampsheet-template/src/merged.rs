//! Queries over a sheet's merged-region list.
//!
//! The list is unsorted and its order changes when regions are removed, so
//! every query is a linear scan and regions are handled by value.

use stampsheet_core::{CellCoord, CellRange, Sheet};

/// Rows one logical template row expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    pub first_row: u32,
    pub last_row: u32,
    /// The region that widened the block, `None` for a plain single row
    pub region: Option<CellRange>,
}

impl RowBlock {
    pub fn single(row: u32) -> Self {
        RowBlock {
            first_row: row,
            last_row: row,
            region: None,
        }
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.first_row..=self.last_row
    }

    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }
}

/// The region containing `(row, col)`, first match in list order
pub fn region_containing(sheet: &Sheet, row: u32, col: u32) -> Option<CellRange> {
    let coord = CellCoord::new(row, col);
    sheet
        .merged_regions()
        .iter()
        .find(|region| region.contains(coord))
        .copied()
}

/// Position in the region list of the region containing `(row, col)`
pub fn region_index(sheet: &Sheet, row: u32, col: u32) -> Option<usize> {
    let coord = CellCoord::new(row, col);
    sheet
        .merged_regions()
        .iter()
        .position(|region| region.contains(coord))
}

/// Expand `row` to the full row span of the first region crossing it
pub fn row_block(sheet: &Sheet, row: u32) -> RowBlock {
    sheet
        .merged_regions()
        .iter()
        .find(|region| region.contains_row(row))
        .map(|region| RowBlock {
            first_row: region.start.row,
            last_row: region.end.row,
            region: Some(*region),
        })
        .unwrap_or_else(|| RowBlock::single(row))
}

pub fn row_intersects_any_region(sheet: &Sheet, row: u32) -> bool {
    sheet
        .merged_regions()
        .iter()
        .any(|region| region.contains_row(row))
}

/// Whether `range` overlaps any region of the sheet
pub fn range_intersects_any_region(sheet: &Sheet, range: &CellRange) -> bool {
    sheet
        .merged_regions()
        .iter()
        .any(|region| region.intersects(range))
}

/// Positions of every region overlapping `range`, ascending
pub fn overlapping_indices(sheet: &Sheet, range: &CellRange) -> Vec<usize> {
    sheet
        .merged_regions()
        .iter()
        .enumerate()
        .filter(|(_, region)| region.intersects(range))
        .map(|(i, _)| i)
        .collect()
}

/// Display text of the anchor of the region containing `(row, col)`, or an
/// empty string when the cell is not merged
pub fn merged_region_value(sheet: &Sheet, row: u32, col: u32) -> String {
    region_containing(sheet, row, col)
        .and_then(|region| sheet.get_cell(region.start))
        .map(|cell| cell.value.display_text())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampsheet_core::Cell;

    fn sheet_with_regions(regions: &[&str]) -> Sheet {
        let mut sheet = Sheet::new("Test");
        for a1 in regions {
            sheet.add_merged_region(CellRange::from_a1(a1).unwrap());
        }
        sheet
    }

    #[test]
    fn test_region_containing() {
        let sheet = sheet_with_regions(&["A1:B2", "D3:E5"]);
        assert_eq!(region_containing(&sheet, 1, 1).unwrap().to_a1(), "A1:B2");
        assert_eq!(region_containing(&sheet, 4, 4).unwrap().to_a1(), "D3:E5");
        assert_eq!(region_containing(&sheet, 2, 0), None);
        assert_eq!(region_index(&sheet, 2, 3), Some(1));
        assert_eq!(region_index(&sheet, 9, 9), None);
    }

    #[test]
    fn test_row_block() {
        let sheet = sheet_with_regions(&["C2:D4"]);
        let block = row_block(&sheet, 2);
        assert_eq!((block.first_row, block.last_row), (1, 3));
        assert_eq!(block.row_count(), 3);
        assert_eq!(block.region.unwrap().to_a1(), "C2:D4");

        assert_eq!(row_block(&sheet, 7), RowBlock::single(7));
        assert_eq!(RowBlock::single(7).rows().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_row_intersects() {
        let sheet = sheet_with_regions(&["C2:D4"]);
        assert!(row_intersects_any_region(&sheet, 3));
        assert!(!row_intersects_any_region(&sheet, 0));
        assert!(!row_intersects_any_region(&sheet, 4));
    }

    #[test]
    fn test_overlapping_indices() {
        let sheet = sheet_with_regions(&["A1:A2", "C1:C1", "E5:F6"]);
        let probe = CellRange::from_a1("A1:C3").unwrap();
        assert_eq!(overlapping_indices(&sheet, &probe), vec![0, 1]);
        assert!(range_intersects_any_region(&sheet, &probe));
        assert!(!range_intersects_any_region(&sheet, &CellRange::from_a1("H1").unwrap()));
    }

    #[test]
    fn test_order_changes_after_removal() {
        let mut sheet = sheet_with_regions(&["A1:A2", "C1:C2", "E1:E2"]);
        assert_eq!(region_index(&sheet, 0, 4), Some(2));
        sheet.remove_merged_region(0);
        assert_eq!(region_index(&sheet, 0, 4), Some(1));
        assert_eq!(region_containing(&sheet, 0, 4).unwrap().to_a1(), "E1:E2");
    }

    #[test]
    fn test_merged_region_value() {
        let mut sheet = sheet_with_regions(&["B2:C3"]);
        sheet.set_cell(CellCoord::new(1, 1), Cell::number(12.0));
        assert_eq!(merged_region_value(&sheet, 2, 2), "12");
        assert_eq!(merged_region_value(&sheet, 0, 0), "");
    }
}
