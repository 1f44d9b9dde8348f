use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::cell::Cell;
use crate::drawing::Drawing;
use crate::range::{CellCoord, CellRange};

/// Default row height in points
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;
/// Default column width in character units
pub const DEFAULT_COL_WIDTH: f64 = 8.43;
/// Twips per point
pub const TWIPS_PER_POINT: f64 = 20.0;

/// One row of a sheet: sparse cells plus an optional custom height
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    cells: BTreeMap<u32, Cell>,
    /// Custom height in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Get a mutable reference to a cell, creating a blank one if needed
    pub fn get_or_create_cell(&mut self, col: u32) -> &mut Cell {
        self.cells.entry(col).or_default()
    }

    pub fn set_cell(&mut self, col: u32, cell: Cell) {
        self.cells.insert(col, cell);
    }

    /// First occupied column
    pub fn first_cell_num(&self) -> Option<u32> {
        self.cells.keys().next().copied()
    }

    /// Last occupied column (inclusive)
    pub fn last_cell_num(&self) -> Option<u32> {
        self.cells.keys().next_back().copied()
    }

    /// Custom height in points, if one was set
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Effective height in points
    pub fn height_points(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Effective height in twips (1/20 point)
    pub fn height_twips(&self) -> u16 {
        (self.height_points() * TWIPS_PER_POINT).round() as u16
    }

    /// Set or clear the custom height in points
    pub fn set_height(&mut self, height: Option<f64>) {
        self.height = height;
    }

    pub fn set_height_points(&mut self, points: f64) {
        self.height = Some(points);
    }

    pub fn set_height_twips(&mut self, twips: u16) {
        self.height = Some(f64::from(twips) / TWIPS_PER_POINT);
    }
}

/// A single sheet with sparse row storage and a merged-region list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name (displayed in tab)
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    rows: BTreeMap<u32, Row>,
    /// Merged regions in insertion order; they never overlap
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merged_regions: Vec<CellRange>,
    /// Custom column widths (column index -> width)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub col_widths: HashMap<u32, f64>,
    /// Default width for columns without custom width
    #[serde(default = "default_col_width")]
    pub default_col_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    drawing: Option<Drawing>,
}

fn default_col_width() -> f64 {
    DEFAULT_COL_WIDTH
}

impl Sheet {
    /// Maximum number of rows (Excel compatibility)
    pub const MAX_ROWS: u32 = 1_048_576;

    /// Create a new empty sheet with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            merged_regions: Vec::new(),
            col_widths: HashMap::new(),
            default_col_width: DEFAULT_COL_WIDTH,
            drawing: None,
        }
    }

    pub fn row(&self, row: u32) -> Option<&Row> {
        self.rows.get(&row)
    }

    /// Get a mutable reference to a row, creating it if it doesn't exist
    pub fn get_or_create_row(&mut self, row: u32) -> &mut Row {
        self.rows.entry(row).or_default()
    }

    /// Highest row index that exists, `None` for a sheet without rows
    pub fn last_row_num(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    pub fn first_row_num(&self) -> Option<u32> {
        self.rows.keys().next().copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a reference to a cell at the given coordinate
    pub fn get_cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.row(coord.row)?.cell(coord.col)
    }

    /// Get a mutable reference to a cell, creating row and cell if needed
    pub fn get_or_create_cell(&mut self, coord: CellCoord) -> &mut Cell {
        self.get_or_create_row(coord.row).get_or_create_cell(coord.col)
    }

    /// Set a cell at the given coordinate
    pub fn set_cell(&mut self, coord: CellCoord, cell: Cell) {
        self.get_or_create_row(coord.row).set_cell(coord.col, cell);
    }

    /// Get the column width for a specific column
    pub fn get_col_width(&self, col: u32) -> f64 {
        *self.col_widths.get(&col).unwrap_or(&self.default_col_width)
    }

    /// Set the column width for a specific column
    pub fn set_col_width(&mut self, col: u32, width: f64) {
        if (width - self.default_col_width).abs() < 0.01 {
            self.col_widths.remove(&col);
        } else {
            self.col_widths.insert(col, width);
        }
    }

    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    pub fn merged_region(&self, index: usize) -> Option<CellRange> {
        self.merged_regions.get(index).copied()
    }

    /// Append a merged region and return its position in the list
    pub fn add_merged_region(&mut self, region: CellRange) -> usize {
        self.merged_regions.push(region);
        self.merged_regions.len() - 1
    }

    /// Remove the merged region at `index`. Later regions move down one slot.
    pub fn remove_merged_region(&mut self, index: usize) -> Option<CellRange> {
        if index < self.merged_regions.len() {
            Some(self.merged_regions.remove(index))
        } else {
            None
        }
    }

    /// Move rows `start..=end` down by `n`, overwriting whatever lies at the
    /// destination. Merged regions that sit wholly inside the band move with it.
    pub fn shift_rows(&mut self, start: u32, end: u32, n: u32) {
        if n == 0 || start > end {
            return;
        }

        let keys: Vec<u32> = self.rows.range(start..=end).map(|(k, _)| *k).collect();
        let moved: Vec<(u32, Row)> = keys
            .into_iter()
            .filter_map(|k| self.rows.remove(&k).map(|row| (k, row)))
            .collect();
        for (k, row) in moved {
            self.rows.insert(k + n, row);
        }

        for region in &mut self.merged_regions {
            if region.start.row >= start && region.end.row <= end {
                *region = region.moved_to_row(region.start.row + n);
            }
        }
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    /// The drawing layer, created on first use
    pub fn drawing_mut(&mut self) -> &mut Drawing {
        self.drawing.get_or_insert_with(Drawing::default)
    }
}
