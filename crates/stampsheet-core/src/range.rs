use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell coordinate (0-indexed internally)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        CellCoord { row, col }
    }

    /// Create from A1 notation (e.g., "A1" -> (0, 0), "B2" -> (1, 1))
    pub fn from_a1(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        let split = notation.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = notation.split_at(split);

        if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let col = col_from_label(letters)?;
        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None; // Rows are 1-indexed in A1 notation
        }

        Some(CellCoord::new(row - 1, col))
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: u32) -> String {
    let mut label = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert column label (A, B, ..., Z, AA, AB, ...) to index (0-indexed)
pub fn col_from_label(label: &str) -> Option<u32> {
    let mut col: u32 = 0;

    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }

    col.checked_sub(1)
}

/// A rectangle of cells (e.g., A1:B10). Merged regions are stored as ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellCoord::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellCoord::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Build from inclusive row and column bounds
    pub fn from_bounds(first_row: u32, last_row: u32, first_col: u32, last_col: u32) -> Self {
        CellRange::new(
            CellCoord::new(first_row, first_col),
            CellCoord::new(last_row, last_col),
        )
    }

    /// Create from A1:B1 notation
    pub fn from_a1(notation: &str) -> Option<Self> {
        match notation.split_once(':') {
            None => {
                let coord = CellCoord::from_a1(notation)?;
                Some(CellRange::new(coord, coord))
            }
            Some((start, end)) => Some(CellRange::new(
                CellCoord::from_a1(start)?,
                CellCoord::from_a1(end)?,
            )),
        }
    }

    /// Convert to A1:B1 notation
    pub fn to_a1(&self) -> String {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }

    /// Check if a coordinate is within this range
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.contains_row(coord.row) && coord.col >= self.start.col && coord.col <= self.end.col
    }

    /// Check if a row crosses this range, whatever the column
    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.start.row && row <= self.end.row
    }

    /// Get the number of rows in the range
    pub fn row_span(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_span(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Whether both ranges have the same row and column spans
    pub fn same_shape(&self, other: &CellRange) -> bool {
        self.row_span() == other.row_span() && self.col_span() == other.col_span()
    }

    /// Check if this range intersects with another range
    pub fn intersects(&self, other: &CellRange) -> bool {
        !(self.end.row < other.start.row
            || self.start.row > other.end.row
            || self.end.col < other.start.col
            || self.start.col > other.end.col)
    }

    /// The same rectangle moved so that its first row is `first_row`
    pub fn moved_to_row(&self, first_row: u32) -> CellRange {
        CellRange::from_bounds(
            first_row,
            first_row + self.row_span() - 1,
            self.start.col,
            self.end.col,
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}
