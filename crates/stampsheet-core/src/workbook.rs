use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::drawing::PictureData;
use crate::error::SheetError;
use crate::sheet::Sheet;
use crate::style::StylePool;

/// A workbook: sheets plus the style pool and pictures they share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Workbook name (usually the file name)
    pub name: String,
    /// List of sheets in the workbook
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    /// Styles referenced by every cell of every sheet
    #[serde(default)]
    pub styles: StylePool,
    /// Embedded picture bytes, referenced by index from sheet drawings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pictures: Vec<PictureData>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Workbook {
    /// Create a new workbook with a default sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            sheets: vec![Sheet::new("Sheet1")],
            ..Self::blank(name)
        }
    }

    /// Create a workbook without any sheet
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
            styles: StylePool::new(),
            pictures: Vec::new(),
        }
    }

    /// Get a sheet by index
    pub fn get_sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a mutable sheet by index
    pub fn get_sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    /// Add a new sheet with the given name
    pub fn add_sheet(&mut self, name: impl Into<String>) -> Result<usize, SheetError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(SheetError::InvalidSheetName("Name cannot be empty".to_string()));
        }

        if self.sheets.iter().any(|s| s.name == name) {
            return Err(SheetError::SheetNameExists(name));
        }

        let index = self.sheets.len();
        self.sheets.push(Sheet::new(name));
        Ok(index)
    }

    /// Add a new sheet with an auto-generated name (Sheet1, Sheet2, etc.)
    pub fn add_sheet_auto(&mut self) -> usize {
        let mut num = self.sheets.len() + 1;
        let name = loop {
            let name = format!("Sheet{}", num);
            if !self.sheets.iter().any(|s| s.name == name) {
                break name;
            }
            num += 1;
        };

        self.sheets.push(Sheet::new(name));
        self.sheets.len() - 1
    }

    /// Store picture bytes and return their index
    pub fn add_picture(&mut self, picture: PictureData) -> usize {
        self.pictures.push(picture);
        self.pictures.len() - 1
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Serialize the workbook to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a workbook from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a workbook from a JSON file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Write the workbook as JSON into `writer`
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), SheetError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Write the workbook to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SheetError> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::range::CellCoord;
    use crate::style::CellStyle;

    #[test]
    fn test_workbook_creation() {
        let wb = Workbook::new("Test");
        assert_eq!(wb.name, "Test");
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.sheets[0].name, "Sheet1");
        assert_eq!(Workbook::blank("Empty").sheet_count(), 0);
    }

    #[test]
    fn test_add_sheets() {
        let mut wb = Workbook::blank("Test");
        assert_eq!(wb.add_sheet_auto(), 0);
        assert_eq!(wb.sheets[0].name, "Sheet1");

        assert_eq!(wb.add_sheet("Report").unwrap(), 1);
        assert!(matches!(wb.add_sheet("Report"), Err(SheetError::SheetNameExists(_))));
        assert!(matches!(wb.add_sheet("  "), Err(SheetError::InvalidSheetName(_))));

        let idx = wb.add_sheet_auto();
        assert_eq!(wb.sheets[idx].name, "Sheet3");
    }

    #[test]
    fn test_serialization() {
        let mut wb = Workbook::new("Test");
        let bold = wb.styles.push(CellStyle::new().with_bold(true));
        wb.sheets[0].set_cell(CellCoord::new(3, 2), Cell::text("x").with_style(bold));
        wb.sheets[0].get_or_create_row(3).set_height_points(22.0);
        wb.sheets[0].set_col_width(2, 30.0);

        let json = wb.to_json().unwrap();
        let wb2 = Workbook::from_json(&json).unwrap();

        assert_eq!(wb2, wb);
    }

    #[test]
    fn test_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");

        let mut wb = Workbook::new("Saved");
        wb.sheets[0].set_cell(CellCoord::new(0, 0), Cell::number(1.5));
        wb.save(&path).unwrap();

        let loaded = Workbook::open(&path).unwrap();
        assert_eq!(loaded, wb);

        assert!(matches!(
            Workbook::open(dir.path().join("missing.json")),
            Err(SheetError::Io(_))
        ));
    }

    #[test]
    fn test_open_rejects_pool_without_default_style() {
        let mut json: serde_json::Value = serde_json::to_value(Workbook::new("Bare")).unwrap();
        json["styles"]["styles"] = serde_json::json!([]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, json.to_string()).unwrap();

        assert!(matches!(Workbook::open(&path), Err(SheetError::Serialization(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_failed_write() {
        let mut wb = Workbook::new("Small");
        wb.sheets[0].set_cell(CellCoord::new(0, 0), Cell::text("x"));

        assert!(matches!(wb.save("/dev/full"), Err(SheetError::Io(_))));
    }
}
