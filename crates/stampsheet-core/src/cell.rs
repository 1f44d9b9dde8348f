use serde::{Deserialize, Serialize};

use crate::error::CellError;
use crate::style::StyleId;

/// The typed value stored in a cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Blank,
    Boolean(bool),
    Number(f64),
    Text(String),
    /// Formula expression, stored without evaluation
    Formula(String),
    Error(CellError),
}

impl CellValue {
    /// Check if the value is blank
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Get the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the value the way a spreadsheet shows it in the cell
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Formula(expr) => expr.clone(),
            CellValue::Error(e) => e.to_string(),
        }
    }
}

/// A cell: a value plus a reference into the owning workbook's style pool
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub style: StyleId,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Cell {
            value,
            style: StyleId::DEFAULT,
        }
    }

    /// Create a cell with a number value
    pub fn number(value: f64) -> Self {
        Cell::new(CellValue::Number(value))
    }

    /// Create a cell with a text value
    pub fn text(value: impl Into<String>) -> Self {
        Cell::new(CellValue::Text(value.into()))
    }

    /// Create a cell with a boolean value
    pub fn boolean(value: bool) -> Self {
        Cell::new(CellValue::Boolean(value))
    }

    /// Builder pattern: set the style reference
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = style;
        self
    }
}
