use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Represents possible cell errors (Excel-compatible)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellError {
    /// #NULL! - Null intersection
    NullError,
    /// #DIV/0! - Division by zero
    DivisionByZero,
    /// #VALUE! - Invalid value type
    InvalidValue,
    /// #REF! - Invalid cell reference
    InvalidReference,
    /// #NAME? - Unrecognized function or name
    InvalidName,
    /// #NUM! - Invalid numeric value
    NumError,
    /// #N/A - Value not available
    NotAvailable,
}

impl CellError {
    /// Binary error code as stored in spreadsheet files
    pub fn code(self) -> u8 {
        match self {
            CellError::NullError => 0x00,
            CellError::DivisionByZero => 0x07,
            CellError::InvalidValue => 0x0F,
            CellError::InvalidReference => 0x17,
            CellError::InvalidName => 0x1D,
            CellError::NumError => 0x24,
            CellError::NotAvailable => 0x2A,
        }
    }

    /// Inverse of [`CellError::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(CellError::NullError),
            0x07 => Some(CellError::DivisionByZero),
            0x0F => Some(CellError::InvalidValue),
            0x17 => Some(CellError::InvalidReference),
            0x1D => Some(CellError::InvalidName),
            0x24 => Some(CellError::NumError),
            0x2A => Some(CellError::NotAvailable),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::NullError => write!(f, "#NULL!"),
            CellError::DivisionByZero => write!(f, "#DIV/0!"),
            CellError::InvalidValue => write!(f, "#VALUE!"),
            CellError::InvalidReference => write!(f, "#REF!"),
            CellError::InvalidName => write!(f, "#NAME?"),
            CellError::NumError => write!(f, "#NUM!"),
            CellError::NotAvailable => write!(f, "#N/A"),
        }
    }
}

/// Errors raised by workbook and sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Sheet name already exists: {0}")]
    SheetNameExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
