use stampsheet_core::SheetError;
use thiserror::Error;

/// Errors raised while generating a sheet from a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A placeholder names a key the data map does not contain
    #[error("Placeholder #{key}# has no entry in the supplied data")]
    MissingKey { key: String },

    /// A data value cannot be written into a cell
    #[error("Value for #{key}# is {kind}; expected a string, number or boolean")]
    UnsupportedValue { key: String, kind: &'static str },

    /// The template could not be opened or parsed
    #[error("Template could not be read: {0}")]
    SourceFormat(#[source] SheetError),

    #[error("Template has no sheet at index {0}")]
    MissingTemplateSheet(usize),

    /// Writing would place a row past the last row a sheet can hold
    #[error("Row {row} is beyond the last sheet row")]
    RowLimit { row: u64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
