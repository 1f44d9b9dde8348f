use serde::Deserialize;
use std::env;

use crate::error::{Result, TemplateError};

/// Settings for one generation session
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Index of the template sheet inside the template workbook
    pub template_sheet: usize,
    /// Name of the sheet created in the target workbook (auto-named when unset)
    pub target_sheet_name: Option<String>,
}

impl SessionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let template_sheet = match env::var("STAMPSHEET_TEMPLATE_SHEET") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                TemplateError::Config(format!("STAMPSHEET_TEMPLATE_SHEET is not an index: {raw}"))
            })?,
            Err(_) => 0,
        };
        let target_sheet_name = env::var("STAMPSHEET_TARGET_SHEET")
            .ok()
            .filter(|name| !name.trim().is_empty());

        Ok(Self {
            template_sheet,
            target_sheet_name,
        })
    }

    /// Builder pattern: set the target sheet name
    pub fn with_target_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.target_sheet_name = Some(name.into());
        self
    }

    /// Builder pattern: set the template sheet index
    pub fn with_template_sheet(mut self, index: usize) -> Self {
        self.template_sheet = index;
        self
    }
}
