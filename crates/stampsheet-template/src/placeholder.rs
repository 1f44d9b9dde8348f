//! `#name#` placeholder scanning and substitution.
//!
//! A token is any run of one or more characters other than `#` enclosed in a
//! pair of `#`. Tokens are case-sensitive and the lookup key is the text
//! strictly between the delimiters.

use regex::Regex;
use serde_json::{Map, Value};
use stampsheet_core::CellValue;
use std::sync::LazyLock;

use crate::error::{Result, TemplateError};

/// Caller-supplied data, keyed by placeholder name
pub type DataMap = Map<String, Value>;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("#[^#]+#").expect("placeholder pattern compiles"));

/// One placeholder occurrence inside a cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token including both delimiters
    pub text: &'a str,
    /// Byte offset of the opening `#`
    pub start: usize,
    /// Byte offset one past the closing `#`
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn key(&self) -> &'a str {
        &self.text[1..self.text.len() - 1]
    }
}

/// Scan `text` for tokens, left to right. Calling it again restarts the scan.
pub fn tokens(text: &str) -> impl Iterator<Item = Token<'_>> + '_ {
    TOKEN_PATTERN.find_iter(text).map(|m| Token {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}

/// Strip the delimiters of a token. `None` when `token` is not exactly one token.
pub fn key_of(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('#')?.strip_suffix('#')?;
    if inner.is_empty() || inner.contains('#') {
        None
    } else {
        Some(inner)
    }
}

/// Result of substituting the tokens of one text
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// No token found; the original text stands
    Unchanged,
    /// The text was exactly one token; the data value keeps its own type
    Value(CellValue),
    /// Tokens embedded in literal text, rendered into a single string
    Text(String),
}

/// Substitute every token of `text` with its entry in `data`
pub fn resolve(text: &str, data: &DataMap) -> Result<Resolved> {
    let found: Vec<Token<'_>> = tokens(text).collect();

    match found.as_slice() {
        [] => Ok(Resolved::Unchanged),
        [only] if only.text.len() == text.len() => {
            let key = only.key();
            Ok(Resolved::Value(to_cell_value(key, lookup(data, key)?)?))
        }
        _ => {
            let mut out = String::with_capacity(text.len());
            let mut last = 0;
            for token in &found {
                let key = token.key();
                out.push_str(&text[last..token.start]);
                out.push_str(&to_text(key, lookup(data, key)?)?);
                last = token.end;
            }
            out.push_str(&text[last..]);
            Ok(Resolved::Text(out))
        }
    }
}

/// Verify that every token of `text` can be resolved against `data`
pub fn check(text: &str, data: &DataMap) -> Result<()> {
    for token in tokens(text) {
        let key = token.key();
        to_cell_value(key, lookup(data, key)?)?;
    }
    Ok(())
}

/// The value to write for a template cell value, or `None` when there is
/// nothing to write. Only text values carry placeholders.
pub fn substitute(value: &CellValue, data: Option<&DataMap>) -> Result<Option<CellValue>> {
    match value {
        CellValue::Blank => Ok(None),
        CellValue::Text(text) if text.is_empty() => Ok(None),
        CellValue::Text(text) => match data {
            Some(data) => Ok(Some(match resolve(text, data)? {
                Resolved::Unchanged => value.clone(),
                Resolved::Value(v) => v,
                Resolved::Text(s) => CellValue::Text(s),
            })),
            None => Ok(Some(value.clone())),
        },
        CellValue::Boolean(_)
        | CellValue::Number(_)
        | CellValue::Formula(_)
        | CellValue::Error(_) => Ok(Some(value.clone())),
    }
}

fn lookup<'d>(data: &'d DataMap, key: &str) -> Result<&'d Value> {
    data.get(key).ok_or_else(|| TemplateError::MissingKey {
        key: key.to_string(),
    })
}

fn to_cell_value(key: &str, value: &Value) -> Result<CellValue> {
    match value {
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .ok_or_else(|| unsupported(key, value)),
        Value::Bool(b) => Ok(CellValue::Boolean(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(unsupported(key, value)),
    }
}

fn to_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(unsupported(key, value)),
    }
}

fn unsupported(key: &str, value: &Value) -> TemplateError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    TemplateError::UnsupportedValue {
        key: key.to_string(),
        kind,
    }
}
