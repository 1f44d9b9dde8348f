use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Convert to hex color string
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parse from hex color string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Line style of one border side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

/// One side of a cell border
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderSide {
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl BorderSide {
    pub const fn new(style: BorderStyle, color: Option<Color>) -> Self {
        BorderSide { style, color }
    }

    pub fn thin() -> Self {
        BorderSide::new(BorderStyle::Thin, None)
    }
}

/// The four border sides of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Borders {
    #[serde(default)]
    pub left: BorderSide,
    #[serde(default)]
    pub right: BorderSide,
    #[serde(default)]
    pub top: BorderSide,
    #[serde(default)]
    pub bottom: BorderSide,
}

impl Borders {
    /// Same side on all four edges
    pub fn all(side: BorderSide) -> Self {
        Borders {
            left: side,
            right: side,
            top: side,
            bottom: side,
        }
    }
}

/// Fill pattern of a cell background
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    Gray125,
    Gray0625,
    DarkGray,
    MediumGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    LightHorizontal,
    LightVertical,
}

/// Cell background fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fill {
    #[serde(default)]
    pub pattern: FillPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Fill {
            pattern: FillPattern::Solid,
            foreground: Some(color),
        }
    }
}

/// A formatting descriptor owned by one workbook's style pool.
///
/// Equality is content equality, so two styles with identical attributes are
/// interchangeable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default)]
    pub borders: Borders,
    #[serde(default)]
    pub horizontal_align: HorizontalAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrap_text: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Builder pattern: set fill
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Builder pattern: set borders
    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Builder pattern: set number format
    pub fn with_number_format(mut self, format: impl Into<String>) -> Self {
        self.number_format = Some(format.into());
        self
    }

    // Builder pattern: set horizontal alignment
}

/// Handle of a style inside one [`StylePool`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(pub u32);

impl StyleId {
    /// Slot 0 of every pool
    pub const DEFAULT: StyleId = StyleId(0);
}

static DEFAULT_STYLE: LazyLock<CellStyle> = LazyLock::new(CellStyle::default);

/// The set of styles owned by one workbook. Slot 0 always holds the default style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StyleSlots")]
pub struct StylePool {
    styles: Vec<CellStyle>,
}

/// Serialized form of a pool, checked before it becomes a [`StylePool`]
#[derive(Deserialize)]
struct StyleSlots {
    styles: Vec<CellStyle>,
}

impl TryFrom<StyleSlots> for StylePool {
    type Error = String;

    fn try_from(slots: StyleSlots) -> Result<Self, Self::Error> {
        if slots.styles.is_empty() {
            return Err("style pool has no default slot".to_string());
        }
        Ok(Self {
            styles: slots.styles,
        })
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

impl StylePool {
    pub fn new() -> Self {
        Self {
            styles: vec![CellStyle::default()],
        }
    }

    /// Append a style and return its handle
    pub fn push(&mut self, style: CellStyle) -> StyleId {
        let id = StyleId(self.styles.len() as u32);
        self.styles.push(style);
        id
    }

    /// Look up a style by handle
    pub fn get(&self, id: StyleId) -> Option<&CellStyle> {
        self.styles.get(id.0 as usize)
    }

    /// Look up a style, falling back to the default style for dangling handles
    pub fn get_or_default(&self, id: StyleId) -> &CellStyle {
        self.get(id).unwrap_or(&*DEFAULT_STYLE)
    }

    /// Number of styles, the default slot included
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &CellStyle)> + '_ {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, s)| (StyleId(i as u32), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::rgb(255, 128, 64);
        assert_eq!(color.to_hex(), "#ff8040");

        let parsed = Color::from_hex("#ff8040").unwrap();
        assert_eq!(parsed, color);
        assert_eq!(Color::from_hex("#ff80"), None);
    }

    #[test]
    fn test_pool_has_default_slot() {
        let mut pool = StylePool::new();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(StyleId::DEFAULT), Some(&CellStyle::default()));

        let bold = pool.push(CellStyle::new().with_bold(true));
        assert_eq!(bold, StyleId(1));
        assert!(pool.get(bold).unwrap().bold);

        assert_eq!(pool.get_or_default(StyleId(42)), &CellStyle::default());
    }

    #[test]
    fn test_pool_without_default_slot_rejected() {
        let err = serde_json::from_str::<StylePool>(r#"{"styles":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no default slot"));

        let pool: StylePool = serde_json::from_str(r#"{"styles":[{"bold":true}]}"#).unwrap();
        assert!(pool.get(StyleId::DEFAULT).unwrap().bold);
    }

    #[test]
    fn test_style_content_equality() {
        let a = CellStyle::new().with_borders(Borders::all(BorderSide::thin()));
        let b = CellStyle::new().with_borders(Borders::all(BorderSide::thin()));
        assert_eq!(a, b);
        assert_ne!(a, b.with_fill(Fill::solid(Color::RED)));
    }
}
