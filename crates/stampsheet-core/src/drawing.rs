use serde::{Deserialize, Serialize};

/// Image formats a workbook can embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PictureFormat {
    Emf,
    Wmf,
    Pict,
    Jpeg,
    Png,
    Dib,
}

impl PictureFormat {
    /// Pick a format from a file extension, ignoring case. `jpg` maps to JPEG.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_uppercase().as_str() {
            "EMF" => Some(PictureFormat::Emf),
            "WMF" => Some(PictureFormat::Wmf),
            "PICT" => Some(PictureFormat::Pict),
            "JPEG" | "JPG" => Some(PictureFormat::Jpeg),
            "PNG" => Some(PictureFormat::Png),
            "DIB" => Some(PictureFormat::Dib),
            _ => None,
        }
    }
}

/// Raw picture bytes stored once per workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureData {
    pub format: PictureFormat,
    pub bytes: Vec<u8>,
}

/// Two-cell anchor: offsets inside the top-left and bottom-right cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAnchor {
    pub dx1: i32,
    pub dy1: i32,
    pub dx2: i32,
    pub dy2: i32,
    pub col1: u32,
    pub row1: u32,
    pub col2: u32,
    pub row2: u32,
}

impl ClientAnchor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
        col1: u32,
        row1: u32,
        col2: u32,
        row2: u32,
    ) -> Self {
        Self {
            dx1,
            dy1,
            dx2,
            dy2,
            col1,
            row1,
            col2,
            row2,
        }
    }
}

/// A picture placed on a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub anchor: ClientAnchor,
    /// Index into the workbook's picture list
    pub picture_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Per-sheet drawing layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub pictures: Vec<Picture>,
}

impl Drawing {
    pub fn add_picture(&mut self, anchor: ClientAnchor, picture_index: usize, scale: Option<f64>) {
        self.pictures.push(Picture {
            anchor,
            picture_index,
            scale,
        });
    }
}
