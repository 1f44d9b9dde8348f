use stampsheet_core::{PictureData, PictureFormat};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Read a picture file, picking its format from the file extension.
///
/// `Ok(None)` when `path` is not a regular file or has no recognised
/// extension; read failures on an existing file are errors.
pub fn load_picture(path: &Path) -> Result<Option<PictureData>> {
    if !path.is_file() {
        debug!(path = %path.display(), "picture path is not a file");
        return Ok(None);
    }

    let Some(format) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(PictureFormat::from_extension)
    else {
        debug!(path = %path.display(), "unsupported picture extension");
        return Ok(None);
    };

    let bytes = fs::read(path)?;
    Ok(Some(PictureData { format, bytes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logo.JPG");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let picture = load_picture(&path).unwrap().unwrap();
        assert_eq!(picture.format, PictureFormat::Jpeg);
        assert_eq!(picture.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_unloadable_paths() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_picture(dir.path()).unwrap(), None);
        assert_eq!(load_picture(&dir.path().join("missing.png")).unwrap(), None);

        let no_ext = dir.path().join("logo");
        fs::write(&no_ext, b"x").unwrap();
        assert_eq!(load_picture(&no_ext).unwrap(), None);

        let unknown = dir.path().join("logo.gif");
        fs::write(&unknown, b"GIF89a").unwrap();
        assert_eq!(load_picture(&unknown).unwrap(), None);
    }
}
