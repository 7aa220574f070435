use std::path::Path;

use crate::error::{Error, Result};

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Binary size as shown next to an uploaded file, e.g. "2.00 MB".
pub fn human_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

/// MIME type inferred from a file name, for the raster formats the
/// generation service accepts.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// A user-selected input image, held in memory until submission.
/// Replaced wholesale on the next selection, discarded on form reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub size_label: String,
}

impl UploadedImage {
    /// Build from an already-read file with a declared MIME type.
    /// Anything that is not `image/*` is rejected.
    pub fn from_parts(file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<Self> {
        if !is_image_mime(mime) {
            return Err(Error::NotAnImage(file_name.to_string()));
        }
        let size_label = human_size(bytes.len() as u64);
        Ok(Self {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
            size_label,
        })
    }

    /// Read a file from disk, inferring the MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let mime = mime_for_name(&file_name).ok_or_else(|| Error::NotAnImage(file_name.clone()))?;

        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_parts(&file_name, mime, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_two_megabytes() {
        assert_eq!(human_size(2 * 1_048_576), "2.00 MB");
    }

    #[test]
    fn test_human_size_rounds_down_small_files() {
        assert_eq!(human_size(1536), "0.00 MB");
    }

    #[test]
    fn test_mime_inference() {
        assert_eq!(mime_for_name("selfie.JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_name("guide.png"), Some("image/png"));
        assert_eq!(mime_for_name("notes.txt"), None);
        assert_eq!(mime_for_name("archive"), None);
    }

    #[test]
    fn test_rejects_non_image_mime() {
        let err = UploadedImage::from_parts("doc.pdf", "application/pdf", vec![1, 2, 3]);
        assert!(matches!(err, Err(Error::NotAnImage(_))));
    }

    #[test]
    fn test_accepts_image_mime() {
        let img = UploadedImage::from_parts("face.png", "image/png", vec![0; 1536]).unwrap();
        assert_eq!(img.size_label, "0.00 MB");
        assert_eq!(img.mime, "image/png");
    }
}
