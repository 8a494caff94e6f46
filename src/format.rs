//! Image format detection and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions accepted for the destination image, lowercase without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png"];

/// Raster formats Visio can export a page to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Graphics Interchange Format
    Gif,
    /// JPEG, written as `.jpg` or `.jpeg`
    Jpeg,
    /// Portable Network Graphics
    Png,
}

impl ImageFormat {
    /// Look up a format by file extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "gif" => Some(ImageFormat::Gif),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Canonical extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
        }
    }
}

/// Validate the extension of an output path.
///
/// Runs before anything touches the host, so a bad destination never costs
/// an application launch.
///
/// # Returns
/// * `Ok(ImageFormat)` if the extension names a supported format
/// * `Err(Error::UnsupportedFormat)` otherwise, including paths without an extension
///
/// # Example
/// ```
/// use visio2img::format::{validate, ImageFormat};
///
/// assert_eq!(validate("diagram.PNG").unwrap(), ImageFormat::Png);
/// assert!(validate("diagram.pdf").is_err());
/// ```
pub fn validate<P: AsRef<Path>>(path: P) -> Result<ImageFormat> {
    let path = path.as_ref();
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))
}

/// Check whether an output path has a supported image extension.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    validate(path).is_ok()
}
