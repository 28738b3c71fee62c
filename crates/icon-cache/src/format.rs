//! Content-based image format detection.
//!
//! Files are classified by their leading bytes, never by their extension. The
//! signature table is the one the `image` crate uses for its own format
//! guessing, narrowed down to the formats that make sense for icons.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

/// Smallest header that can identify every supported format (RIFF/WebP needs 12).
pub(crate) const MIN_SNIFF_LEN: usize = 12;

/// Largest header ever read for detection.
pub(crate) const MAX_SNIFF_LEN: usize = 4096;

/// Image formats the cache can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    /// PNG format
    Png,
    /// JPEG format
    Jpeg,
    /// GIF format (first frame only)
    Gif,
    /// BMP format
    Bmp,
    /// WebP format
    Webp,
    /// Windows ICO format
    Ico,
    /// TIFF format
    Tiff,
}

impl IconFormat {
    /// The formats recognized by default.
    pub const DEFAULT: [IconFormat; 7] = [
        IconFormat::Png,
        IconFormat::Jpeg,
        IconFormat::Gif,
        IconFormat::Bmp,
        IconFormat::Webp,
        IconFormat::Ico,
        IconFormat::Tiff,
    ];

    /// Map an `image` crate format onto an icon format, if it is one.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(IconFormat::Png),
            image::ImageFormat::Jpeg => Some(IconFormat::Jpeg),
            image::ImageFormat::Gif => Some(IconFormat::Gif),
            image::ImageFormat::Bmp => Some(IconFormat::Bmp),
            image::ImageFormat::WebP => Some(IconFormat::Webp),
            image::ImageFormat::Ico => Some(IconFormat::Ico),
            image::ImageFormat::Tiff => Some(IconFormat::Tiff),
            _ => None,
        }
    }

    /// The equivalent `image` crate format.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            IconFormat::Png => image::ImageFormat::Png,
            IconFormat::Jpeg => image::ImageFormat::Jpeg,
            IconFormat::Gif => image::ImageFormat::Gif,
            IconFormat::Bmp => image::ImageFormat::Bmp,
            IconFormat::Webp => image::ImageFormat::WebP,
            IconFormat::Ico => image::ImageFormat::Ico,
            IconFormat::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// Detect the format from a file header.
    ///
    /// Returns `None` for unknown signatures and for image formats that are
    /// not icon formats.
    pub fn from_magic_bytes(header: &[u8]) -> Option<Self> {
        image::guess_format(header)
            .ok()
            .and_then(Self::from_image_format)
    }

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            IconFormat::Png => "image/png",
            IconFormat::Jpeg => "image/jpeg",
            IconFormat::Gif => "image/gif",
            IconFormat::Bmp => "image/bmp",
            IconFormat::Webp => "image/webp",
            IconFormat::Ico => "image/x-icon",
            IconFormat::Tiff => "image/tiff",
        }
    }
}

/// Read at most `len` leading bytes of the file at `path` and detect its format.
///
/// `Ok(None)` means the file was readable but carries no recognized signature.
pub(crate) fn sniff_file(path: &Path, len: usize) -> io::Result<Option<IconFormat>> {
    let file = File::open(path)?;
    let mut header = Vec::new();
    file.take(len.min(MAX_SNIFF_LEN) as u64)
        .read_to_end(&mut header)?;
    Ok(IconFormat::from_magic_bytes(&header))
}
