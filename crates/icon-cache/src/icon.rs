//! Decoded icon handles.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::format::IconFormat;

/// A decoded, render-ready icon.
///
/// Cloning an `Icon` is cheap: clones share the same decoded pixel buffer.
/// Use [`Icon::ptr_eq`] to check whether two handles come from the same
/// decode.
#[derive(Clone)]
pub struct Icon {
    inner: Arc<IconData>,
}

struct IconData {
    source: PathBuf,
    format: IconFormat,
    pixels: RgbaImage,
}

impl Icon {
    /// Decode the image at `path`, which has already been sniffed as `format`.
    pub(crate) fn decode(path: &Path, format: IconFormat) -> image::ImageResult<Self> {
        let bytes = std::fs::read(path).map_err(image::ImageError::IoError)?;
        let decoded = image::load_from_memory_with_format(&bytes, format.to_image_format())?;
        Ok(Self {
            inner: Arc::new(IconData {
                source: path.to_path_buf(),
                format,
                pixels: decoded.into_rgba8(),
            }),
        })
    }

    /// The file this icon was decoded from.
    pub fn source(&self) -> &Path {
        &self.inner.source
    }

    /// The detected format of the source file.
    pub fn format(&self) -> IconFormat {
        self.inner.format
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.pixels.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.pixels.height()
    }

    /// Dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.pixels.dimensions()
    }

    /// The decoded RGBA8 pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.inner.pixels
    }

    /// Returns true if both handles share the same decoded image.
    pub fn ptr_eq(&self, other: &Icon) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("source", &self.inner.source)
            .field("format", &self.inner.format)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
