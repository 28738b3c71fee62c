//! Icon cache configuration.
//!
//! A configuration is fixed when a cache is created and handed down to every
//! nested folder cache it produces. It can be built in code or loaded from TOML:
//!
//! ```toml
//! formats = ["png", "gif"]
//! sniff_len = 64
//! follow_symlinks = false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::format::{IconFormat, MAX_SNIFF_LEN, MIN_SNIFF_LEN};

/// Configuration for an [`IconCache`](crate::IconCache).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconCacheConfig {
    /// Image formats that are recognized by signature.
    /// Files sniffed as any other format resolve as not found.
    /// Default: PNG, JPEG, GIF, BMP, WebP, ICO, TIFF.
    pub formats: Vec<IconFormat>,
    /// Number of leading bytes read from a file to detect its format.
    /// Values are clamped to the range 12..=4096.
    /// Default: 32.
    pub sniff_len: usize,
    /// Whether a symlink to a directory counts as a folder.
    /// Default: true.
    pub follow_symlinks: bool,
}

impl Default for IconCacheConfig {
    fn default() -> Self {
        Self {
            formats: IconFormat::DEFAULT.to_vec(),
            sniff_len: 32,
            follow_symlinks: true,
        }
    }
}

impl IconCacheConfig {
    /// Restrict recognition to the given formats.
    #[must_use]
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = IconFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    /// Set how many header bytes are read for signature detection.
    #[must_use]
    pub fn with_sniff_len(mut self, len: usize) -> Self {
        self.sniff_len = len;
        self
    }

    /// Enable or disable following symlinked directories.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Parse a configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Whether `format` is recognized under this configuration.
    pub fn recognizes(&self, format: IconFormat) -> bool {
        self.formats.contains(&format)
    }

    /// The effective sniff length: `sniff_len` clamped to 12..=4096 bytes.
    pub(crate) fn effective_sniff_len(&self) -> usize {
        self.sniff_len.clamp(MIN_SNIFF_LEN, MAX_SNIFF_LEN)
    }
}
