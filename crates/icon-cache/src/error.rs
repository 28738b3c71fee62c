//! Error types for the icon cache.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for icon cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while binding or resolving an icon cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path given to a cache does not exist or is not a directory.
    #[error("'{}' is not a valid directory", .path.display())]
    InvalidPath { path: PathBuf },

    /// No sub-directory or recognized image matches the requested name.
    #[error("IconCache({}) has no entry named '{name}'", .cache.display())]
    NotFound { cache: PathBuf, name: String },

    /// The name resolved, but not to the kind of entry the caller asked for.
    #[error("'{name}' resolved to {found}, expected {expected}")]
    WrongKind {
        name: String,
        expected: EntryKind,
        found: EntryKind,
    },

    /// A configuration file could not be read or parsed.
    #[error("invalid icon cache configuration: {message}")]
    Config { message: String },
}

/// Broad classification of an [`Error`], for callers that match on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad directory binding.
    InvalidPath,
    /// Name did not resolve.
    NotFound,
    /// Name resolved to the other entry variant.
    WrongKind,
    /// Bad configuration.
    Config,
}

/// The two kinds of value a name can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A nested cache bound to a sub-directory.
    Folder,
    /// A decoded icon.
    Icon,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Folder => write!(f, "a folder"),
            EntryKind::Icon => write!(f, "an icon"),
        }
    }
}

impl Error {
    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create a not found error for `name` on the cache bound to `cache`.
    pub fn not_found(cache: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::NotFound {
            cache: cache.into(),
            name: name.into(),
        }
    }

    /// Create a wrong kind error.
    pub fn wrong_kind(name: impl Into<String>, expected: EntryKind, found: EntryKind) -> Self {
        Self::WrongKind {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPath { .. } => ErrorKind::InvalidPath,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::WrongKind { .. } => ErrorKind::WrongKind,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Returns true if this error means the requested name did not resolve.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true if this error came from binding an invalid directory.
    pub fn is_invalid_path(&self) -> bool {
        self.kind() == ErrorKind::InvalidPath
    }
}
