//! The directory-backed icon cache.
//!
//! An [`IconCache`] is bound to one directory. Asking it for a name looks for a
//! direct child of that directory whose file stem equals the name:
//!
//! - a sub-directory resolves to a nested [`IconCache`] bound to it,
//! - a file whose leading bytes carry a recognized image signature resolves to
//!   a decoded [`Icon`],
//! - anything else is [`Error::NotFound`].
//!
//! Successful resolutions are memoized per node and never invalidated.
//! Failures are not memoized, so a file created after a failed lookup is found
//! by the next one.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::config::IconCacheConfig;
use crate::error::{EntryKind, Error, Result};
use crate::format::sniff_file;
use crate::icon::Icon;
use crate::stats::{CacheStats, StatCounters};

/// A value a name resolves to.
#[derive(Debug, Clone)]
pub enum IconEntry {
    /// A nested cache bound to a sub-directory.
    Folder(IconCache),
    /// A decoded image file.
    Icon(Icon),
}

impl IconEntry {
    /// Which variant this is.
    pub fn kind(&self) -> EntryKind {
        match self {
            IconEntry::Folder(_) => EntryKind::Folder,
            IconEntry::Icon(_) => EntryKind::Icon,
        }
    }

    /// The icon, if this entry is one.
    pub fn as_icon(&self) -> Option<&Icon> {
        match self {
            IconEntry::Icon(icon) => Some(icon),
            IconEntry::Folder(_) => None,
        }
    }

    /// The nested cache, if this entry is a folder.
    pub fn as_folder(&self) -> Option<&IconCache> {
        match self {
            IconEntry::Folder(folder) => Some(folder),
            IconEntry::Icon(_) => None,
        }
    }

    /// Returns true if both entries are the same memoized value.
    pub fn ptr_eq(&self, other: &IconEntry) -> bool {
        match (self, other) {
            (IconEntry::Folder(a), IconEntry::Folder(b)) => a.ptr_eq(b),
            (IconEntry::Icon(a), IconEntry::Icon(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// A lazily populated icon cache mirroring one directory.
///
/// `IconCache` is a cheap handle: clones refer to the same node and share its
/// memo table. Nested caches returned for sub-directories are owned by the
/// parent's memo table and inherit the parent's configuration.
///
/// # Example
///
/// ```no_run
/// use icon_cache::IconCache;
///
/// # fn example() -> icon_cache::Result<()> {
/// // icons/fancy.png and icons/folder/fancy.png
/// let icons = IconCache::new("icons")?;
///
/// let fancy = icons.icon("fancy")?;
/// let nested = icons.folder("folder")?.icon("fancy")?;
/// assert!(!fancy.ptr_eq(&nested));
///
/// // Same thing, by dotted path
/// let same = icons.lookup("folder.fancy")?;
/// assert!(same.as_icon().is_some_and(|icon| icon.ptr_eq(&nested)));
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// The memo table is guarded by a mutex that is never held across filesystem
/// access. Two threads missing on the same name may both scan; the first to
/// finish inserts its result and both receive that value.
#[derive(Clone)]
pub struct IconCache {
    inner: Arc<CacheNode>,
}

struct CacheNode {
    path: RwLock<PathBuf>,
    memo: Mutex<HashMap<String, IconEntry>>,
    config: Arc<IconCacheConfig>,
    counters: StatCounters,
}

impl IconCache {
    /// Create a cache bound to `path` with the default configuration.
    ///
    /// Fails with [`Error::InvalidPath`] if `path` is not an existing directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, IconCacheConfig::default())
    }

    /// Create a cache bound to `path` with a custom configuration.
    pub fn with_config(path: impl AsRef<Path>, config: IconCacheConfig) -> Result<Self> {
        let path = validate_directory(path.as_ref())?;
        Ok(Self::bound(path, Arc::new(config)))
    }

    fn bound(path: PathBuf, config: Arc<IconCacheConfig>) -> Self {
        debug!(
            target: "icon_cache::cache",
            path = %path.display(),
            "icon cache bound"
        );
        Self {
            inner: Arc::new(CacheNode {
                path: RwLock::new(path),
                memo: Mutex::new(HashMap::new()),
                config,
                counters: StatCounters::default(),
            }),
        }
    }

    /// The directory this cache is currently bound to.
    pub fn path(&self) -> PathBuf {
        self.inner.path.read().clone()
    }

    /// Rebind this cache to another directory.
    ///
    /// The path is validated the same way as at construction; on failure the
    /// current binding is kept. Entries memoized under the previous binding
    /// are kept as well and keep being returned for their names.
    pub fn set_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = validate_directory(path.as_ref())?;
        debug!(
            target: "icon_cache::cache",
            path = %path.display(),
            "icon cache rebound"
        );
        *self.inner.path.write() = path;
        Ok(())
    }

    /// The configuration shared by this node and its nested caches.
    pub fn config(&self) -> &IconCacheConfig {
        &self.inner.config
    }

    /// Lookup counters for this node only.
    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    /// Returns true if both handles refer to the same cache node.
    pub fn ptr_eq(&self, other: &IconCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Resolve `name` against this cache's directory.
    ///
    /// The name is matched exactly, case included, against the stems of the
    /// directory's direct children.
    pub fn get(&self, name: &str) -> Result<IconEntry> {
        if let Some(entry) = self.inner.memo.lock().get(name) {
            self.inner.counters.record_hit();
            trace!(target: "icon_cache::cache", name, "memo hit");
            return Ok(entry.clone());
        }
        self.inner.counters.record_miss();

        let dir = self.path();
        let resolved = self
            .scan(&dir, name)
            .ok_or_else(|| Error::not_found(&dir, name))?;

        let mut memo = self.inner.memo.lock();
        Ok(memo.entry(name.to_owned()).or_insert(resolved).clone())
    }

    /// Resolve `name`, requiring it to be an icon.
    pub fn icon(&self, name: &str) -> Result<Icon> {
        match self.get(name)? {
            IconEntry::Icon(icon) => Ok(icon),
            IconEntry::Folder(_) => Err(Error::wrong_kind(
                name,
                EntryKind::Icon,
                EntryKind::Folder,
            )),
        }
    }

    /// Resolve `name`, requiring it to be a sub-directory.
    pub fn folder(&self, name: &str) -> Result<IconCache> {
        match self.get(name)? {
            IconEntry::Folder(folder) => Ok(folder),
            IconEntry::Icon(_) => Err(Error::wrong_kind(
                name,
                EntryKind::Folder,
                EntryKind::Icon,
            )),
        }
    }

    /// Resolve a dotted path such as `"folder.fancy"` one segment at a time.
    ///
    /// Every segment but the last must resolve to a folder. Each segment is
    /// memoized on the node it was resolved against, exactly as with [`get`].
    ///
    /// [`get`]: IconCache::get
    pub fn lookup(&self, dotted: &str) -> Result<IconEntry> {
        let segments: Vec<&str> = dotted.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::not_found(self.path(), dotted));
        };

        let mut node = self.clone();
        for segment in parents {
            node = node.folder(segment)?;
        }
        node.get(last)
    }

    /// Find the first direct child of `dir` whose stem is `name` and that is
    /// either a directory or a recognized image.
    fn scan(&self, dir: &Path, name: &str) -> Option<IconEntry> {
        self.inner.counters.record_scan();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(
                    target: "icon_cache::cache",
                    path = %dir.display(),
                    error = %err,
                    "cannot read cache directory"
                );
                return None;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(target: "icon_cache::cache", error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.file_stem() != Some(OsStr::new(name)) {
                continue;
            }

            if self.is_folder(&entry, &path) {
                debug!(
                    target: "icon_cache::cache",
                    name,
                    path = %path.display(),
                    "resolved folder"
                );
                let config = Arc::clone(&self.inner.config);
                return Some(IconEntry::Folder(Self::bound(path, config)));
            }

            if let Some(icon) = self.load_icon(&path) {
                debug!(target: "icon_cache::cache", name, path = %path.display(), "resolved icon");
                return Some(IconEntry::Icon(icon));
            }
        }

        debug!(target: "icon_cache::cache", name, path = %dir.display(), "no match");
        None
    }

    fn is_folder(&self, entry: &DirEntry, path: &Path) -> bool {
        if self.inner.config.follow_symlinks {
            path.is_dir()
        } else {
            entry.file_type().is_ok_and(|t| t.is_dir())
        }
    }

    /// Sniff and decode a stem-matched file. `None` means "not an icon".
    fn load_icon(&self, path: &Path) -> Option<Icon> {
        let config = &self.inner.config;
        let format = match sniff_file(path, config.effective_sniff_len()) {
            Ok(Some(format)) if config.recognizes(format) => format,
            Ok(_) => {
                debug!(
                    target: "icon_cache::cache",
                    path = %path.display(),
                    "unrecognized image signature"
                );
                return None;
            }
            Err(err) => {
                debug!(
                    target: "icon_cache::cache",
                    path = %path.display(),
                    error = %err,
                    "cannot read candidate file"
                );
                return None;
            }
        };

        match Icon::decode(path, format) {
            Ok(icon) => Some(icon),
            Err(err) => {
                warn!(
                    target: "icon_cache::cache",
                    path = %path.display(),
                    format = ?format,
                    error = %err,
                    "failed to decode icon"
                );
                None
            }
        }
    }
}

fn validate_directory(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(Error::invalid_path(path))
    }
}

impl fmt::Display for IconCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IconCache({})", self.inner.path.read().display())
    }
}

impl fmt::Debug for IconCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconCache")
            .field("path", &*self.inner.path.read())
            .field("entries", &self.inner.memo.lock().len())
            .finish()
    }
}
