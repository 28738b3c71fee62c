//! Lazy, directory-backed icon cache.
//!
//! This crate turns a folder of image files into a tree of icon caches that
//! mirrors the folder tree. Nothing is read up front: each name is looked up
//! on demand, decoded if it is an image, and memoized for reuse.
//!
//! - **Lazy**: a name is only resolved the first time it is requested
//! - **Content-based**: image files are recognized by their signature, not
//!   their extension
//! - **Nested**: sub-directories resolve to nested caches with the same rules
//! - **Configurable**: recognized formats and sniffing behavior can be set in
//!   code or loaded from TOML
//!
//! # Example
//!
//! ```no_run
//! use icon_cache::{IconCache, IconEntry};
//!
//! # fn example() -> icon_cache::Result<()> {
//! // icons/
//! //   fancy.png
//! //   folder/
//! //     fancy.png
//! let icons = IconCache::new("icons")?;
//!
//! match icons.get("folder")? {
//!     IconEntry::Folder(folder) => {
//!         let icon = folder.icon("fancy")?;
//!         println!("{} is {}x{}", folder, icon.width(), icon.height());
//!     }
//!     IconEntry::Icon(icon) => println!("unexpected icon {:?}", icon),
//! }
//!
//! let _fancy = icons.lookup("folder.fancy")?;
//! # Ok(())
//! # }
//! ```
//!
//! Names are matched against file stems, so `icons/fancy.png` is reached as
//! `"fancy"`. Lookups are case-sensitive. Failed lookups are never cached:
//! a file added after a miss is found by the next lookup. Successful lookups
//! are never invalidated.

mod cache;
mod config;
mod error;
mod format;
mod icon;
mod stats;

pub use cache::{IconCache, IconEntry};
pub use config::IconCacheConfig;
pub use error::{EntryKind, Error, ErrorKind, Result};
pub use format::IconFormat;
pub use icon::Icon;
pub use stats::CacheStats;
