//! Resolve names against an icon folder and print what they turn into.
//!
//! Run with:
//! ```
//! cargo run -p icon-cache --example browse -- path/to/icons fancy folder folder.fancy
//! ```
//!
//! Set `RUST_LOG=icon_cache=debug` to watch scans and memo hits. An optional
//! `--config icons.toml` before the directory loads an `IconCacheConfig`.

use std::process::ExitCode;

use icon_cache::{IconCache, IconCacheConfig, IconEntry};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1).peekable();

    let config = if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        let Some(path) = args.next() else {
            eprintln!("--config needs a file");
            return ExitCode::FAILURE;
        };
        match IconCacheConfig::from_toml_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        IconCacheConfig::default()
    };

    let Some(root) = args.next() else {
        eprintln!("usage: browse [--config FILE] <icon-dir> [name[.name...]]...");
        return ExitCode::FAILURE;
    };

    let icons = match IconCache::with_config(&root, config) {
        Ok(icons) => icons,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    println!("icons = {icons}");

    let mut failed = false;
    for name in args {
        match icons.lookup(&name) {
            Ok(IconEntry::Folder(folder)) => println!("icons.{name} = {folder}"),
            Ok(IconEntry::Icon(icon)) => println!(
                "icons.{name} = {}x{} {} from {}",
                icon.width(),
                icon.height(),
                icon.format().mime_type(),
                icon.source().display()
            ),
            Err(err) => {
                println!("icons.{name}: {err}");
                failed = true;
            }
        }
    }

    let stats = icons.stats();
    println!(
        "root node: {} hits, {} misses, {} scans",
        stats.hits, stats.misses, stats.scans
    );

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
