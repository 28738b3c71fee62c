//! Integration tests for name resolution and memoization.

use std::fs;
use std::path::Path;

use icon_cache::{
    EntryKind, Error, ErrorKind, IconCache, IconCacheConfig, IconEntry, IconFormat,
};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

// RGB rather than RGBA: the JPEG encoder rejects alpha.
fn write_image(path: &Path, format: ImageFormat) {
    RgbImage::from_pixel(3, 2, Rgb([0, 128, 255]))
        .save_with_format(path, format)
        .unwrap();
}

fn write_png(path: &Path) {
    write_image(path, ImageFormat::Png);
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]))
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn empty_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

// ============================================================================
// Construction and binding
// ============================================================================

#[test]
fn test_construct_on_valid_directory() {
    let dir = empty_dir();
    let cache = IconCache::new(dir.path()).unwrap();
    assert_eq!(cache.path(), dir.path());
    assert_eq!(cache.stats().misses, 0);
}

#[test]
fn test_construct_on_relative_directory() {
    let cache = IconCache::new(".").unwrap();
    assert_eq!(cache.path(), Path::new("."));
}

#[test]
fn test_construct_on_invalid_paths() {
    let dir = empty_dir();
    let file = dir.path().join("file.png");
    write_png(&file);

    for path in [dir.path().join("missing"), file] {
        let err = IconCache::new(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        match err {
            Error::InvalidPath { path: reported } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn test_set_path_validates() {
    let dir = empty_dir();
    let cache = IconCache::new(dir.path()).unwrap();

    let err = cache.set_path(dir.path().join("missing")).unwrap_err();
    assert!(err.is_invalid_path());
    assert_eq!(cache.path(), dir.path());
}

#[test]
fn test_set_path_keeps_stale_entries() {
    let first = empty_dir();
    let second = empty_dir();
    write_png(&first.path().join("old.png"));
    write_png(&second.path().join("new.png"));

    let cache = IconCache::new(first.path()).unwrap();
    let old = cache.icon("old").unwrap();

    cache.set_path(second.path()).unwrap();
    assert_eq!(cache.path(), second.path());

    // Memoized under the first binding, still served.
    let again = cache.icon("old").unwrap();
    assert!(old.ptr_eq(&again));
    assert_eq!(again.source(), first.path().join("old.png"));

    // New names resolve against the new binding.
    assert!(cache.icon("new").is_ok());
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_hit_survives_file_deletion() {
    let dir = empty_dir();
    let path = dir.path().join("fancy.png");
    write_png(&path);

    let cache = IconCache::new(dir.path()).unwrap();
    let first = cache.get("fancy").unwrap();
    fs::remove_file(&path).unwrap();
    let second = cache.get("fancy").unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(cache.stats().scans, 1);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_miss_rescans_and_picks_up_new_file() {
    let dir = empty_dir();
    let cache = IconCache::new(dir.path()).unwrap();

    assert!(cache.get("late").unwrap_err().is_not_found());
    assert!(cache.get("late").unwrap_err().is_not_found());

    write_png(&dir.path().join("late.png"));
    let entry = cache.get("late").unwrap();

    assert_eq!(entry.kind(), EntryKind::Icon);
    assert_eq!(cache.stats().scans, 3);
}

#[test]
fn test_not_found_reports_node_and_name() {
    let dir = empty_dir();
    let cache = IconCache::new(dir.path()).unwrap();

    match cache.get("ghost").unwrap_err() {
        Error::NotFound { cache: node, name } => {
            assert_eq!(node, dir.path());
            assert_eq!(name, "ghost");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let dir = empty_dir();
    write_png(&dir.path().join("a.png"));
    fs::create_dir(dir.path().join("b")).unwrap();

    let cache = IconCache::new(dir.path()).unwrap();
    for name in ["a", "b"] {
        let first = cache.get(name).unwrap();
        let second = cache.get(name).unwrap();
        assert!(first.ptr_eq(&second), "{name} resolved twice");
    }
}

#[test]
fn test_names_are_case_sensitive() {
    let dir = empty_dir();
    write_png(&dir.path().join("Fancy.png"));

    let cache = IconCache::new(dir.path()).unwrap();
    assert!(cache.get("fancy").unwrap_err().is_not_found());
    assert!(cache.get("Fancy").is_ok());
}

#[test]
fn test_full_file_name_does_not_match() {
    let dir = empty_dir();
    write_png(&dir.path().join("fancy.png"));

    let cache = IconCache::new(dir.path()).unwrap();
    assert!(cache.get("fancy.png").unwrap_err().is_not_found());
}

// ============================================================================
// Content-based recognition
// ============================================================================

#[test]
fn test_misleading_extension_resolves() {
    let dir = empty_dir();
    fs::write(dir.path().join("photo.txt"), png_bytes()).unwrap();

    let cache = IconCache::new(dir.path()).unwrap();
    let icon = cache.icon("photo").unwrap();
    assert_eq!(icon.format(), IconFormat::Png);
    assert_eq!(icon.dimensions(), (1, 1));
}

#[test]
fn test_garbage_with_image_extension_fails() {
    let dir = empty_dir();
    fs::write(dir.path().join("photo.png"), b"this is not an image").unwrap();

    let cache = IconCache::new(dir.path()).unwrap();
    assert!(cache.get("photo").unwrap_err().is_not_found());
    assert_eq!(cache.stats().scans, 1);
}

#[test]
fn test_corrupt_image_is_not_found() {
    let dir = empty_dir();
    let mut bytes = png_bytes();
    bytes.truncate(16);
    fs::write(dir.path().join("broken.png"), bytes).unwrap();

    let cache = IconCache::new(dir.path()).unwrap();
    assert!(cache.get("broken").unwrap_err().is_not_found());
}

#[test]
fn test_standard_formats_recognized() {
    let dir = empty_dir();
    write_image(&dir.path().join("p.png"), ImageFormat::Png);
    write_image(&dir.path().join("j.jpg"), ImageFormat::Jpeg);
    write_image(&dir.path().join("g.gif"), ImageFormat::Gif);
    write_image(&dir.path().join("b.bmp"), ImageFormat::Bmp);

    let cache = IconCache::new(dir.path()).unwrap();
    let expected = [
        ("p", IconFormat::Png),
        ("j", IconFormat::Jpeg),
        ("g", IconFormat::Gif),
        ("b", IconFormat::Bmp),
    ];
    for (name, format) in expected {
        let icon = cache.icon(name).unwrap();
        assert_eq!(icon.format(), format, "{name}");
        assert_eq!(icon.dimensions(), (3, 2), "{name}");
    }
}

#[test]
fn test_config_restricts_formats() {
    let dir = empty_dir();
    write_image(&dir.path().join("g.gif"), ImageFormat::Gif);
    write_png(&dir.path().join("p.png"));

    let config = IconCacheConfig::default().with_formats([IconFormat::Png]);
    let cache = IconCache::with_config(dir.path(), config).unwrap();

    assert!(cache.icon("p").is_ok());
    assert!(cache.get("g").unwrap_err().is_not_found());
}

#[test]
fn test_huge_sniff_len_from_toml_still_resolves() {
    let dir = empty_dir();
    write_png(&dir.path().join("fancy.png"));

    let config = IconCacheConfig::from_toml_str("sniff_len = 9223372036854775807").unwrap();
    let cache = IconCache::with_config(dir.path(), config).unwrap();

    assert_eq!(cache.icon("fancy").unwrap().format(), IconFormat::Png);
}

// ============================================================================
// Typed accessors
// ============================================================================

#[test]
fn test_typed_accessors_report_wrong_kind() {
    let dir = empty_dir();
    write_png(&dir.path().join("fancy.png"));
    fs::create_dir(dir.path().join("folder")).unwrap();

    let cache = IconCache::new(dir.path()).unwrap();

    let err = cache.folder("fancy").unwrap_err();
    assert!(matches!(
        err,
        Error::WrongKind {
            expected: EntryKind::Folder,
            found: EntryKind::Icon,
            ..
        }
    ));

    let err = cache.icon("folder").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongKind);

    // The resolution itself succeeded and was memoized.
    assert!(matches!(cache.get("folder").unwrap(), IconEntry::Folder(_)));
    assert_eq!(cache.stats().scans, 2);
}
