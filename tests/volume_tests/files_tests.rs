//! Tests for file table operations
//!
//! These tests verify:
//! - create/delete/rename/mv and their error cases
//! - exists/size/list queries
//! - Table order and persistence across reopen

use simfs::{Config, FsError, Layout, Volume};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn small_config(temp_dir: &TempDir) -> Config {
    Config::builder()
        .image_path(temp_dir.path().join("disk.sim"))
        .log_path(temp_dir.path().join("fs.log"))
        .layout(Layout::new(4096 + 8192, 4096, 8).unwrap())
        .build()
}

fn setup_temp_volume() -> (TempDir, Volume) {
    let temp_dir = TempDir::new().unwrap();
    let volume = Volume::open(small_config(&temp_dir)).unwrap();
    (temp_dir, volume)
}

fn names(volume: &Volume) -> Vec<String> {
    volume.entries().iter().map(|e| e.name.clone()).collect()
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_makes_empty_unallocated_file() {
    let (_temp, mut volume) = setup_temp_volume();

    volume.create("notes.txt").unwrap();

    let entry = volume.entry("notes.txt").unwrap();
    assert_eq!(entry.size, 0);
    assert_eq!(entry.start, None);
    assert_eq!(entry.created.len(), 19);
    assert!(volume.exists("notes.txt"));
}

#[test]
fn test_create_duplicate_fails() {
    let (_temp, mut volume) = setup_temp_volume();

    volume.create("a").unwrap();
    let result = volume.create("a");

    assert!(matches!(result, Err(FsError::AlreadyExists(_))));
    assert_eq!(volume.entries().len(), 1);
}

#[test]
fn test_create_invalid_names() {
    let (_temp, mut volume) = setup_temp_volume();

    let too_long = "x".repeat(32);
    for name in ["", "dir/file", "nul\0byte", too_long.as_str()] {
        let result = volume.create(name);
        assert!(
            matches!(result, Err(FsError::InvalidName(_))),
            "{:?} should be rejected",
            name
        );
    }

    volume.create(&"x".repeat(31)).unwrap();
}

#[test]
fn test_create_beyond_capacity() {
    let (_temp, mut volume) = setup_temp_volume();

    for i in 0..8 {
        volume.create(&format!("f{}", i)).unwrap();
    }
    let result = volume.create("one_too_many");

    assert!(matches!(result, Err(FsError::CapacityExceeded { max: 8 })));
    assert!(!volume.exists("one_too_many"));
}

#[test]
fn test_created_files_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut volume = Volume::open(small_config(&temp_dir)).unwrap();
        volume.create("first").unwrap();
        volume.create("second").unwrap();
        volume.close().unwrap();
    }

    let volume = Volume::open(small_config(&temp_dir)).unwrap();
    assert_eq!(names(&volume), vec!["first", "second"]);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_keeps_order_of_remaining() {
    let (_temp, mut volume) = setup_temp_volume();
    for name in ["a", "b", "c"] {
        volume.create(name).unwrap();
    }

    volume.delete("b").unwrap();

    assert_eq!(names(&volume), vec!["a", "c"]);
}

#[test]
fn test_delete_missing_fails() {
    let (_temp, mut volume) = setup_temp_volume();

    assert!(matches!(volume.delete("nope"), Err(FsError::NotFound(_))));
}

#[test]
fn test_delete_frees_space() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("big").unwrap();
    volume.write("big", &[7u8; 8192]).unwrap();
    assert_eq!(volume.stats().free_bytes, 0);

    volume.delete("big").unwrap();

    assert_eq!(volume.stats().free_bytes, 8192);
}

// =============================================================================
// Rename / Move Tests
// =============================================================================

#[test]
fn test_rename_keeps_position_and_content() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("a").unwrap();
    volume.create("b").unwrap();
    volume.write("a", b"payload").unwrap();

    volume.rename("a", "z").unwrap();

    assert_eq!(names(&volume), vec!["z", "b"]);
    assert_eq!(volume.cat("z").unwrap(), b"payload");
    assert!(!volume.exists("a"));
}

#[test]
fn test_rename_errors() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("a").unwrap();
    volume.create("b").unwrap();

    assert!(matches!(volume.rename("missing", "c"), Err(FsError::NotFound(_))));
    assert!(matches!(volume.rename("a", "b"), Err(FsError::AlreadyExists(_))));
    assert!(matches!(volume.rename("a", ""), Err(FsError::InvalidName(_))));
    // The new name is validated before the old one is looked up
    assert!(matches!(volume.rename("missing", "x/y"), Err(FsError::InvalidName(_))));
}

#[test]
fn test_mv_renames() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("old").unwrap();

    volume.mv("old", "new").unwrap();

    assert!(volume.exists("new"));
    assert!(!volume.exists("old"));
}

#[test]
fn test_mv_into_directory_is_refused() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("file").unwrap();

    let result = volume.mv("file", "dir/file");

    assert!(matches!(result, Err(FsError::InvalidName(_))));
    assert!(volume.exists("file"));
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_size_reports_logical_length() {
    let (_temp, mut volume) = setup_temp_volume();
    volume.create("f").unwrap();
    assert_eq!(volume.size("f").unwrap(), 0);

    volume.write("f", b"12345").unwrap();
    assert_eq!(volume.size("f").unwrap(), 5);

    assert!(matches!(volume.size("nope"), Err(FsError::NotFound(_))));
}

#[test]
fn test_list_returns_entries_in_table_order() {
    let (_temp, mut volume) = setup_temp_volume();
    assert!(volume.list().is_empty());

    volume.create("y").unwrap();
    volume.create("x").unwrap();

    let listed: Vec<_> = volume.list().into_iter().map(|e| e.name).collect();
    assert_eq!(listed, vec!["y", "x"]);
}

#[test]
fn test_exists_on_missing_file() {
    let (_temp, volume) = setup_temp_volume();

    assert!(!volume.exists("ghost"));
}
