//! Tests for format, backup/restore and startup loading
//!
//! These tests verify:
//! - Format empties the table and zeroes the data region
//! - Backup/restore reproduces the table and contents
//! - Failed restores and self-backups leave the image usable
//! - Missing, wrong-sized and corrupt images degrade to an empty table

use std::fs;

use simfs::metadata::LoadOutcome;
use simfs::{Config, FsError, Layout, Volume};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const TOTAL_SIZE: u64 = 4096 + 8192;

fn small_config(temp_dir: &TempDir, image: &str) -> Config {
    Config::builder()
        .image_path(temp_dir.path().join(image))
        .without_log()
        .layout(Layout::new(TOTAL_SIZE, 4096, 8).unwrap())
        .build()
}

fn populated_volume(temp_dir: &TempDir) -> Volume {
    let mut volume = Volume::open(small_config(temp_dir, "disk.sim")).unwrap();
    volume.create("a").unwrap();
    volume.write("a", b"alpha").unwrap();
    volume.create("empty").unwrap();
    volume.create("b").unwrap();
    volume.write("b", &[0xABu8; 700]).unwrap();
    volume
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_format_erases_everything() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);

    volume.format().unwrap();

    assert!(volume.entries().is_empty());
    assert_eq!(volume.stats().free_bytes, 8192);

    let image = fs::read(temp_dir.path().join("disk.sim")).unwrap();
    assert_eq!(image.len() as u64, TOTAL_SIZE);
    assert!(image[4096..].iter().all(|&b| b == 0));
}

#[test]
fn test_format_persists_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut volume = populated_volume(&temp_dir);
        volume.format().unwrap();
    }

    let volume = Volume::open(small_config(&temp_dir, "disk.sim")).unwrap();
    assert_eq!(volume.load_outcome(), &LoadOutcome::Loaded);
    assert!(volume.entries().is_empty());
}

// =============================================================================
// Backup / Restore Tests
// =============================================================================

#[test]
fn test_backup_copies_whole_image() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);
    let target = temp_dir.path().join("backup.img");

    let copied = volume.backup(&target).unwrap();

    assert_eq!(copied, TOTAL_SIZE);
    assert_eq!(
        fs::read(&target).unwrap(),
        fs::read(temp_dir.path().join("disk.sim")).unwrap()
    );
}

#[test]
fn test_restore_onto_garbage_image() {
    let temp_dir = TempDir::new().unwrap();
    let backup = temp_dir.path().join("backup.img");
    let original = {
        let mut volume = populated_volume(&temp_dir);
        volume.backup(&backup).unwrap();
        volume.entries().to_vec()
    };

    // A different image filled with junk of the wrong size
    fs::write(temp_dir.path().join("other.sim"), vec![0x5Au8; 1000]).unwrap();
    let mut volume = Volume::open(small_config(&temp_dir, "other.sim")).unwrap();
    assert!(volume.entries().is_empty());

    let copied = volume.restore(&backup).unwrap();

    assert_eq!(copied, TOTAL_SIZE);
    assert_eq!(volume.load_outcome(), &LoadOutcome::Loaded);
    assert_eq!(volume.entries(), &original[..]);
    assert_eq!(volume.cat("a").unwrap(), b"alpha");
    assert_eq!(volume.cat("b").unwrap(), vec![0xABu8; 700]);
    assert!(volume.size("empty").is_ok());
}

#[test]
fn test_restore_from_short_file_keeps_fixed_size() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);
    let source = temp_dir.path().join("short.img");
    fs::write(&source, b"not an image").unwrap();

    volume.restore(&source).unwrap();

    assert!(matches!(volume.load_outcome(), LoadOutcome::Reset { .. }));
    assert!(volume.entries().is_empty());
    let len = fs::metadata(temp_dir.path().join("disk.sim")).unwrap().len();
    assert_eq!(len, TOTAL_SIZE);
}

#[test]
fn test_restore_missing_source_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);

    let result = volume.restore(&temp_dir.path().join("nope.img"));

    assert!(result.is_err());
    assert_eq!(volume.cat("a").unwrap(), b"alpha");
}

#[test]
fn test_restore_from_unreadable_source_keeps_volume() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);
    let before = volume.entries().to_vec();
    let image_path = temp_dir.path().join("disk.sim");

    // A directory opens fine but cannot be read
    let result = volume.restore(temp_dir.path());

    assert!(matches!(result, Err(FsError::Io(_))));
    assert_eq!(fs::metadata(&image_path).unwrap().len(), TOTAL_SIZE);
    assert_eq!(volume.entries(), &before[..]);
    assert_eq!(volume.cat("a").unwrap(), b"alpha");
    volume.create("c").unwrap();
    drop(volume);

    let volume = Volume::open(small_config(&temp_dir, "disk.sim")).unwrap();
    assert_eq!(volume.load_outcome(), &LoadOutcome::Loaded);
    assert_eq!(volume.cat("b").unwrap(), vec![0xABu8; 700]);
    assert!(volume.exists("c"));
}

#[test]
fn test_backup_onto_image_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);
    let image_path = temp_dir.path().join("disk.sim");

    let result = volume.backup(&image_path);

    assert!(matches!(result, Err(FsError::InvalidArgument(_))));
    assert_eq!(fs::metadata(&image_path).unwrap().len(), TOTAL_SIZE);
    assert_eq!(volume.cat("a").unwrap(), b"alpha");
    drop(volume);

    let volume = Volume::open(small_config(&temp_dir, "disk.sim")).unwrap();
    assert_eq!(volume.load_outcome(), &LoadOutcome::Loaded);
    assert_eq!(volume.entries().len(), 3);
}

#[test]
fn test_backup_onto_image_through_relative_path_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let mut volume = populated_volume(&temp_dir);
    let indirect = temp_dir.path().join(".").join("disk.sim");

    assert!(matches!(
        volume.backup(&indirect),
        Err(FsError::InvalidArgument(_))
    ));
    assert_eq!(volume.cat("a").unwrap(), b"alpha");
}

// =============================================================================
// Load Outcome Tests
// =============================================================================

#[test]
fn test_missing_image_is_created() {
    let temp_dir = TempDir::new().unwrap();

    let volume = Volume::open(small_config(&temp_dir, "new.sim")).unwrap();

    assert_eq!(volume.load_outcome(), &LoadOutcome::Created);
    let len = fs::metadata(temp_dir.path().join("new.sim")).unwrap().len();
    assert_eq!(len, TOTAL_SIZE);
}

#[test]
fn test_wrong_size_image_is_reset() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("disk.sim"), vec![1u8; 50]).unwrap();

    let volume = Volume::open(small_config(&temp_dir, "disk.sim")).unwrap();

    assert_eq!(volume.load_outcome(), &LoadOutcome::Resized { found: 50 });
    assert!(volume.entries().is_empty());
}

#[test]
fn test_corrupt_metadata_is_reset() {
    let temp_dir = TempDir::new().unwrap();
    {
        let _volume = populated_volume(&temp_dir);
    }
    let path = temp_dir.path().join("disk.sim");
    let mut image = fs::read(&path).unwrap();
    image[12] ^= 0xFF;
    fs::write(&path, image).unwrap();

    let mut volume = Volume::open(small_config(&temp_dir, "disk.sim")).unwrap();

    assert!(matches!(volume.load_outcome(), LoadOutcome::Reset { .. }));
    assert!(volume.entries().is_empty());
    // The reset table was committed, so the volume is usable again
    volume.create("fresh").unwrap();
    assert!(volume.check().is_consistent());
}
