use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::data::Asset;
use crate::manifest::build_manifest;

struct RecordingCopier {
    configured: AtomicBool,
    copied: AtomicBool,
    torn_down: AtomicBool,
}

impl RecordingCopier {
    fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            copied: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
        }
    }
}

impl ObjectStoreCopier for RecordingCopier {
    fn configure(&mut self, _asset_id: u64) -> Result<()> {
        self.configured.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn copy_tree(&self, _local_root: &Path, _remote_prefix: &str) -> Result<()> {
        self.copied.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn teardown(&mut self, _asset_id: u64) -> Result<()> {
        self.torn_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn test_config(debug: bool) -> Config {
    let mut config = Config::from_env().unwrap();
    config.debug = debug;
    config
}

fn test_manifest(config: &Config) -> Manifest {
    let asset = Asset {
        id: 42,
        source_url: "https://example.com/art.pdf".into(),
        filename: "art.pdf".into(),
        basename: "art-abc123".into(),
        extension: "pdf".into(),
    };
    build_manifest(&asset, Vec::new(), config, "cmyk", "2026-01-01T00:00:00Z", "2026-01-01T00:01:00Z")
}

#[test]
fn spill_bw_ranges_writes_json_under_ranges_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut ranges = BTreeMap::new();
    ranges.insert(
        "0/0_0.png".to_string(),
        TileRange {
            offset: 100,
            compressed_length: 50,
        },
    );

    let dest = spill_bw_ranges(dir.path(), 1, "Cyan", &ranges).unwrap();
    assert_eq!(dest, dir.path().join("ranges/bw_1_Cyan.json"));
    let raw = std::fs::read_to_string(&dest).unwrap();
    assert!(raw.contains("0/0_0.png"));
}

#[test]
fn write_manifest_writes_manifest_json_at_scratch_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(false);
    let manifest = test_manifest(&config);

    let dest = write_manifest(dir.path(), &manifest).unwrap();
    assert_eq!(dest, dir.path().join("manifest.json"));
    let raw = std::fs::read_to_string(&dest).unwrap();
    assert!(raw.contains("\"id\": 42"));
}

#[test]
fn publish_skips_upload_in_debug_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(true);
    let manifest = test_manifest(&config);
    let mut copier = RecordingCopier::new();

    publish(&mut copier, dir.path(), &manifest, 42, &config).unwrap();

    assert!(!copier.configured.load(Ordering::SeqCst));
    assert!(!copier.copied.load(Ordering::SeqCst));
    assert!(dir.path().join("manifest.json").exists());
}

#[test]
fn publish_runs_configure_copy_teardown_outside_debug_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(false);
    let manifest = test_manifest(&config);
    let mut copier = RecordingCopier::new();

    publish(&mut copier, dir.path(), &manifest, 42, &config).unwrap();

    assert!(copier.configured.load(Ordering::SeqCst));
    assert!(copier.copied.load(Ordering::SeqCst));
    assert!(copier.torn_down.load(Ordering::SeqCst));
}

#[test]
fn walk_files_finds_nested_entries_sorted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    std::fs::write(dir.path().join("a/b/c.txt"), b"hi").unwrap();
    std::fs::write(dir.path().join("top.txt"), b"hi").unwrap();

    let files = walk_files(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|p| p.ends_with("a/b/c.txt")));
    assert!(files.iter().any(|p| p.ends_with("top.txt")));
}
