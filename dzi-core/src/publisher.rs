//! Manifest emission and publication (§4.7), grounded in
//! `make_manifest.go` (spilling B/W range indexes to their own files)
//! and `utils.go::syncToS3` (the set-alias → recursive-copy → remove-alias
//! cycle, here expressed as configure/copy/teardown on a single bucket
//! client instead of shelling to `mc`).

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::data::TileRange;
use crate::error::{DziError, Result};
use crate::manifest::{to_json, Manifest};

/// The `ObjectStoreCopier` capability (§6): publishes a local directory
/// tree to an S3-compatible bucket under a given remote prefix. Modeled
/// as three phases so a future swap to a CLI-based copier (the original
/// shelled to `mc`) stays a drop-in (§9 supplemented feature 5).
pub trait ObjectStoreCopier {
    fn configure(&mut self, asset_id: u64) -> Result<()>;
    fn copy_tree(&self, local_root: &Path, remote_prefix: &str) -> Result<()>;
    fn teardown(&mut self, asset_id: u64) -> Result<()>;
}

/// Default adapter: a single `rust-s3` bucket client pointed at the
/// configured S3-compatible host.
pub struct S3Copier {
    bucket: Option<Box<s3::Bucket>>,
    host: String,
    key: String,
    secret: String,
    bucket_name: String,
}

impl S3Copier {
    pub fn new(config: &Config) -> Self {
        Self {
            bucket: None,
            host: config.s3_host.clone(),
            key: config.s3_key.clone(),
            secret: config.s3_secret.clone(),
            bucket_name: config.s3_bucket.clone(),
        }
    }
}

impl ObjectStoreCopier for S3Copier {
    fn configure(&mut self, asset_id: u64) -> Result<()> {
        let region = s3::Region::Custom {
            region: "us-east-1".to_string(),
            endpoint: self.host.clone(),
        };
        let credentials = s3::creds::Credentials::new(Some(&self.key), Some(&self.secret), None, None, None)
            .map_err(|e| DziError::tool("s3", format!("asset {asset_id}: {e}")))?;
        let bucket = s3::Bucket::new(&self.bucket_name, region, credentials)
            .map_err(|e| DziError::tool("s3", e.to_string()))?
            .with_path_style();
        self.bucket = Some(bucket);
        Ok(())
    }

    fn copy_tree(&self, local_root: &Path, remote_prefix: &str) -> Result<()> {
        let bucket = self
            .bucket
            .as_ref()
            .ok_or_else(|| DziError::invariant("ObjectStoreCopier::copy_tree called before configure".to_string()))?;

        for entry in walk_files(local_root)? {
            let relative = entry
                .strip_prefix(local_root)
                .unwrap_or(&entry)
                .to_string_lossy()
                .replace('\\', "/");
            let remote_path = format!("{}/{}", remote_prefix.trim_end_matches('/'), relative);
            let bytes = std::fs::read(&entry).map_err(|e| DziError::io(entry.clone(), e))?;
            bucket
                .put_object_blocking(&remote_path, &bytes)
                .map_err(|e| DziError::tool("s3", format!("uploading {remote_path}: {e}")))?;
        }
        Ok(())
    }

    fn teardown(&mut self, _asset_id: u64) -> Result<()> {
        self.bucket = None;
        Ok(())
    }
}

fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| DziError::io(dir.clone(), e))? {
            let entry = entry.map_err(|e| DziError::io(dir.clone(), e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Spills one swatch's B/W tile-range index to
/// `<scratch>/ranges/bw_<page>_<ops_name>.json`, returning the
/// manifest-relative path recorded on `ChannelV4::bw_ranges_path`.
pub fn spill_bw_ranges(
    scratch_root: &Path,
    page_number: u32,
    ops_name: &str,
    ranges: &std::collections::BTreeMap<String, TileRange>,
) -> Result<PathBuf> {
    let ranges_dir = scratch_root.join("ranges");
    std::fs::create_dir_all(&ranges_dir).map_err(|e| DziError::io(ranges_dir.clone(), e))?;

    let dest = ranges_dir.join(format!("bw_{page_number}_{ops_name}.json"));
    let json = serde_json::to_string(ranges)?;
    std::fs::write(&dest, json).map_err(|e| DziError::io(dest.clone(), e))?;
    Ok(dest)
}

/// Writes the assembled manifest to `<scratch>/manifest.json`.
pub fn write_manifest(scratch_root: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let dest = scratch_root.join("manifest.json");
    let json = to_json(manifest)?;
    std::fs::write(&dest, json).map_err(|e| DziError::io(dest.clone(), e))?;
    Ok(dest)
}

/// Full §4.7 publish step: writes the manifest (already assembled by the
/// coordinator) and, unless `config.debug` is set, uploads the entire
/// scratch tree under `/<asset_id>/`.
pub fn publish(
    copier: &mut dyn ObjectStoreCopier,
    scratch_root: &Path,
    manifest: &Manifest,
    asset_id: u64,
    config: &Config,
) -> Result<()> {
    write_manifest(scratch_root, manifest)?;

    if config.debug {
        log::info!("debug mode: skipping S3 publication for asset {asset_id}");
        return Ok(());
    }

    copier.configure(asset_id)?;
    let remote_prefix = format!("/{asset_id}");
    let result = copier.copy_tree(scratch_root, &remote_prefix);
    copier.teardown(asset_id)?;
    result
}

#[cfg(test)]
mod tests;
