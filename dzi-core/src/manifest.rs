//! Manifest schema and assembly (§4.7/§6), grounded in `manifest.go`'s
//! `Manifest`/`Page`/`ChannelV4`/`DziSize` structs. The legacy stringly-typed
//! fields (`TileSize string`, `DziSize.Width string`, ...) are normalized
//! to real numeric types here; see DESIGN.md.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Asset, TileRange};
use crate::error::Result;

pub const MANIFEST_VERSION: &str = "5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DziSize {
    pub width: f64,
    pub height: f64,
    pub units: String,
    pub dpi: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelV4 {
    pub name: String,
    pub dzi_color_path: Option<String>,
    pub dzi_bw_path: Option<String>,
    pub lead_path: Option<String>,
    pub lead1000_path: Option<String>,
    pub cover_path: Option<String>,
    pub color_ranges: BTreeMap<String, TileRange>,
    pub bw_ranges_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPage {
    pub page_num: u32,
    pub size: DziSize,
    pub text_content: String,
    pub channels: Vec<String>,
    pub channels_v4: Vec<ChannelV4>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub id: u64,
    pub timestamp_start: String,
    pub timestamp_end: String,
    pub source: String,
    pub filename: String,
    pub basename: String,
    pub tile_size: u32,
    pub tile_format: String,
    pub cover_height: u32,
    pub overlap: u32,
    pub mode: String,
    pub pages: Vec<ManifestPage>,
    pub swatches: Vec<String>,
    pub split_channels: bool,
    pub overprint: String,
}

/// Strips the scratch root prefix so every path embedded in the manifest
/// is relative, matching §6's "All paths in the manifest are relative to
/// the scratch root" rule. Falls back to the original path if it isn't
/// actually inside `scratch_root`.
pub fn relative_to_scratch(scratch_root: &Path, path: &Path) -> String {
    path.strip_prefix(scratch_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn dedup_swatch_names(pages: &[ManifestPage]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    for page in pages {
        for name in &page.channels {
            seen.insert(name.clone());
        }
    }
    seen.into_iter().collect()
}

/// Assembles the final manifest from per-page records already finalized
/// by the Colorizer/Pyramidizer/CoverBuilder stages. The global swatch
/// list is deduplicated here, single-threaded, per §5.
pub fn build_manifest(
    asset: &Asset,
    pages: Vec<ManifestPage>,
    config: &Config,
    mode: &str,
    timestamp_start: &str,
    timestamp_end: &str,
) -> Manifest {
    let swatches = dedup_swatch_names(&pages);
    Manifest {
        version: MANIFEST_VERSION.to_string(),
        id: asset.id,
        timestamp_start: timestamp_start.to_string(),
        timestamp_end: timestamp_end.to_string(),
        source: asset.source_url.clone(),
        filename: asset.filename.clone(),
        basename: asset.basename.clone(),
        tile_size: config.tile_size,
        tile_format: config.tile_format.clone(),
        cover_height: config.cover_height,
        overlap: config.overlap,
        mode: mode.to_string(),
        pages,
        swatches,
        split_channels: config.split_channels,
        overprint: config.overprint.as_ps_literal().to_string(),
    }
}

pub fn to_json(manifest: &Manifest) -> Result<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

pub fn from_json(raw: &str) -> Result<Manifest> {
    Ok(serde_json::from_str(raw)?)
}

/// §8: page numbers must be 1..N contiguous, matching input document order.
pub fn page_numbers_are_contiguous(manifest: &Manifest) -> bool {
    manifest
        .pages
        .iter()
        .map(|p| p.page_num)
        .eq(1..=manifest.pages.len() as u32)
}

#[cfg(test)]
mod tests;
