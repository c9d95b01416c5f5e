//! Lead preview and cover thumbnail synthesis from a finished DZI pyramid
//! (§4.6). No Go predecessor covers this stage directly; the tile-grouping
//! and stitching approach mirrors the same zip/`image` combination used by
//! `pyramidizer`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::{imageops, RgbImage};
use zip::ZipArchive;

use crate::error::{DziError, Result};

/// A level is selected once its first-column tile count, scaled by tile
/// size, reaches this width.
const COVER_SELECTION_MIN_WIDTH: u32 = 2000;

/// One tile's grid position plus its zip entry name.
type Tile = (u32, u32, String);

fn parse_tile_entry(name: &str) -> Option<(u32, Tile)> {
    let (level_str, rest) = name.split_once('/')?;
    let level: u32 = level_str.parse().ok()?;
    let stem = rest.rsplit_once('.')?.0;
    let (col_str, row_str) = stem.split_once('_')?;
    let col: u32 = col_str.parse().ok()?;
    let row: u32 = row_str.parse().ok()?;
    Some((level, (col, row, name.to_string())))
}

/// Groups every tile entry in a pyramid zip by its level, skipping the
/// `.dzi` descriptor.
pub fn group_tiles_by_level(archive: &ZipArchive<File>) -> BTreeMap<u32, Vec<Tile>> {
    let mut levels: BTreeMap<u32, Vec<Tile>> = BTreeMap::new();
    for name in archive.file_names() {
        if let Some((level, tile)) = parse_tile_entry(name) {
            levels.entry(level).or_default().push(tile);
        }
    }
    levels
}

/// Picks the smallest level whose first-column tile count times
/// `tile_size` reaches [`COVER_SELECTION_MIN_WIDTH`]; falls back to the
/// largest level if none qualifies.
pub fn select_level(levels: &BTreeMap<u32, Vec<Tile>>, tile_size: u32) -> Option<u32> {
    let reconstructed_width = |tiles: &[Tile]| -> u32 {
        tiles.iter().filter(|(col, _, _)| *col == 0).count() as u32 * tile_size
    };

    levels
        .iter()
        .find(|(_, tiles)| reconstructed_width(tiles) >= COVER_SELECTION_MIN_WIDTH)
        .or_else(|| levels.iter().next_back())
        .map(|(level, _)| *level)
}

/// Loads every tile of the chosen level and pastes it at `(col×tile_size,
/// row×tile_size)` into a fresh SRGB canvas, stripping alpha and
/// cropping away any overlap border so tiles don't overwrite each other.
pub fn stitch_level(archive: &mut ZipArchive<File>, tiles: &[Tile], tile_size: u32) -> Result<RgbImage> {
    let max_col = tiles.iter().map(|(c, _, _)| *c).max().unwrap_or(0);
    let max_row = tiles.iter().map(|(_, r, _)| *r).max().unwrap_or(0);
    let mut canvas = RgbImage::new((max_col + 1) * tile_size, (max_row + 1) * tile_size);

    for (col, row, entry_name) in tiles {
        let mut bytes = Vec::new();
        archive.by_name(entry_name)?.read_to_end(&mut bytes)?;
        let tile = image::load_from_memory(&bytes)?.to_rgb8();

        let crop_w = tile_size.min(tile.width());
        let crop_h = tile_size.min(tile.height());
        let cropped = imageops::crop_imm(&tile, 0, 0, crop_w, crop_h).to_image();
        imageops::overlay(&mut canvas, &cropped, (col * tile_size) as i64, (row * tile_size) as i64);
    }

    Ok(canvas)
}

/// Downscales the lead image to `cover_height`, preserving aspect ratio.
pub fn make_cover(lead: &RgbImage, cover_height: u32) -> RgbImage {
    let aspect = lead.width() as f64 / lead.height().max(1) as f64;
    let cover_width = ((cover_height as f64) * aspect).round().max(1.0) as u32;
    imageops::resize(lead, cover_width, cover_height.max(1), imageops::FilterType::Lanczos3)
}

/// The fixed-width preview size alongside the full lead (§9 supplemented
/// feature 3): the longer side is capped at 1000px, preserving aspect.
/// Leads already narrower than that pass through unresized.
const LEAD1000_MAX_SIDE: u32 = 1000;

pub fn make_lead1000(lead: &RgbImage) -> RgbImage {
    let (w, h) = (lead.width().max(1), lead.height().max(1));
    let longer = w.max(h);
    if longer <= LEAD1000_MAX_SIDE {
        return lead.clone();
    }
    let scale = LEAD1000_MAX_SIDE as f64 / longer as f64;
    let new_w = ((w as f64) * scale).round().max(1.0) as u32;
    let new_h = ((h as f64) * scale).round().max(1.0) as u32;
    imageops::resize(lead, new_w, new_h, imageops::FilterType::Lanczos3)
}

/// Full §4.6 pipeline for one swatch's color-variant DZI zip: select a
/// level, stitch it into a lead PNG, derive the cover thumbnail, and the
/// fixed-width `lead1000` preview alongside it.
pub fn build_cover(
    zip_path: &Path,
    tile_size: u32,
    cover_height: u32,
    lead_dest: &Path,
    lead1000_dest: &Path,
    cover_dest: &Path,
) -> Result<()> {
    let file = File::open(zip_path).map_err(|e| DziError::io(zip_path.to_path_buf(), e))?;
    let mut archive = ZipArchive::new(file)?;

    let levels = group_tiles_by_level(&archive);
    let level = select_level(&levels, tile_size)
        .ok_or_else(|| DziError::invariant(format!("pyramid zip {zip_path:?} contains no tile levels")))?;
    let tiles = levels.get(&level).expect("selected level must be present");

    let lead = stitch_level(&mut archive, tiles, tile_size)?;
    if let Some(parent) = lead_dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    lead.save(lead_dest)?;

    let lead1000 = make_lead1000(&lead);
    if let Some(parent) = lead1000_dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    lead1000.save(lead1000_dest)?;

    let cover = make_cover(&lead, cover_height);
    if let Some(parent) = cover_dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    cover.save(cover_dest)?;

    Ok(())
}

#[cfg(test)]
mod tests;
