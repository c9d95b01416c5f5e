//! Core data model (§3): Asset, Page, Swatch, PageGeometry, TileRange.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SwatchType {
    CmykComponent,
    SpotComponent,
    Final,
}

/// Canonical channel order for process inks, per §3 invariants.
pub const CMYK_CHANNEL_ORDER: [&str; 4] = ["Cyan", "Magenta", "Yellow", "Black"];
pub const RGB_CHANNEL_ORDER: [&str; 3] = ["Red", "Green", "Blue"];
pub const ALPHA_CHANNEL: &str = "Alpha";

#[derive(Debug, Clone)]
pub struct Swatch {
    /// Canonical, UTF-8, parenthesis-free name (e.g. "Cyan", "PANTONE 185 C").
    pub name: String,
    /// Filesystem-safe rendering of `name` used on disk.
    pub ops_name: String,
    pub swatch_type: SwatchType,
    /// "#rrggbb"
    pub rgb: String,
    pub needs_matte: bool,
    pub working_filepath: Option<PathBuf>,
    pub dzi_color_path: Option<PathBuf>,
    pub dzi_bw_path: Option<PathBuf>,
    pub lead_path: Option<PathBuf>,
    pub lead1000_path: Option<PathBuf>,
    pub cover_path: Option<PathBuf>,
    pub color_ranges: BTreeMap<String, TileRange>,
    pub bw_ranges_path: Option<PathBuf>,
}

impl Swatch {
    pub fn new_final(working_filepath: PathBuf) -> Self {
        Self {
            name: "Color".to_string(),
            ops_name: "Color".to_string(),
            swatch_type: SwatchType::Final,
            rgb: String::new(),
            needs_matte: false,
            working_filepath: Some(working_filepath),
            dzi_color_path: None,
            dzi_bw_path: None,
            lead_path: None,
            lead1000_path: None,
            cover_path: None,
            color_ranges: BTreeMap::new(),
            bw_ranges_path: None,
        }
    }

    pub fn is_final(&self) -> bool {
        self.swatch_type == SwatchType::Final
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mm,
    Cm,
    In,
    Px,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Px => "px",
        }
    }
}

/// Geometry computed once per page before rasterization (§4.1).
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub point_width: f64,
    pub point_height: f64,
    pub inch_width: f64,
    pub inch_height: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub effective_dpi: u32,
    pub rotation: i32,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub page_number: u32,
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    pub effective_dpi: u32,
    pub rotation: i32,
    pub text_content: String,
    pub swatches: Vec<Swatch>,
}

impl Page {
    /// The single Final swatch ("Color"), per the §3 invariant.
    pub fn final_swatch(&self) -> Option<&Swatch> {
        self.swatches.iter().find(|s| s.is_final())
    }

    pub fn non_final_swatches(&self) -> impl Iterator<Item = &Swatch> {
        self.swatches.iter().filter(|s| !s.is_final())
    }
}

#[derive(Debug, Clone)]
pub struct Asset {
    pub id: u64,
    pub source_url: String,
    pub filename: String,
    pub basename: String,
    pub extension: String,
}

/// Byte-range of one compressed DZI tile entry inside its zip, keyed by
/// `"level/col_row.ext"` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub offset: u64,
    pub compressed_length: u64,
}

#[cfg(test)]
mod tests;
