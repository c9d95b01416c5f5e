//! Ink name resolution (§4.3), ported from `pdfextract.go`'s
//! `esko2swatch` and the `swatchMap` precedence chain in `getEntryInfo`.

use std::collections::BTreeMap;

use crate::colormath::{self, rgb_to_hex};
use crate::data::SwatchType;
use crate::error::{DziError, Result};
use crate::xmp::{EskoInkEntry, EskoShape, PdfCoreShape};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInk {
    pub swatch_type: SwatchType,
    pub rgb: [u8; 3],
    pub hex: String,
}

impl ResolvedInk {
    fn new(swatch_type: SwatchType, rgb: [u8; 3]) -> Self {
        Self {
            swatch_type,
            rgb,
            hex: rgb_to_hex(rgb),
        }
    }
}

/// Maps an Esko ink's `(type, book, egname)` to the display name other
/// metadata (and on-disk filenames) refer to it by. Mirrors
/// `esko2swatch`'s book-prefix switch exactly, including its silent
/// fallback to the raw name for unrecognized books.
fn esko_resolved_name(entry: &EskoInkEntry) -> String {
    if entry.egtype != "pantone" {
        return entry.name.clone();
    }
    match entry.book.as_str() {
        "pms1000c" | "goec" | "pmetc" | "ppasc" => format!("PANTONE {} C", entry.egname),
        "pms1000u" | "ppasu" => format!("PANTONE {} U", entry.egname),
        "pms1000m" => format!("PANTONE {} M", entry.egname),
        "goeu" => format!("PANTONE {} U", entry.egname),
        _ => entry.name.clone(),
    }
}

fn esko_swatch_type(entry: &EskoInkEntry) -> Option<SwatchType> {
    match entry.egtype.as_str() {
        "process" => Some(SwatchType::CmykComponent),
        "pantone" | "designer" => Some(SwatchType::SpotComponent),
        _ => None,
    }
}

fn esko_rgb(entry: &EskoInkEntry) -> [u8; 3] {
    let scale = |v: f64| -> u8 { (v * 255.0).clamp(0.0, 255.0) as u8 };
    [scale(entry.r), scale(entry.g), scale(entry.b)]
}

/// Resolves each on-disk ink's display color from XMP metadata and the
/// separation tool's recovered spots, following the §4.3 precedence
/// chain. Built once per page from its XMP shapes and recovered-spots
/// map, then queried once per ink name discovered on disk.
pub struct InkCatalog {
    esko_by_name: BTreeMap<String, EskoInkEntry>,
    pdf_core: PdfCoreShape,
    recovered: BTreeMap<String, [u8; 3]>,
}

impl InkCatalog {
    pub fn new(esko: EskoShape, pdf_core: PdfCoreShape, recovered: BTreeMap<String, [u8; 3]>) -> Self {
        let esko_by_name = esko
            .inks
            .into_iter()
            .map(|entry| (esko_resolved_name(&entry), entry))
            .collect();
        Self {
            esko_by_name,
            pdf_core,
            recovered,
        }
    }

    /// Resolves a single on-disk ink name. `"Color"` (the final composite)
    /// is never passed here; callers route it straight to
    /// `SwatchType::Final` without consulting the catalog.
    pub fn resolve(&self, name: &str) -> Result<ResolvedInk> {
        if let Some(rgb) = colormath::pantone_rgb(name) {
            return Ok(ResolvedInk::new(SwatchType::SpotComponent, rgb));
        }

        if let Some(entry) = self.esko_by_name.get(name) {
            let swatch_type = esko_swatch_type(entry).unwrap_or(SwatchType::SpotComponent);
            return Ok(ResolvedInk::new(swatch_type, esko_rgb(entry)));
        }

        if let Some(group) = self
            .pdf_core
            .swatch_groups
            .iter()
            .find(|g| g.swatch_name == name)
        {
            let rgb = match group.mode.to_ascii_uppercase().as_str() {
                "LAB" => colormath::lab_to_rgb(group.l, group.a, group.b),
                "RGB" => [
                    group.red.clamp(0, 255) as u8,
                    group.green.clamp(0, 255) as u8,
                    group.blue.clamp(0, 255) as u8,
                ],
                "CMYK" => colormath::cmyk_to_rgb(group.cyan, group.magenta, group.yellow, group.black),
                other => {
                    return Err(DziError::invariant(format!(
                        "swatch group {name:?} has unrecognized color mode {other:?}"
                    )))
                }
            };
            return Ok(ResolvedInk::new(SwatchType::SpotComponent, rgb));
        }

        if let Some(&rgb) = self.recovered.get(name) {
            return Ok(ResolvedInk::new(SwatchType::SpotComponent, rgb));
        }

        if let Some(rgb) = colormath::process_ink_default_rgb(name) {
            return Ok(ResolvedInk::new(SwatchType::CmykComponent, rgb));
        }

        Err(DziError::invariant(format!(
            "could not resolve a display color for ink {name:?} from any source"
        )))
    }
}

#[cfg(test)]
mod tests;
