//! External Ghostscript rasterization contract (§4.2), grounded in
//! `renderpdf.go`'s `callGS`/`getPagesDimensions` for the interpreter
//! invocation shape and `extract_pdf.go`'s `pageProcessing` for the
//! post-render filename repair and collision fix-up.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::colormath::cmyk_to_rgb;
use crate::config::{Config, OverprintMode};
use crate::error::{DziError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One grayscale raster per ink, via Ghostscript's `tiffsep` device.
    Separated,
    /// One full-color raster, via `tiff32nc` or `png16m`.
    Composite,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub ink_files: BTreeMap<String, PathBuf>,
    pub recovered_spots_rgb: BTreeMap<String, [u8; 3]>,
}

/// A page's effective render parameters, computed by `page_geometry`.
#[derive(Debug, Clone, Copy)]
pub struct RenderTarget {
    pub page_number: u32,
    pub dpi: u32,
    pub point_width: f64,
    pub point_height: f64,
    pub spot_count: u32,
}

/// Narrow external-collaborator capability: anything that can turn one
/// PDF page into ink-separated and composite rasters. The default
/// adapter shells out to Ghostscript; tests substitute a stub.
pub trait Rasterizer {
    fn render_page(
        &self,
        pdf_path: &Path,
        target: RenderTarget,
        output_dir: &Path,
        basename: &str,
        config: &Config,
    ) -> Result<RenderedPage>;
}

/// Default adapter: invokes `gs` twice per page, once per §4.2 mode.
pub struct GhostscriptRasterizer {
    pub gs_path: String,
}

impl Default for GhostscriptRasterizer {
    fn default() -> Self {
        Self {
            gs_path: "gs".to_string(),
        }
    }
}

impl GhostscriptRasterizer {
    fn common_args(target: RenderTarget, config: &Config) -> Vec<String> {
        vec![
            "-q".into(),
            "-dBATCH".into(),
            "-dNOPAUSE".into(),
            "-dSAFER".into(),
            "-dSubsetFonts=true".into(),
            "-dMaxBitmap=500000000".into(),
            "-dAlignToPixels=0".into(),
            "-dGridFitTT=2".into(),
            "-dTextAlphaBits=4".into(),
            format!("-dGraphicsAlphaBits={}", config.graphics_alpha_bits),
            format!("-dMaxSpots={}", target.spot_count + 4),
            format!("-dFirstPage={}", target.page_number),
            format!("-dLastPage={}", target.page_number),
            format!("-r{}", target.dpi),
            format!("-dDEVICEWIDTHPOINTS={:.2}", target.point_width),
            format!("-dDEVICEHEIGHTPOINTS={:.2}", target.point_height),
        ]
    }

    fn run(&self, args: &[String], pdf_path: &Path) -> Result<String> {
        let output = Command::new(&self.gs_path)
            .args(args)
            .arg(pdf_path)
            .output()
            .map_err(|e| DziError::tool("gs", e.to_string()))?;
        if !output.status.success() {
            return Err(DziError::tool(
                "gs",
                format!(
                    "exit status {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                ),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Rasterizer for GhostscriptRasterizer {
    fn render_page(
        &self,
        pdf_path: &Path,
        target: RenderTarget,
        output_dir: &Path,
        basename: &str,
        config: &Config,
    ) -> Result<RenderedPage> {
        std::fs::create_dir_all(output_dir).map_err(|e| DziError::io(output_dir.to_path_buf(), e))?;

        let mut stdout = String::new();

        if config.split_channels {
            let output_file = output_dir.join(format!("{basename}.tiff"));
            let mut args = Self::common_args(target, config);
            args.push(format!("-dOverprint={}", config.overprint.as_ps_literal()));
            args.push("-sDEVICE=tiffsep".into());
            args.push(format!("-sOutputFile={}", output_file.display()));
            stdout.push_str(&self.run(&args, pdf_path)?);
        }

        let composite_device = if config.split_channels { "tiff32nc" } else { "png16m" };
        let composite_ext = if config.split_channels { "tiff" } else { "png" };
        let composite_overprint = match config.overprint {
            OverprintMode::Simulate => OverprintMode::Simulate,
            _ => OverprintMode::Disable,
        };
        let composite_file = output_dir.join(format!("{basename}.{composite_ext}"));
        let mut args = Self::common_args(target, config);
        args.push(format!("-dOverprint={}", composite_overprint.as_ps_literal()));
        args.push(format!("-sDEVICE={composite_device}"));
        args.push(format!("-sOutputFile={}", composite_file.display()));
        stdout.push_str(&self.run(&args, pdf_path)?);

        repair_output_folder(output_dir, basename, &stdout)
    }
}

static SEPARATION_COLOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"%%SeparationColor:\s*"([^"]+)"\s*ink\s*=\s*(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s*CMYK"#)
        .expect("static regex must compile")
});

static PARENTHESIZED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*)\)").expect("static regex must compile"));

const PROCESS_NAMES: [&str; 4] = ["black", "cyan", "yellow", "magenta"];

/// Scans Ghostscript's stdout for `%%SeparationColor` lines and recovers
/// each named ink's display RGB from its reported CMYK tint (0..=32760).
pub fn parse_recovered_spots(stdout: &str) -> BTreeMap<String, [u8; 3]> {
    let mut recovered = BTreeMap::new();
    for caps in SEPARATION_COLOR_LINE.captures_iter(stdout) {
        let name = caps[1].to_string();
        let to_pct = |i: usize| -> f64 { caps[i].parse::<f64>().unwrap_or(0.0) / 32760.0 * 100.0 };
        let rgb = cmyk_to_rgb(to_pct(2), to_pct(3), to_pct(4), to_pct(5));
        recovered.insert(name, rgb);
    }
    recovered
}

/// Percent-decodes a filename component, falling back to CP1251 when the
/// decoded bytes aren't valid UTF-8, then replaces filesystem-hostile
/// slashes. Mirrors `url.QueryUnescape` + `charmap.Windows1251.Decode`.
pub fn repair_ink_name(raw: &str) -> String {
    let decoded_bytes: Vec<u8> = percent_encoding::percent_decode_str(raw).collect();
    let name = match String::from_utf8(decoded_bytes.clone()) {
        Ok(s) => s,
        Err(_) => {
            let (cow, _, _) = encoding_rs::WINDOWS_1251.decode(&decoded_bytes);
            cow.into_owned()
        }
    };
    name.replace('/', "-")
}

/// Extracts the ink name from a basename's parenthesized suffix, e.g.
/// `"art(PANTONE 185 C).tiff"` → `Some("PANTONE 185 C")`. `None` means
/// this file is the unsuffixed composite render.
pub fn extract_parenthesized_name(stem: &str) -> Option<String> {
    PARENTHESIZED_SUFFIX
        .captures(stem)
        .map(|c| c[1].to_string())
}

/// Strips a trailing digit run appended to a process-ink name so that a
/// second "black" layer (emitted as `black1`, `black2`, ...) still maps
/// back to the CMYK `Black` channel instead of becoming a bogus spot.
pub fn strip_process_collision_suffix(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    for process in PROCESS_NAMES {
        if let Some(postfix) = lower.strip_prefix(process) {
            if !postfix.is_empty() && postfix.bytes().all(|b| b.is_ascii_digit()) {
                return name[..name.len() - postfix.len()].to_string();
            }
        }
    }
    name.to_string()
}

fn repair_output_folder(output_dir: &Path, basename: &str, stdout: &str) -> Result<RenderedPage> {
    let mut ink_files = BTreeMap::new();
    let entries = std::fs::read_dir(output_dir).map_err(|e| DziError::io(output_dir.to_path_buf(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| DziError::io(output_dir.to_path_buf(), e))?;
        let original_path = entry.path();
        let Some(file_name) = original_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let repaired_name = repair_ink_name(file_name);
        let final_path = if repaired_name != file_name {
            let target = output_dir.join(&repaired_name);
            std::fs::rename(&original_path, &target)
                .map_err(|e| DziError::io(original_path.clone(), e))?;
            target
        } else {
            original_path
        };

        let stem = final_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let ink_name = match extract_parenthesized_name(stem) {
            Some(name) => strip_process_collision_suffix(&name),
            None if stem == basename => "Color".to_string(),
            None => continue,
        };

        ink_files.insert(ink_name, final_path);
    }

    Ok(RenderedPage {
        ink_files,
        recovered_spots_rgb: parse_recovered_spots(stdout),
    })
}
