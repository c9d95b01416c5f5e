//! Per-swatch matte compositing (§4.4), ported from `colorize.go`'s
//! `processSwatch`: a screen-blend composite of the grayscale separation
//! over a flat matte filled with the swatch's display RGB.

use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};

use crate::colormath::hex_to_rgb;
use crate::error::{DziError, Result};

/// Screen-blends one matte channel against one grayscale sample, both in
/// `0..=255`. `screen(a, b) = 255 - (255-a)(255-b)/255`.
pub fn screen_blend_channel(matte: u8, gray: u8) -> u8 {
    let inv_product = (255 - matte as u32) * (255 - gray as u32);
    (255 - inv_product / 255) as u8
}

pub fn screen_blend_pixel(matte: [u8; 3], gray: u8) -> [u8; 3] {
    [
        screen_blend_channel(matte[0], gray),
        screen_blend_channel(matte[1], gray),
        screen_blend_channel(matte[2], gray),
    ]
}

/// Composites a grayscale separation over a flat matte of `hex_rgb`.
pub fn composite_matte(gray: &GrayImage, hex_rgb: &str) -> Result<RgbImage> {
    let matte = hex_to_rgb(hex_rgb)
        .ok_or_else(|| DziError::invariant(format!("swatch RGB {hex_rgb:?} is not a valid #rrggbb value")))?;

    let mut out = RgbImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        out.put_pixel(x, y, Rgb(screen_blend_pixel(matte, pixel[0])));
    }
    Ok(out)
}

/// Runs the full per-swatch step: copies the grayscale source into the
/// B/W lane, then either writes the screen-blended PNG into the
/// colorized lane and returns its path as the new working filepath
/// (`needs_matte`), or removes the just-made B/W copy again since the
/// Final composite carries no B/W lane (§4.4 step 3).
pub fn colorize_swatch(
    source_path: &Path,
    needs_matte: bool,
    hex_rgb: &str,
    bw_dest: &Path,
    color_dest: &Path,
) -> Result<Option<std::path::PathBuf>> {
    if let Some(parent) = bw_dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    std::fs::copy(source_path, bw_dest).map_err(|e| DziError::io(source_path.to_path_buf(), e))?;

    if !needs_matte {
        std::fs::remove_file(bw_dest).map_err(|e| DziError::io(bw_dest.to_path_buf(), e))?;
        return Ok(None);
    }

    let gray = image::open(source_path)?.into_luma8();
    let composited = composite_matte(&gray, hex_rgb)?;

    if let Some(parent) = color_dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    composited.save(color_dest)?;
    std::fs::remove_file(source_path).map_err(|e| DziError::io(source_path.to_path_buf(), e))?;

    Ok(Some(color_dest.to_path_buf()))
}

#[cfg(test)]
mod tests;
