//! Raw raster image ingest (a supplemental feature grounded in
//! `extract_image.go`): a non-PDF raster input becomes a single
//! synthetic page. Unlike the vips-based original, which kept CMYK
//! rasters in their native colorspace, the `image` crate normalizes
//! every decoded raster to RGB(A) at load time, so this ingest path
//! always produces RGB-family swatches (see DESIGN.md).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::colorizer::screen_blend_pixel;
use crate::error::{DziError, Result};

pub const RGB_BAND_ORDER: [&str; 3] = ["Red", "Green", "Blue"];

/// Pure-primary display color for a band swatch, parallel to
/// `colormath::process_ink_default_rgb` for CMYK process inks.
pub fn band_default_rgb(name: &str) -> Option<[u8; 3]> {
    match name {
        "Red" => Some([255, 0, 0]),
        "Green" => Some([0, 255, 0]),
        "Blue" => Some([0, 0, 255]),
        "Alpha" => Some([255, 255, 255]),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct IngestedPage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub final_path: PathBuf,
    pub channel_paths: BTreeMap<String, PathBuf>,
}

/// Writes the Final composite swatch, converted to 8-bit sRGB.
pub fn write_final_composite(image: &DynamicImage, dest: &Path) -> Result<PathBuf> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
    }
    image.to_rgb8().save(dest)?;
    Ok(dest.to_path_buf())
}

/// Splits into per-band grayscale separations, inverted so 100% ink is
/// darkest (matching the Rasterizer's separation convention): Red,
/// Green, Blue always, plus Alpha when the source has a non-opaque pixel.
pub fn split_channels(image: &DynamicImage, basename: &str, output_dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| DziError::io(output_dir.to_path_buf(), e))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let has_alpha = rgba.pixels().any(|p| p[3] != 255);

    let mut names: Vec<&str> = RGB_BAND_ORDER.to_vec();
    if has_alpha {
        names.push("Alpha");
    }

    let mut paths = BTreeMap::new();
    for (band, name) in names.iter().enumerate() {
        let mut band_image: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        for (x, y, pixel) in rgba.enumerate_pixels() {
            band_image.put_pixel(x, y, Luma([255 - pixel[band]]));
        }
        let path = output_dir.join(format!("{basename}({name}).tiff"));
        band_image.save(&path)?;
        paths.insert(name.to_string(), path);
    }
    Ok(paths)
}

/// Full ingest for one raster file (§8 boundary scenario 5): writes the
/// Final composite and, when channel splitting is enabled, the per-band
/// separations.
pub fn ingest_image(image: &DynamicImage, basename: &str, output_dir: &Path, split_channels_enabled: bool) -> Result<IngestedPage> {
    let (pixel_width, pixel_height) = image.dimensions();
    let final_path = write_final_composite(image, &output_dir.join(format!("{basename}.tiff")))?;
    let channel_paths = if split_channels_enabled {
        split_channels(image, basename, output_dir)?
    } else {
        BTreeMap::new()
    };
    Ok(IngestedPage {
        pixel_width,
        pixel_height,
        final_path,
        channel_paths,
    })
}

fn multiply_blend_channel(acc: u8, matte: u8) -> u8 {
    (acc as u32 * matte as u32 / 255) as u8
}

/// Composite fallback (§9 supplemented feature 2), ported from
/// `rgbcompose.go`'s `rgbCompose`: when no native composite render
/// exists, build one by screen-compositing each separation under its
/// own ink color and multiply-blending the results together in order.
/// `separations` is `(grayscale separation, display RGB)` pairs; all
/// must share dimensions. Returns `None` for an empty slice.
pub fn compose_from_separations(separations: &[(GrayImage, [u8; 3])]) -> Option<RgbImage> {
    let (first_gray, _) = separations.first()?;
    let (width, height) = first_gray.dimensions();
    let mut acc = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (gray, rgb) in separations {
        for (x, y, pixel) in gray.enumerate_pixels() {
            let matte = screen_blend_pixel(*rgb, pixel[0]);
            let cur = *acc.get_pixel(x, y);
            acc.put_pixel(
                x,
                y,
                Rgb([
                    multiply_blend_channel(cur[0], matte[0]),
                    multiply_blend_channel(cur[1], matte[1]),
                    multiply_blend_channel(cur[2], matte[2]),
                ]),
            );
        }
    }
    Some(acc)
}

#[cfg(test)]
mod tests;
