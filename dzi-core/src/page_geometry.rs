//! Adaptive per-page DPI and pixel-size computation (§4.1), ported from
//! `render_pdf.go`/`renderpdf.go`'s `getPagesDimensions`.
//!
//! The canonical rule resolves two ambiguities the Go iterations disagreed
//! on (§9 Design Notes): an overflowing side's replacement DPI is always
//! computed from *that side's own* inches (never the other side's), and
//! unit conversion for centimeters is `× 10`.

use crate::config::Config;
use crate::data::PageGeometry;

const PT_TO_IN: f64 = 1.0 / 72.0;

/// Computes effective DPI and pixel dimensions for one page.
///
/// `point_width`/`point_height` are the page's media-box extents in
/// PostScript points, pre-rotation. `rotation` is one of 0/90/180/270.
pub fn compute(point_width: f64, point_height: f64, rotation: i32, config: &Config) -> PageGeometry {
    let (pt_w, pt_h) = if rotation.rem_euclid(360) == 90 || rotation.rem_euclid(360) == 270 {
        (point_height, point_width)
    } else {
        (point_width, point_height)
    };

    let inch_width = pt_w * PT_TO_IN;
    let inch_height = pt_h * PT_TO_IN;

    let mut dpi = config.default_dpi as f64;
    let max_px = config.max_size_pixels as f64;

    let width_px0 = inch_width * dpi;
    let height_px0 = inch_height * dpi;

    let mut recalc = false;

    // Downscale: either side overflowing MaxSizePixels. Width is computed
    // first and wins ties; height only overrides if strictly smaller.
    if width_px0 > max_px {
        dpi = max_px / inch_width;
        recalc = true;
    }
    if height_px0 > max_px {
        let height_dpi = max_px / inch_height;
        if !recalc || height_dpi < dpi {
            dpi = height_dpi;
        }
        recalc = true;
    }

    // Upscale: neither side overflowed and the page is still short of
    // MaxSizePixels — push the wider side up to it so small pages still
    // feed a useful pyramid depth.
    if !recalc {
        let wider_is_width = inch_width >= inch_height;
        let (wider_inches, wider_px) = if wider_is_width {
            (inch_width, width_px0)
        } else {
            (inch_height, height_px0)
        };
        if wider_px < max_px {
            dpi = max_px / wider_inches;
            recalc = true;
        }
    }

    if (dpi as u32) < config.min_resolution {
        dpi = config.min_resolution as f64;

        // Degenerate-aspect safety: extreme pathological ratios at low DPI
        // can still blow past MaxSizePixels by a factor of ~3; shrink once
        // more rather than emit an unusable multi-gigapixel raster.
        if inch_width * dpi / 3.0 > max_px || inch_height * dpi / 3.0 > max_px {
            dpi /= 3.0;
        }
    }
    if (dpi as u32) > config.max_resolution {
        dpi = config.max_resolution as f64;
    }

    let effective_dpi = dpi as u32;
    let pixel_width = (inch_width * dpi) as u32;
    let pixel_height = (inch_height * dpi) as u32;

    PageGeometry {
        point_width: pt_w,
        point_height: pt_h,
        inch_width,
        inch_height,
        pixel_width,
        pixel_height,
        effective_dpi,
        rotation,
    }
}

#[cfg(test)]
mod tests;
