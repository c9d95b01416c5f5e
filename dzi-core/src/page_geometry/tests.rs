use super::*;
use crate::config::OverprintMode;

fn config(default_dpi: u32, min_resolution: u32, max_resolution: u32, max_size_pixels: u32) -> Config {
    Config {
        s3_host: String::new(),
        s3_key: String::new(),
        s3_secret: String::new(),
        s3_bucket: "dzi".into(),
        tile_size: 1024,
        overlap: 1,
        tile_format: "png".into(),
        tile_setting: String::new(),
        cover_height: 300,
        default_dpi,
        min_resolution,
        max_resolution,
        max_size_pixels,
        overprint: OverprintMode::Enable,
        graphics_alpha_bits: 4,
        icc_profile_path: String::new(),
        max_cpu_count: 4,
        debug: false,
        split_channels: true,
        copy_channels: false,
        extract_text: true,
        libreoffice_path: "soffice".into(),
    }
}

fn mm_to_pt(mm: f64) -> f64 {
    mm / 25.4 * 72.0
}

#[test]
fn oversized_page_downscales_to_fit_max_size_pixels() {
    let cfg = config(600, 200, 1600, 15000);
    let geo = compute(mm_to_pt(1000.0), mm_to_pt(1000.0), 0, &cfg);

    assert!(geo.pixel_width <= 15000);
    assert!(geo.pixel_height <= 15000);
    // Within a pixel of the exact target on the constraining side.
    assert!(geo.pixel_width >= 14999);
    assert!(geo.effective_dpi < 600);
}

#[test]
fn tiny_page_upscales_and_then_clamps_to_max_resolution() {
    let cfg = config(600, 200, 1600, 15000);
    let geo = compute(mm_to_pt(20.0), mm_to_pt(20.0), 0, &cfg);

    assert_eq!(geo.effective_dpi, 1600);
    assert_eq!(geo.pixel_width, 1259);
    assert_eq!(geo.pixel_height, 1259);
}

#[test]
fn ninety_degree_rotation_swaps_extents() {
    let cfg = config(600, 200, 1600, 15000);
    let unrotated = compute(mm_to_pt(100.0), mm_to_pt(150.0), 0, &cfg);
    let rotated = compute(mm_to_pt(100.0), mm_to_pt(150.0), 90, &cfg);

    assert_eq!(unrotated.pixel_width, rotated.pixel_height);
    assert_eq!(unrotated.pixel_height, rotated.pixel_width);
}

#[test]
fn effective_dpi_is_always_within_configured_bounds() {
    let cfg = config(600, 200, 1600, 15000);
    for (w_mm, h_mm) in [(20.0, 20.0), (1000.0, 1000.0), (100.0, 150.0), (5.0, 2000.0)] {
        let geo = compute(mm_to_pt(w_mm), mm_to_pt(h_mm), 0, &cfg);
        assert!(geo.effective_dpi >= cfg.min_resolution, "dpi below min for {w_mm}x{h_mm}");
        assert!(geo.effective_dpi <= cfg.max_resolution, "dpi above max for {w_mm}x{h_mm}");
    }
}

#[test]
fn downscale_tie_break_prefers_width_unless_height_strictly_smaller() {
    // A square page: both sides overflow identically, so the width-first
    // computation and the height override land on the same DPI either way.
    let cfg = config(600, 200, 1600, 5000);
    let geo = compute(mm_to_pt(500.0), mm_to_pt(500.0), 0, &cfg);
    assert_eq!(geo.pixel_width, geo.pixel_height);
}

#[test]
fn degenerate_aspect_ratio_triggers_the_divide_by_three_safety_rule() {
    // A 1in x 80in strip: downscale alone lands at 187.5 DPI, below the
    // configured minimum, so the min-clamp pushes it back to 600 DPI —
    // which would blow the long side out to 48000px. The safety rule
    // should catch that and divide DPI by 3 once more.
    let cfg = config(600, 600, 20000, 15000);
    let geo = compute(72.0, 80.0 * 72.0, 0, &cfg);

    assert_eq!(geo.effective_dpi, 200);
    assert_eq!(geo.pixel_width, 200);
    assert_eq!(geo.pixel_height, 16000);
}
