use super::*;
use crate::pyramidizer::{build_pyramid_zip, TilerConfig};
use image::{DynamicImage, Rgb};

fn sample_image(width: u32, height: u32) -> DynamicImage {
    let mut buf = image::RgbImage::new(width, height);
    for (x, y, pixel) in buf.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, 64]);
    }
    DynamicImage::ImageRgb8(buf)
}

#[test]
fn select_level_prefers_the_smallest_level_that_meets_the_width_threshold() {
    let mut levels = BTreeMap::new();
    levels.insert(0, vec![(0, 0, "0/0_0.png".to_string())]);
    levels.insert(
        1,
        vec![
            (0, 0, "1/0_0.png".to_string()),
            (0, 1, "1/0_1.png".to_string()),
            (1, 0, "1/1_0.png".to_string()),
            (1, 1, "1/1_1.png".to_string()),
        ],
    );
    // level 1 has two col==0 tiles -> reconstructed width 2*1024 = 2048 >= 2000
    assert_eq!(select_level(&levels, 1024), Some(1));
}

#[test]
fn select_level_falls_back_to_the_largest_level_when_none_reach_the_threshold() {
    let mut levels = BTreeMap::new();
    levels.insert(0, vec![(0, 0, "0/0_0.png".to_string())]);
    levels.insert(1, vec![(0, 0, "1/0_0.png".to_string())]);
    assert_eq!(select_level(&levels, 16), Some(1));
}

#[test]
fn parse_tile_entry_extracts_level_col_row() {
    assert_eq!(
        parse_tile_entry("3/0_0.png"),
        Some((3, (0, 0, "3/0_0.png".to_string())))
    );
    assert_eq!(parse_tile_entry("weird"), None);
    assert_eq!(parse_tile_entry("notanumber/0_0.png"), None);
}

#[test]
fn build_cover_produces_a_lead_and_a_cover_with_matching_aspect_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("swatch.zip");
    let config = TilerConfig {
        tile_size: 32,
        overlap: 1,
        format: "png".to_string(),
    };
    build_pyramid_zip(&sample_image(130, 90), "swatch", &config, &zip_path).unwrap();

    let lead_dest = dir.path().join("lead.png");
    let lead1000_dest = dir.path().join("lead1000.png");
    let cover_dest = dir.path().join("cover.png");
    build_cover(&zip_path, 32, 40, &lead_dest, &lead1000_dest, &cover_dest).unwrap();

    assert!(lead_dest.exists());
    assert!(lead1000_dest.exists());
    assert!(cover_dest.exists());

    let lead = image::open(&lead_dest).unwrap();
    let cover = image::open(&cover_dest).unwrap();
    assert_eq!(cover.height(), 40);

    let lead_aspect = lead.width() as f64 / lead.height() as f64;
    let cover_aspect = cover.width() as f64 / cover.height() as f64;
    assert!((lead_aspect - cover_aspect).abs() < 0.05);
}

#[test]
fn make_lead1000_caps_the_longer_side_and_preserves_aspect() {
    let lead = RgbImage::new(4000, 2000);
    let lead1000 = make_lead1000(&lead);
    assert_eq!(lead1000.width(), 1000);
    assert_eq!(lead1000.height(), 500);
}

#[test]
fn make_lead1000_passes_through_when_already_small() {
    let lead = RgbImage::new(400, 200);
    let lead1000 = make_lead1000(&lead);
    assert_eq!((lead1000.width(), lead1000.height()), (400, 200));
}
