use super::*;
use image::Luma;

#[test]
fn screen_blend_with_black_matte_preserves_gray_value() {
    assert_eq!(screen_blend_channel(0, 128), 128);
    assert_eq!(screen_blend_channel(0, 0), 0);
    assert_eq!(screen_blend_channel(0, 255), 255);
}

#[test]
fn screen_blend_with_white_matte_is_always_white() {
    assert_eq!(screen_blend_channel(255, 0), 255);
    assert_eq!(screen_blend_channel(255, 200), 255);
}

#[test]
fn screen_blend_is_commutative_in_its_lightening_effect() {
    // screen(a,b) == screen(b,a): the operation is symmetric.
    assert_eq!(screen_blend_channel(60, 90), screen_blend_channel(90, 60));
}

#[test]
fn composite_matte_applies_the_swatch_color_to_every_pixel() {
    let mut gray = GrayImage::new(2, 2);
    gray.put_pixel(0, 0, Luma([0]));
    gray.put_pixel(1, 0, Luma([255]));
    gray.put_pixel(0, 1, Luma([128]));
    gray.put_pixel(1, 1, Luma([64]));

    let rgb = composite_matte(&gray, "#ff0000").unwrap();
    assert_eq!(*rgb.get_pixel(0, 0), Rgb([255, 0, 0]));
    assert_eq!(*rgb.get_pixel(1, 0), Rgb([255, 255, 255]));
}

#[test]
fn composite_matte_rejects_malformed_hex() {
    let gray = GrayImage::new(1, 1);
    assert!(composite_matte(&gray, "not-a-color").is_err());
}

#[test]
fn colorize_swatch_writes_bw_copy_and_colorized_png_when_matte_is_needed() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.tiff");
    let mut gray = GrayImage::new(4, 4);
    for p in gray.pixels_mut() {
        *p = Luma([200]);
    }
    gray.save(&source).unwrap();

    let bw_dest = dir.path().join("bw").join("source.tiff");
    let color_dest = dir.path().join("color").join("source.png");

    let new_path = colorize_swatch(&source, true, "#00ff00", &bw_dest, &color_dest).unwrap();

    assert!(bw_dest.exists());
    assert!(color_dest.exists());
    assert!(!source.exists(), "original grayscale should be removed after compositing");
    assert_eq!(new_path, Some(color_dest));
}

#[test]
fn colorize_swatch_skips_compositing_for_the_final_composite() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.tiff");
    GrayImage::new(2, 2).save(&source).unwrap();

    let bw_dest = dir.path().join("bw").join("source.tiff");
    let color_dest = dir.path().join("color").join("source.png");

    let new_path = colorize_swatch(&source, false, "", &bw_dest, &color_dest).unwrap();

    assert!(!bw_dest.exists(), "final composite has no B/W lane");
    assert!(!color_dest.exists());
    assert!(source.exists(), "final composite source is untouched");
    assert_eq!(new_path, None);
}
