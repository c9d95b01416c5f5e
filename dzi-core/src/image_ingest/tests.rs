use super::*;
use image::Rgba;

fn opaque_image(width: u32, height: u32) -> DynamicImage {
    let mut buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (x, y, pixel) in buf.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 10) as u8, (y * 10) as u8, 50, 255]);
    }
    DynamicImage::ImageRgba8(buf)
}

#[test]
fn ingest_image_without_alpha_produces_rgb_bands_only() {
    let dir = tempfile::tempdir().unwrap();
    let image = opaque_image(4, 3);

    let page = ingest_image(&image, "page_1", dir.path(), true).unwrap();

    assert_eq!(page.pixel_width, 4);
    assert_eq!(page.pixel_height, 3);
    assert!(page.final_path.exists());
    assert_eq!(page.channel_paths.len(), 3);
    assert!(page.channel_paths.contains_key("Red"));
    assert!(page.channel_paths.contains_key("Green"));
    assert!(page.channel_paths.contains_key("Blue"));
    assert!(!page.channel_paths.contains_key("Alpha"));
}

#[test]
fn ingest_image_with_transparency_adds_an_alpha_band() {
    let dir = tempfile::tempdir().unwrap();
    let mut buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(2, 2);
    buf.put_pixel(0, 0, Rgba([10, 20, 30, 128]));
    buf.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
    buf.put_pixel(0, 1, Rgba([10, 20, 30, 255]));
    buf.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
    let image = DynamicImage::ImageRgba8(buf);

    let page = ingest_image(&image, "page_1", dir.path(), true).unwrap();
    assert_eq!(page.channel_paths.len(), 4);
    assert!(page.channel_paths.contains_key("Alpha"));
}

#[test]
fn split_channels_inverts_samples_so_strong_ink_is_dark() {
    let dir = tempfile::tempdir().unwrap();
    let mut buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(1, 1);
    buf.put_pixel(0, 0, Rgba([200, 0, 255, 255]));
    let image = DynamicImage::ImageRgba8(buf);

    let paths = split_channels(&image, "page_1", dir.path()).unwrap();
    let red = image::open(&paths["Red"]).unwrap().to_luma8();
    let blue = image::open(&paths["Blue"]).unwrap().to_luma8();
    assert_eq!(red.get_pixel(0, 0)[0], 255 - 200);
    assert_eq!(blue.get_pixel(0, 0)[0], 255 - 255);
}

#[test]
fn split_channels_skips_compositing_without_split_requested() {
    let dir = tempfile::tempdir().unwrap();
    let image = opaque_image(2, 2);
    let page = ingest_image(&image, "page_1", dir.path(), false).unwrap();
    assert!(page.channel_paths.is_empty());
}

#[test]
fn compose_from_separations_returns_none_for_an_empty_slice() {
    assert!(compose_from_separations(&[]).is_none());
}

#[test]
fn compose_from_separations_multiplies_full_ink_channels_to_black() {
    // Two fully-inked (gray=0, i.e. 100% ink) separations under pure
    // cyan and pure magenta should multiply down toward black, not
    // just average the two ink colors.
    let cyan = GrayImage::from_pixel(2, 2, Luma([0]));
    let magenta = GrayImage::from_pixel(2, 2, Luma([0]));
    let composed = compose_from_separations(&[(cyan, [0, 174, 239]), (magenta, [236, 0, 140])]).unwrap();
    let pixel = composed.get_pixel(0, 0);
    assert!(pixel[0] < 10 && pixel[1] < 10 && pixel[2] < 150);
}

#[test]
fn compose_from_separations_with_no_ink_stays_white() {
    let blank = GrayImage::from_pixel(2, 2, Luma([255]));
    let composed = compose_from_separations(&[(blank, [0, 174, 239])]).unwrap();
    assert_eq!(*composed.get_pixel(0, 0), image::Rgb([255, 255, 255]));
}

#[test]
fn band_default_rgb_covers_the_canonical_rgb_plus_alpha_names() {
    assert_eq!(band_default_rgb("Red"), Some([255, 0, 0]));
    assert_eq!(band_default_rgb("Green"), Some([0, 255, 0]));
    assert_eq!(band_default_rgb("Blue"), Some([0, 0, 255]));
    assert_eq!(band_default_rgb("Alpha"), Some([255, 255, 255]));
    assert_eq!(band_default_rgb("Cyan"), None);
}
