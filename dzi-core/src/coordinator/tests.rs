use super::*;

fn pool() -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap()
}

#[test]
fn run_bounded_collects_every_result_in_order_of_completion() {
    let p = pool();
    let results = run_bounded(&p, vec![1, 2, 3, 4], |x| Ok::<_, DziError>(x * 2)).unwrap();
    let mut sorted = results;
    sorted.sort_unstable();
    assert_eq!(sorted, vec![2, 4, 6, 8]);
}

#[test]
fn run_bounded_drains_the_pool_before_surfacing_the_first_error() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let p = pool();
    let completed = Arc::new(AtomicUsize::new(0));
    let completed_ref = completed.clone();

    let result = run_bounded(&p, vec![1, 2, 3, 4, 5], move |x| {
        completed_ref.fetch_add(1, Ordering::SeqCst);
        if x == 3 {
            Err(DziError::invariant("boom"))
        } else {
            Ok(x)
        }
    });

    assert!(result.is_err());
    assert_eq!(completed.load(Ordering::SeqCst), 5);
}

#[test]
fn run_bounded_turns_a_panic_into_a_worker_panic_error() {
    let p = pool();
    let result = run_bounded(&p, vec![1], |_| -> Result<i32> { panic!("worker exploded") });
    match result {
        Err(DziError::WorkerPanic(msg)) => assert!(msg.contains("worker exploded")),
        other => panic!("expected WorkerPanic, got {other:?}"),
    }
}

#[test]
fn canonical_order_key_puts_process_inks_before_spots_alphabetically() {
    let mut names = vec!["PANTONE 185 C", "Black", "Yellow", "Cyan", "Magenta", "Varnish"];
    names.sort_by_key(|n| canonical_order_key(n, IngestMode::Pdf));
    assert_eq!(names, vec!["Cyan", "Magenta", "Yellow", "Black", "PANTONE 185 C", "Varnish"]);
}

#[test]
fn canonical_order_key_orders_rgb_bands_red_green_blue_alpha() {
    let mut names = vec!["Alpha", "Blue", "Red", "Green"];
    names.sort_by_key(|n| canonical_order_key(n, IngestMode::Image));
    assert_eq!(names, vec!["Red", "Green", "Blue", "Alpha"]);
}

fn spot_swatch(name: &str) -> Swatch {
    Swatch {
        name: name.to_string(),
        ops_name: name.to_string(),
        swatch_type: SwatchType::SpotComponent,
        rgb: "#000000".to_string(),
        needs_matte: true,
        working_filepath: None,
        dzi_color_path: None,
        dzi_bw_path: None,
        lead_path: None,
        lead1000_path: None,
        cover_path: None,
        color_ranges: BTreeMap::new(),
        bw_ranges_path: None,
    }
}

#[test]
fn order_swatches_places_color_first_then_rgb_bands_for_image_mode() {
    let mut swatches = vec![
        spot_swatch("Blue"),
        Swatch::new_final(PathBuf::from("Color.tiff")),
        spot_swatch("Green"),
        spot_swatch("Red"),
    ];
    order_swatches(&mut swatches, IngestMode::Image);
    let names: Vec<&str> = swatches.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "Red", "Green", "Blue"]);
}

#[test]
fn order_swatches_places_color_first_then_cmyk_channels_for_pdf_mode() {
    let mut swatches = vec![
        spot_swatch("Black"),
        spot_swatch("PANTONE 185 C"),
        Swatch::new_final(PathBuf::from("Color.tiff")),
        spot_swatch("Cyan"),
        spot_swatch("Magenta"),
        spot_swatch("Yellow"),
    ];
    order_swatches(&mut swatches, IngestMode::Pdf);
    let names: Vec<&str> = swatches.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "Cyan", "Magenta", "Yellow", "Black", "PANTONE 185 C"]);
}

#[test]
fn materialize_color_source_converts_tiff_to_quality95_jpeg_and_removes_source() {
    let dir = tempfile::tempdir().unwrap();
    let tiff_path = dir.path().join("Color.tiff");
    let img = image::RgbImage::from_fn(4, 4, |x, y| image::Rgb([x as u8 * 10, y as u8 * 10, 0]));
    image::DynamicImage::ImageRgb8(img).save(&tiff_path).unwrap();

    let swatch = Swatch::new_final(tiff_path.clone());
    let result_path = materialize_color_source(&swatch, "").unwrap();

    assert_eq!(result_path.extension().unwrap(), "jpg");
    assert!(result_path.exists());
    assert!(!tiff_path.exists());
}

#[test]
fn materialize_color_source_leaves_non_tiff_sources_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let png_path = dir.path().join("Cyan.png");
    std::fs::write(&png_path, b"not really a png but untouched").unwrap();

    let swatch = Swatch::new_final(png_path.clone());
    let result_path = materialize_color_source(&swatch, "").unwrap();

    assert_eq!(result_path, png_path);
    assert!(png_path.exists());
}

#[test]
fn to_manifest_page_strips_scratch_root_prefix_from_paths() {
    let dir = tempfile::tempdir().unwrap();
    let mut swatch = Swatch::new_final(dir.path().join("channels/page_1/Color.png"));
    swatch.dzi_color_path = Some(dir.path().join("dzi/page_1/Color.zip"));

    let page = Page {
        page_number: 1,
        width: 100.0,
        height: 150.0,
        unit: Unit::Mm,
        effective_dpi: 600,
        rotation: 0,
        text_content: "hello".to_string(),
        swatches: vec![swatch],
    };

    let manifest_page = to_manifest_page(page, dir.path());
    assert_eq!(manifest_page.page_num, 1);
    assert_eq!(manifest_page.channels, vec!["Color".to_string()]);
    assert_eq!(manifest_page.channels_v4[0].dzi_color_path.as_deref(), Some("dzi/page_1/Color.zip"));
}
