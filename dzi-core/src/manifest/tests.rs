use super::*;
use crate::config::OverprintMode;

fn test_config() -> Config {
    Config {
        s3_host: String::new(),
        s3_key: String::new(),
        s3_secret: String::new(),
        s3_bucket: "dzi".to_string(),
        tile_size: 1024,
        overlap: 1,
        tile_format: "png".to_string(),
        tile_setting: String::new(),
        cover_height: 300,
        default_dpi: 600,
        min_resolution: 200,
        max_resolution: 1600,
        max_size_pixels: 15000,
        overprint: OverprintMode::Enable,
        graphics_alpha_bits: 4,
        icc_profile_path: String::new(),
        max_cpu_count: 4,
        debug: false,
        split_channels: true,
        copy_channels: false,
        extract_text: true,
        libreoffice_path: "soffice".to_string(),
    }
}

fn page(page_num: u32, channels: &[&str]) -> ManifestPage {
    ManifestPage {
        page_num,
        size: DziSize {
            width: 100.0,
            height: 150.0,
            units: "mm".to_string(),
            dpi: 600,
        },
        text_content: String::new(),
        channels: channels.iter().map(|s| s.to_string()).collect(),
        channels_v4: Vec::new(),
    }
}

fn asset() -> Asset {
    Asset {
        id: 42,
        source_url: "https://example.com/art.pdf".to_string(),
        filename: "art.pdf".to_string(),
        basename: "abc123".to_string(),
        extension: "pdf".to_string(),
    }
}

#[test]
fn relative_to_scratch_strips_the_scratch_root_prefix() {
    let root = Path::new("/tmp/scratch/abc123");
    let path = Path::new("/tmp/scratch/abc123/page_1/Color.zip");
    assert_eq!(relative_to_scratch(root, path), "page_1/Color.zip");
}

#[test]
fn relative_to_scratch_leaves_unrelated_paths_untouched() {
    let root = Path::new("/tmp/scratch/abc123");
    let path = Path::new("/var/other/Color.zip");
    assert_eq!(relative_to_scratch(root, path), path.to_string_lossy());
}

#[test]
fn build_manifest_deduplicates_and_sorts_the_global_swatch_list() {
    let pages = vec![
        page(1, &["Color", "Cyan", "Magenta"]),
        page(2, &["Color", "Cyan", "PANTONE 185 C"]),
    ];
    let manifest = build_manifest(&asset(), pages, &test_config(), "pdf", "2026-07-28T00:00:00Z", "2026-07-28T00:01:00Z");

    assert_eq!(manifest.swatches, vec!["Color", "Cyan", "Magenta", "PANTONE 185 C"]);
    assert_eq!(manifest.version, MANIFEST_VERSION);
    assert_eq!(manifest.tile_size, 1024);
}

#[test]
fn manifest_json_round_trips_and_preserves_page_count() {
    let pages = vec![page(1, &["Color"]), page(2, &["Color"])];
    let manifest = build_manifest(&asset(), pages, &test_config(), "pdf", "start", "end");

    let json = to_json(&manifest).unwrap();
    let reparsed = from_json(&json).unwrap();

    assert_eq!(reparsed.pages.len(), 2);
    assert_eq!(reparsed.basename, "abc123");
    assert!(page_numbers_are_contiguous(&reparsed));
}

#[test]
fn page_numbers_are_contiguous_rejects_gaps_and_out_of_order_pages() {
    let mut manifest = build_manifest(&asset(), vec![page(1, &[]), page(2, &[])], &test_config(), "pdf", "s", "e");
    assert!(page_numbers_are_contiguous(&manifest));

    manifest.pages[1].page_num = 3;
    assert!(!page_numbers_are_contiguous(&manifest));
}

#[test]
fn channel_v4_serializes_optional_paths_as_null_when_absent() {
    let channel = ChannelV4 {
        name: "Cyan".to_string(),
        dzi_color_path: Some("page_1/Cyan.zip".to_string()),
        dzi_bw_path: None,
        lead_path: None,
        lead1000_path: None,
        cover_path: None,
        color_ranges: BTreeMap::new(),
        bw_ranges_path: Some("ranges/bw_1_Cyan.json".to_string()),
    };
    let json = serde_json::to_string(&channel).unwrap();
    assert!(json.contains("\"dzi_bw_path\":null"));
    assert!(json.contains("\"page_1/Cyan.zip\""));
}
