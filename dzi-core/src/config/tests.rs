use super::*;
use std::sync::Mutex;

// Config::from_env reads process-wide environment state; serialize tests
// that touch it so they don't race each other.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn defaults_match_spec() {
    let _guard = ENV_LOCK.lock().unwrap();
    for key in [
        "DZI_TILE_SIZE",
        "DZI_OVERLAP",
        "DZI_TILE_FORMAT",
        "DZI_COVER_H",
        "DZI_RESOLUTION",
        "DZI_MIN_RESOLUTION",
        "DZI_MAX_RESOLUTION",
        "MAX_SIZE_PIXELS",
        "DZI_OVERPRINT",
        "MAX_CPU_COUNT",
        "DZI_DEBUG",
        "DZI_SPLIT_CHANNELS",
        "DZI_BUCKET",
    ] {
        env::remove_var(key);
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.tile_size, 1024);
    assert_eq!(cfg.overlap, 1);
    assert_eq!(cfg.tile_format, "png");
    assert_eq!(cfg.cover_height, 300);
    assert_eq!(cfg.default_dpi, 600);
    assert_eq!(cfg.min_resolution, 200);
    assert_eq!(cfg.max_resolution, 1600);
    assert_eq!(cfg.max_size_pixels, 15000);
    assert_eq!(cfg.overprint, OverprintMode::Enable);
    assert_eq!(cfg.max_cpu_count, 4);
    assert!(!cfg.debug);
    assert!(cfg.split_channels);
    assert_eq!(cfg.s3_bucket, "dzi");
}

#[test]
fn rejects_bad_overprint() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("DZI_OVERPRINT", "/garbage");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, DziError::Input(_)));
    env::remove_var("DZI_OVERPRINT");
}

#[test]
fn rejects_non_numeric_tile_size() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("DZI_TILE_SIZE", "not-a-number");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, DziError::Input(_)));
    env::remove_var("DZI_TILE_SIZE");
}

#[test]
fn presentation_branch_lowers_limits() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("MAX_SIZE_PIXELS");
    env::remove_var("DZI_MAX_RESOLUTION");
    env::remove_var("DZI_SPLIT_CHANNELS");
    let cfg = Config::from_env().unwrap().for_presentation_branch();
    assert_eq!(cfg.max_size_pixels, 5000);
    assert_eq!(cfg.max_resolution, 600);
    assert!(!cfg.split_channels);
}
