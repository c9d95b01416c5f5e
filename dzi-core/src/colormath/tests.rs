use super::*;

#[test]
fn cmyk_pure_black_is_dark() {
    let rgb = cmyk_to_rgb(0.0, 0.0, 0.0, 100.0);
    assert_eq!(rgb, [0, 0, 0]);
}

#[test]
fn cmyk_no_ink_is_white() {
    let rgb = cmyk_to_rgb(0.0, 0.0, 0.0, 0.0);
    assert_eq!(rgb, [255, 255, 255]);
}

#[test]
fn cmyk_to_rgb_is_deterministic() {
    let a = cmyk_to_rgb(12.5, 88.0, 4.0, 2.0);
    let b = cmyk_to_rgb(12.5, 88.0, 4.0, 2.0);
    assert_eq!(a, b);
}

#[test]
fn lab_to_rgb_clamps_every_channel() {
    // Extreme out-of-gamut Lab values must not panic and must clamp to
    // valid byte range.
    let rgb = lab_to_rgb(200.0, 500.0, -500.0);
    for c in rgb {
        assert!((0..=255).contains(&(c as i32)));
    }
}

#[test]
fn lab_white_point_is_near_white() {
    let rgb = lab_to_rgb(100.0, 0.0, 0.0);
    for c in rgb {
        assert!(c > 240);
    }
}

#[test]
fn hex_round_trips_through_rgb() {
    let rgb = [18u8, 52, 86];
    let hex = rgb_to_hex(rgb);
    assert_eq!(hex, "#123456");
    assert_eq!(hex_to_rgb(&hex).unwrap(), rgb);
}

#[test]
fn hex_to_rgb_rejects_short_strings() {
    assert!(hex_to_rgb("#fff").is_none());
}

#[test]
fn process_ink_defaults_are_case_insensitive() {
    assert_eq!(process_ink_default_rgb("Cyan"), process_ink_default_rgb("CYAN"));
    assert!(process_ink_default_rgb("spot-ink").is_none());
}

#[test]
fn pantone_lookup_is_case_insensitive_and_matches_hex_pattern() {
    let rgb = pantone_rgb("pantone 185 c").expect("185 C must be in the embedded table");
    let hex = rgb_to_hex(rgb);
    assert!(hex.starts_with('#') && hex.len() == 7);

    let rgb_upper = pantone_rgb("PANTONE 185 C").unwrap();
    assert_eq!(rgb, rgb_upper);
}

#[test]
fn pantone_lookup_is_authoritative_lab_conversion() {
    let rgb = pantone_rgb("PANTONE 185 C").unwrap();
    assert_eq!(rgb, lab_to_rgb(48.0, 67.0, 35.0));
}

#[test]
fn unknown_pantone_name_resolves_to_none() {
    assert!(pantone_rgb("PANTONE does-not-exist XYZ").is_none());
}
