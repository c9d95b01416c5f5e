use super::*;
use crate::xmp::SwatchGroupEntry;

fn esko_ink(name: &str, egtype: &str, book: &str, egname: &str, r: f64, g: f64, b: f64) -> EskoInkEntry {
    EskoInkEntry {
        name: name.to_string(),
        egtype: egtype.to_string(),
        book: book.to_string(),
        egname: egname.to_string(),
        r,
        g,
        b,
    }
}

#[test]
fn pantone_table_wins_over_every_other_source() {
    // Even if the Esko section claims a conflicting RGB for the same
    // name, the embedded PANTONE table is authoritative.
    let esko = EskoShape {
        inks: vec![esko_ink("PANTONE 185 C", "pantone", "pms1000c", "999", 0.0, 0.0, 0.0)],
        ..Default::default()
    };
    let catalog = InkCatalog::new(esko, PdfCoreShape::default(), BTreeMap::new());

    let resolved = catalog.resolve("PANTONE 185 C").unwrap();
    assert_eq!(resolved.swatch_type, SwatchType::SpotComponent);
    assert_eq!(resolved.rgb, colormath::lab_to_rgb(48.0, 67.0, 35.0));
}

#[test]
fn esko_book_prefix_maps_pms1000c_entries_to_c_suffixed_names() {
    let esko = EskoShape {
        inks: vec![esko_ink("Some Spot", "pantone", "pms1000c", "2995", 0.0, 0.5, 1.0)],
        ..Default::default()
    };
    let catalog = InkCatalog::new(esko, PdfCoreShape::default(), BTreeMap::new());

    let resolved = catalog.resolve("PANTONE 2995 C").unwrap();
    assert_eq!(resolved.swatch_type, SwatchType::SpotComponent);
    assert_eq!(resolved.rgb, [0, 127, 255]);
}

#[test]
fn esko_process_inks_resolve_as_cmyk_component() {
    let esko = EskoShape {
        inks: vec![esko_ink("Cyan", "process", "", "", 0.0, 0.63, 0.91)],
        ..Default::default()
    };
    let catalog = InkCatalog::new(esko, PdfCoreShape::default(), BTreeMap::new());

    let resolved = catalog.resolve("Cyan").unwrap();
    assert_eq!(resolved.swatch_type, SwatchType::CmykComponent);
}

#[test]
fn swatch_group_lab_mode_converts_via_lab_to_rgb() {
    let pdf_core = PdfCoreShape {
        swatch_groups: vec![SwatchGroupEntry {
            swatch_name: "Custom Spot".to_string(),
            mode: "LAB".to_string(),
            l: 50.0,
            a: 10.0,
            b: -20.0,
            ..Default::default()
        }],
        ..Default::default()
    };
    let catalog = InkCatalog::new(EskoShape::default(), pdf_core, BTreeMap::new());

    let resolved = catalog.resolve("Custom Spot").unwrap();
    assert_eq!(resolved.rgb, colormath::lab_to_rgb(50.0, 10.0, -20.0));
}

#[test]
fn recovered_spot_rgb_is_used_when_no_metadata_claims_the_name() {
    let mut recovered = BTreeMap::new();
    recovered.insert("Varnish".to_string(), [10, 20, 30]);
    let catalog = InkCatalog::new(EskoShape::default(), PdfCoreShape::default(), recovered);

    let resolved = catalog.resolve("Varnish").unwrap();
    assert_eq!(resolved.rgb, [10, 20, 30]);
    assert_eq!(resolved.swatch_type, SwatchType::SpotComponent);
}

#[test]
fn process_channel_falls_back_to_default_ink_color_case_insensitively() {
    let catalog = InkCatalog::new(EskoShape::default(), PdfCoreShape::default(), BTreeMap::new());
    let resolved = catalog.resolve("magenta").unwrap();
    assert_eq!(resolved.swatch_type, SwatchType::CmykComponent);
    assert_eq!(resolved.rgb, colormath::process_ink_default_rgb("Magenta").unwrap());
}

#[test]
fn unresolvable_ink_is_a_fatal_invariant_violation() {
    let catalog = InkCatalog::new(EskoShape::default(), PdfCoreShape::default(), BTreeMap::new());
    assert!(catalog.resolve("Mystery Ink").is_err());
}

#[test]
fn precedence_prefers_esko_over_swatch_groups_over_recovered() {
    let esko = EskoShape {
        inks: vec![esko_ink("Spot A", "designer", "", "", 1.0, 0.0, 0.0)],
        ..Default::default()
    };
    let pdf_core = PdfCoreShape {
        swatch_groups: vec![SwatchGroupEntry {
            swatch_name: "Spot A".to_string(),
            mode: "RGB".to_string(),
            red: 0,
            green: 0,
            blue: 0,
            ..Default::default()
        }],
        ..Default::default()
    };
    let mut recovered = BTreeMap::new();
    recovered.insert("Spot A".to_string(), [5, 5, 5]);

    let catalog = InkCatalog::new(esko, pdf_core, recovered);
    let resolved = catalog.resolve("Spot A").unwrap();
    assert_eq!(resolved.rgb, [255, 0, 0]);
}
