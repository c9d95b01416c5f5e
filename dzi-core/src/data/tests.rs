use super::*;

fn final_swatch() -> Swatch {
    Swatch::new_final(PathBuf::from("page_1/Color.tiff"))
}

fn spot_swatch(name: &str) -> Swatch {
    Swatch {
        name: name.to_string(),
        ops_name: name.to_string(),
        swatch_type: SwatchType::SpotComponent,
        rgb: "#aabbcc".to_string(),
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
fn final_swatch_has_no_matte() {
    let s = final_swatch();
    assert!(!s.needs_matte);
    assert_eq!(s.name, "Color");
}

#[test]
fn page_exposes_exactly_one_final_swatch() {
    let page = Page {
        page_number: 1,
        width: 100.0,
        height: 150.0,
        unit: Unit::Mm,
        effective_dpi: 600,
        rotation: 0,
        text_content: String::new(),
        swatches: vec![
            final_swatch(),
            spot_swatch("Cyan"),
            spot_swatch("PANTONE 185 C"),
        ],
    };
    assert!(page.final_swatch().is_some());
    assert_eq!(page.non_final_swatches().count(), 2);
}

#[test]
fn unit_as_str_round_trips_tokens() {
    assert_eq!(Unit::Mm.as_str(), "mm");
    assert_eq!(Unit::Px.as_str(), "px");
}
