use super::*;

const ESKO_SAMPLE: &str = r#"<?xml version="1.0"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description>
      <units>mm</units>
      <vsize>100</vsize>
      <hsize>150</hsize>
      <inks>
        <rdf:Seq>
          <rdf:li>
            <name>Cyan</name>
            <type>process</type>
            <book></book>
            <egname></egname>
            <r>0</r>
            <g>0.63</g>
            <b>0.91</b>
          </rdf:li>
          <rdf:li>
            <name>PANTONE 185 C</name>
            <type>pantone</type>
            <book>pms1000c</book>
            <egname>185</egname>
            <r>0.87</r>
            <g>0.1</g>
            <b>0.2</b>
          </rdf:li>
        </rdf:Seq>
      </inks>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
"#;

const PDF_CORE_SAMPLE: &str = r#"<?xml version="1.0"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description>
      <MaxPageSize>
        <unit>Millimeters</unit>
      </MaxPageSize>
      <PlateNames>
        <rdf:Seq>
          <rdf:li>Cyan</rdf:li>
          <rdf:li>Magenta</rdf:li>
        </rdf:Seq>
      </PlateNames>
      <SwatchGroups>
        <rdf:Seq>
          <rdf:li>
            <Colorants>
              <rdf:Seq>
                <rdf:li>
                  <swatchName>PANTONE 185 C</swatchName>
                  <mode>LAB</mode>
                  <L>48</L>
                  <A>67</A>
                  <B>35</B>
                </rdf:li>
              </rdf:Seq>
            </Colorants>
          </rdf:li>
        </rdf:Seq>
      </SwatchGroups>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
"#;

#[test]
fn esko_shape_reads_size_and_ink_list() {
    let shape = parse_esko_shape(ESKO_SAMPLE).unwrap();
    assert_eq!(shape.unit.as_deref(), Some("mm"));
    assert_eq!(shape.width, Some(100.0));
    assert_eq!(shape.height, Some(150.0));
    assert_eq!(shape.inks.len(), 2);
    assert_eq!(shape.inks[0].name, "Cyan");
    assert_eq!(shape.inks[0].egtype, "process");
    assert_eq!(shape.inks[1].name, "PANTONE 185 C");
    assert_eq!(shape.inks[1].book, "pms1000c");
    assert_eq!(shape.inks[1].egname, "185");
}

#[test]
fn pdf_core_shape_reads_unit_plates_and_swatch_groups() {
    let shape = parse_pdf_core_shape(PDF_CORE_SAMPLE).unwrap();
    assert_eq!(shape.unit.as_deref(), Some("Millimeters"));
    assert_eq!(shape.plate_names, vec!["Cyan", "Magenta"]);
    assert_eq!(shape.swatch_groups.len(), 1);
    let sg = &shape.swatch_groups[0];
    assert_eq!(sg.swatch_name, "PANTONE 185 C");
    assert_eq!(sg.mode, "LAB");
    assert_eq!((sg.l, sg.a, sg.b), (48.0, 67.0, 35.0));
}

#[test]
fn both_shapes_can_be_parsed_from_the_same_document_independently() {
    // A document carrying the Esko-only shape should parse fine as a
    // pdf-core shape too — it just comes back empty, since the two
    // parsers never share state.
    let esko = parse_esko_shape(ESKO_SAMPLE).unwrap();
    let core = parse_pdf_core_shape(ESKO_SAMPLE).unwrap();
    assert!(!esko.inks.is_empty());
    assert!(core.swatch_groups.is_empty());
    assert!(core.plate_names.is_empty());
}

#[test]
fn empty_input_yields_empty_shapes_without_error() {
    assert!(parse_esko_shape("").unwrap().inks.is_empty());
    assert!(parse_pdf_core_shape("   ").unwrap().plate_names.is_empty());
}

#[test]
fn malformed_xml_is_reported_as_an_input_error() {
    let broken = "<x:xmpmeta><rdf:RDF><rdf:Description><units>mm</Description></rdf:RDF>";
    assert!(parse_esko_shape(broken).is_err());
}
