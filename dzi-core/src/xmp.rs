//! XMP metadata extraction (§4.2/§4.3), ported from `pdfextract.go`'s
//! `pdfMeta`/`pdfEgMeta` structs and `getEntryInfo`.
//!
//! The original decodes the same XMP packet twice, into two unrelated
//! shapes: a "pdf-core" shape (`RDF>Description>MaxPageSize>unit`,
//! `PlateNames`, `SwatchGroups`) and an Esko ink-book shape
//! (`RDF>Description>{units,vsize,hsize,inks}`). Go's `encoding/xml`
//! matches struct tags by local element name regardless of namespace
//! prefix and regardless of the document's root element, so a
//! hand-rolled path-matching scan (rather than a single hierarchical
//! `serde` decode) is the faithful port, not a simplification.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::reader::Reader;

use crate::error::{DziError, Result};

#[derive(Debug, Clone, Default)]
pub struct EskoInkEntry {
    pub name: String,
    pub egtype: String,
    pub book: String,
    pub egname: String,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EskoShape {
    pub unit: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub inks: Vec<EskoInkEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct SwatchGroupEntry {
    pub swatch_name: String,
    pub mode: String,
    pub l: f64,
    pub a: f64,
    pub b: f64,
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub black: f64,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PdfCoreShape {
    pub unit: Option<String>,
    pub plate_names: Vec<String>,
    pub swatch_groups: Vec<SwatchGroupEntry>,
}

fn local_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).into_owned()
}

/// Walks `xml`, tracking the stack of local element names below the
/// document's root (the root itself is never matched against, mirroring
/// Go's root-agnostic top-level `Unmarshal`). `on_leaf` is called with
/// the current path and accumulated text every time a leaf element
/// closes; `on_open`/`on_close` let callers track list boundaries.
fn walk(
    xml: &str,
    mut on_open: impl FnMut(&[String]),
    mut on_close: impl FnMut(&[String]),
    mut on_leaf: impl FnMut(&[String], &str),
) -> Result<()> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut buf = Vec::new();
    let mut depth_below_root = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                depth_below_root += 1;
                text.clear();
                if depth_below_root > 1 {
                    stack.push(local_name(e.name()));
                    on_open(&stack);
                }
            }
            Ok(Event::Empty(_)) => {
                // Self-closing leaf with no text; nothing to record.
            }
            Ok(Event::Text(e)) => {
                if let Ok(unescaped) = e.unescape() {
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(_)) => {
                if depth_below_root > 1 {
                    on_leaf(&stack, text.trim());
                    on_close(&stack);
                    stack.pop();
                }
                depth_below_root = depth_below_root.saturating_sub(1);
                text.clear();
            }
            Ok(_) => {}
            Err(err) => return Err(DziError::input(format!("malformed XMP packet: {err}"))),
        }
        buf.clear();
    }
    Ok(())
}

fn ends_with(stack: &[String], suffix: &[&str]) -> bool {
    if stack.len() < suffix.len() {
        return false;
    }
    stack[stack.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|(a, b)| a == b)
}

fn parse_f64(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

fn parse_i32(s: &str) -> i32 {
    s.parse().unwrap_or(0)
}

/// Parses the Esko ink-book shape: `RDF>Description>{units,vsize,hsize}`
/// plus one `EskoInkEntry` per `RDF>Description>inks>Seq>li`.
pub fn parse_esko_shape(xml: &str) -> Result<EskoShape> {
    if xml.trim().is_empty() {
        return Ok(EskoShape::default());
    }

    let mut shape = EskoShape::default();
    let mut current: Option<EskoInkEntry> = None;

    walk(
        xml,
        |stack| {
            if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li"]) {
                current = Some(EskoInkEntry::default());
            }
        },
        |stack| {
            if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li"]) {
                if let Some(entry) = current.take() {
                    shape.inks.push(entry);
                }
            }
        },
        |stack, text| {
            if ends_with(stack, &["RDF", "Description", "units"]) {
                shape.unit = Some(text.to_string());
            } else if ends_with(stack, &["RDF", "Description", "vsize"]) {
                shape.width = Some(parse_f64(text));
            } else if ends_with(stack, &["RDF", "Description", "hsize"]) {
                shape.height = Some(parse_f64(text));
            } else if let Some(entry) = current.as_mut() {
                if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "name"]) {
                    entry.name = text.to_string();
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "type"]) {
                    entry.egtype = text.to_string();
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "book"]) {
                    entry.book = text.to_string();
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "egname"]) {
                    entry.egname = text.to_string();
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "r"]) {
                    entry.r = parse_f64(text);
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "g"]) {
                    entry.g = parse_f64(text);
                } else if ends_with(stack, &["RDF", "Description", "inks", "Seq", "li", "b"]) {
                    entry.b = parse_f64(text);
                }
            }
        },
    )?;

    Ok(shape)
}

/// Parses the pdf-core shape: `RDF>Description>MaxPageSize>unit`,
/// `RDF>Description>PlateNames>Seq>li`, and
/// `RDF>Description>SwatchGroups>Seq>li>Colorants>Seq>li`.
pub fn parse_pdf_core_shape(xml: &str) -> Result<PdfCoreShape> {
    if xml.trim().is_empty() {
        return Ok(PdfCoreShape::default());
    }

    let mut shape = PdfCoreShape::default();
    let mut current: Option<SwatchGroupEntry> = None;

    walk(
        xml,
        |stack| {
            if ends_with(
                stack,
                &["RDF", "Description", "SwatchGroups", "Seq", "li", "Colorants", "Seq", "li"],
            ) {
                current = Some(SwatchGroupEntry::default());
            }
        },
        |stack| {
            if ends_with(
                stack,
                &["RDF", "Description", "SwatchGroups", "Seq", "li", "Colorants", "Seq", "li"],
            ) {
                if let Some(entry) = current.take() {
                    shape.swatch_groups.push(entry);
                }
            }
        },
        |stack, text| {
            if ends_with(stack, &["RDF", "Description", "MaxPageSize", "unit"]) {
                shape.unit = Some(text.to_string());
            } else if ends_with(stack, &["RDF", "Description", "PlateNames", "Seq", "li"]) {
                shape.plate_names.push(text.to_string());
            } else if let Some(entry) = current.as_mut() {
                let base = [
                    "RDF",
                    "Description",
                    "SwatchGroups",
                    "Seq",
                    "li",
                    "Colorants",
                    "Seq",
                    "li",
                ];
                let mut field = |suffix: &str| {
                    let mut path = base.to_vec();
                    path.push(suffix);
                    ends_with(stack, &path)
                };
                if field("swatchName") {
                    entry.swatch_name = text.to_string();
                } else if field("mode") {
                    entry.mode = text.to_string();
                } else if field("L") {
                    entry.l = parse_f64(text);
                } else if field("A") {
                    entry.a = parse_f64(text);
                } else if field("B") {
                    entry.b = parse_f64(text);
                } else if field("cyan") {
                    entry.cyan = parse_f64(text);
                } else if field("magenta") {
                    entry.magenta = parse_f64(text);
                } else if field("yellow") {
                    entry.yellow = parse_f64(text);
                } else if field("black") {
                    entry.black = parse_f64(text);
                } else if field("red") {
                    entry.red = parse_i32(text);
                } else if field("green") {
                    entry.green = parse_i32(text);
                } else if field("blue") {
                    entry.blue = parse_i32(text);
                }
            }
        },
    )?;

    Ok(shape)
}

#[cfg(test)]
mod tests;
