//! The `PDFMeta` capability (§6): page count, per-page dimensions and
//! rotation, and the document's embedded XMP packet. Spec.md lists the
//! PDF metadata reader among the external collaborators stated only by
//! contract; the teacher workspace happens to ship a PDF parser
//! (`nipdf`), so the default adapter here is a real implementation
//! rather than a stub, grounded in `nipdf::file::File` /
//! `file::page::Page`.

use std::path::Path;

use crate::error::{DziError, Result};

/// One page's native geometry, read straight from the media box — the
/// input to `page_geometry::compute`.
#[derive(Debug, Clone, Copy)]
pub struct PdfPageInfo {
    pub page_number: u32,
    pub point_width: f64,
    pub point_height: f64,
    pub rotation: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PdfDocumentMeta {
    pub pages: Vec<PdfPageInfo>,
    /// Raw XMP packet (the bytes between `<?xpacket begin` and
    /// `<?xpacket end`), or empty if the document carries none. Handed
    /// to `xmp::parse_esko_shape`/`parse_pdf_core_shape` unparsed —
    /// those two parsers decode it independently (§9).
    pub xmp: String,
}

pub trait PdfMeta {
    fn read(&self, pdf_path: &Path) -> Result<PdfDocumentMeta>;
}

/// Default adapter: parses the PDF with `nipdf` for structural metadata,
/// and scans the raw file bytes for an embedded XMP packet — `nipdf`
/// does not expose the document's `/Metadata` stream directly, and a
/// byte-level scan for the `<?xpacket ... ?>` envelope is the cheapest
/// faithful substitute (see DESIGN.md Open Questions).
#[derive(Debug, Default)]
pub struct NipdfMetaReader;

impl PdfMeta for NipdfMetaReader {
    fn read(&self, pdf_path: &Path) -> Result<PdfDocumentMeta> {
        let buf = std::fs::read(pdf_path).map_err(|e| DziError::io(pdf_path.to_path_buf(), e))?;
        let xmp = extract_xmp_packet(&buf);

        let file = nipdf::file::File::parse(buf)
            .map_err(|e| DziError::input(format!("failed to parse PDF {pdf_path:?}: {e}")))?;
        let resolver = file
            .resolver()
            .map_err(|e| DziError::input(format!("failed to resolve PDF objects: {e}")))?;
        let catalog = file
            .catalog(&resolver)
            .map_err(|e| DziError::input(format!("failed to read PDF catalog: {e}")))?;
        let pages = catalog
            .pages()
            .map_err(|e| DziError::input(format!("failed to enumerate PDF pages: {e}")))?;

        let infos = pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let media_box = page.media_box();
                PdfPageInfo {
                    page_number: (i + 1) as u32,
                    point_width: media_box.width() as f64,
                    point_height: media_box.height() as f64,
                    rotation: page.rotate(),
                }
            })
            .collect();

        Ok(PdfDocumentMeta { pages: infos, xmp })
    }
}

/// Finds the first `<?xpacket begin=...?> ... <?xpacket end=...?>` span
/// in `buf` and lossily decodes just that span to UTF-8. Returns an
/// empty string if no packet is present (most commonly for PDFs that
/// carry ink metadata only via the document info dictionary, not XMP).
fn extract_xmp_packet(buf: &[u8]) -> String {
    const BEGIN: &[u8] = b"<?xpacket begin";
    const END: &[u8] = b"<?xpacket end";

    let Some(start) = find_subslice(buf, BEGIN) else {
        return String::new();
    };
    let Some(end_tag) = find_subslice(&buf[start..], END) else {
        return String::new();
    };
    let end_tag_start = start + end_tag;
    let close = buf[end_tag_start..]
        .iter()
        .position(|&b| b == b'>')
        .map(|p| end_tag_start + p + 1)
        .unwrap_or(buf.len());

    String::from_utf8_lossy(&buf[start..close]).into_owned()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests;
