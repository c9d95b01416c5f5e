//! The `PresentationConverter` capability (§4.9/§6): converts a
//! presentation input (pptx/ppt/pptm/pps/pot) to PDF before the ordinary
//! PDF path runs, under the lowered limits of §4.9. Grounded in
//! `pptx_converter.go`'s headless LibreOffice invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{DziError, Result};

pub const PRESENTATION_EXTENSIONS: [&str; 5] = ["pptx", "ppt", "pptm", "pps", "pot"];

pub fn is_presentation_extension(ext: &str) -> bool {
    PRESENTATION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

pub trait PresentationConverter {
    /// Converts `input` to PDF inside `output_dir`, returning the
    /// produced PDF's path.
    fn convert_to_pdf(&self, input: &Path, output_dir: &Path) -> Result<PathBuf>;
}

/// Default adapter: shells to a headless LibreOffice/`soffice` binary,
/// which writes `<stem>.pdf` into `output_dir`.
pub struct LibreOfficeConverter {
    pub soffice_path: String,
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self {
            soffice_path: "soffice".to_string(),
        }
    }
}

impl PresentationConverter for LibreOfficeConverter {
    fn convert_to_pdf(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir).map_err(|e| DziError::io(output_dir.to_path_buf(), e))?;

        let output = Command::new(&self.soffice_path)
            .args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(output_dir)
            .arg(input)
            .output()
            .map_err(|e| DziError::tool("soffice", e.to_string()))?;

        if !output.status.success() {
            return Err(DziError::tool(
                "soffice",
                format!(
                    "exit status {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(path) = parse_converted_pdf_path(&stdout) {
            return Ok(path);
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| DziError::input(format!("presentation input {input:?} has no file stem")))?;
        let fallback = output_dir.join(stem).with_extension("pdf");
        if fallback.exists() {
            Ok(fallback)
        } else {
            Err(DziError::tool(
                "soffice",
                format!("could not locate converted PDF for {input:?} in {output_dir:?}"),
            ))
        }
    }
}

/// LibreOffice's conversion log ends with a line like
/// `convert /tmp/in.pptx -> /tmp/out/in.pdf using filter : impress_pdf_Export`.
/// Extracts the path between `->` and ` using filter`.
fn parse_converted_pdf_path(stdout: &str) -> Option<PathBuf> {
    let line = stdout.lines().find(|l| l.contains("->"))?;
    let after_arrow = line.split("->").nth(1)?.trim();
    let path_part = after_arrow.split(" using filter").next()?.trim();
    if path_part.is_empty() {
        None
    } else {
        Some(PathBuf::from(path_part))
    }
}
