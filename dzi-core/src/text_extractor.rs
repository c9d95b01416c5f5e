//! The `TextExtractor` capability (§6): plain text content for one PDF
//! page, used to populate `Page::text_content`. Stated as external by
//! contract; grounded in `text_processor.go`'s `mutool draw -F
//! stext.json` invocation and JSON-block flattening, with the structured
//! block/bbox data flattened to the plain string the manifest carries.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::error::{DziError, Result};

pub trait TextExtractor {
    fn extract(&self, pdf_path: &Path, page_number: u32) -> Result<String>;
}

#[derive(Debug, Deserialize, Default)]
struct StextLine {
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct StextBlock {
    #[serde(default)]
    lines: Vec<StextLine>,
}

#[derive(Debug, Deserialize, Default)]
struct StextPage {
    #[serde(default)]
    blocks: Vec<StextBlock>,
}

#[derive(Debug, Deserialize, Default)]
struct StextResult {
    #[serde(default)]
    pages: Vec<StextPage>,
}

/// Default adapter: shells to `mutool draw -F stext.json` for one page
/// and flattens every line's text into a single newline-joined string.
pub struct MutoolTextExtractor {
    pub mutool_path: String,
}

impl Default for MutoolTextExtractor {
    fn default() -> Self {
        Self {
            mutool_path: "mutool".to_string(),
        }
    }
}

impl TextExtractor for MutoolTextExtractor {
    fn extract(&self, pdf_path: &Path, page_number: u32) -> Result<String> {
        let output = Command::new(&self.mutool_path)
            .args(["draw", "-q", "-F", "stext.json"])
            .arg(pdf_path)
            .arg(page_number.to_string())
            .output()
            .map_err(|e| DziError::tool("mutool", e.to_string()))?;

        if !output.status.success() {
            return Err(DziError::tool(
                "mutool",
                format!(
                    "exit status {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                ),
            ));
        }

        flatten_stext_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// `mutool` occasionally prefixes its JSON with a `warning:` line on
/// stdout; strip it the same way `text_processor.go` does before
/// unmarshalling.
fn strip_warning_prefix(raw: &str) -> &str {
    if raw.starts_with("warning:") {
        raw.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
    } else {
        raw
    }
}

fn flatten_stext_json(raw: &str) -> Result<String> {
    let cleaned = strip_warning_prefix(raw.trim_start());
    if cleaned.trim().is_empty() {
        return Ok(String::new());
    }
    let parsed: StextResult = serde_json::from_str(cleaned)?;
    let joined = parsed
        .pages
        .into_iter()
        .flat_map(|p| p.blocks)
        .flat_map(|b| b.lines)
        .filter_map(|l| l.text)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(joined)
}
