//! The `HTTPFetcher` capability (§6): downloads the source artwork to a
//! local scratch path. Grounded in `utils.go`'s `downloadFileTemporary`,
//! using `reqwest`'s blocking client (already pulled in by the teacher's
//! workspace lints/deps for range-style fetches elsewhere in the pack).

use std::io::Write;
use std::path::Path;

use crate::error::{DziError, Result};

pub trait HttpFetcher {
    /// Downloads `url` to `dest`, truncating any existing file. Returns
    /// the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

#[derive(Debug, Default)]
pub struct ReqwestFetcher;

impl HttpFetcher for ReqwestFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut response = reqwest::blocking::get(url)?;
        if !response.status().is_success() {
            return Err(DziError::tool(
                "http",
                format!("GET {url} returned {}", response.status()),
            ));
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
        }
        let mut file = std::fs::File::create(dest).map_err(|e| DziError::io(dest.to_path_buf(), e))?;
        let written = response
            .copy_to(&mut file)
            .map_err(|e| DziError::tool("http", e.to_string()))?;
        file.flush().map_err(|e| DziError::io(dest.to_path_buf(), e))?;
        Ok(written)
    }
}

/// Derives the asset's on-disk extension from the URL's path component,
/// the way `path.Ext(filename)` does in the Go original. Returns the
/// extension without its leading dot, lowercased; empty if the URL has
/// none.
pub fn extension_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let filename = path.rsplit('/').next().unwrap_or(path);
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Derives the display filename (the URL's basename, query stripped)
/// the manifest carries verbatim.
pub fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path).to_string()
}
