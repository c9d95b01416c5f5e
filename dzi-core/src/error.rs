//! Flat error taxonomy for the ingest pipeline, mirroring §7 of the design:
//! `Input`, `ExternalTool`, `Io`, `InvariantViolation`, `WorkerPanic`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DziError {
    #[error("input error: {0}")]
    Input(String),

    #[error("external tool `{tool}` failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("io error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("worker panicked: {0}")]
    WorkerPanic(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DziError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

impl From<std::io::Error> for DziError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl From<image::ImageError> for DziError {
    fn from(e: image::ImageError) -> Self {
        Self::ExternalTool {
            tool: "image".into(),
            message: e.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for DziError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ExternalTool {
            tool: "zip".into(),
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for DziError {
    fn from(e: reqwest::Error) -> Self {
        Self::ExternalTool {
            tool: "http".into(),
            message: e.to_string(),
        }
    }
}

impl From<quick_xml::de::DeError> for DziError {
    fn from(e: quick_xml::de::DeError) -> Self {
        Self::Input(format!("xmp parse error: {e}"))
    }
}

impl From<serde_json::Error> for DziError {
    fn from(e: serde_json::Error) -> Self {
        Self::Input(format!("json error: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, DziError>;

#[cfg(test)]
mod tests;
