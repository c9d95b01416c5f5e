//! Environment-variable configuration, bound the way the Go original's
//! `envconfig`-style flat config worked: every field has a default, and a
//! malformed value is an `Input` error rather than a panic.

use std::env;

use crate::error::{DziError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverprintMode {
    Enable,
    Simulate,
    Disable,
}

impl OverprintMode {
    pub fn as_ps_literal(&self) -> &'static str {
        match self {
            OverprintMode::Enable => "/enable",
            OverprintMode::Simulate => "/simulate",
            OverprintMode::Disable => "/disable",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "/enable" => Ok(Self::Enable),
            "/simulate" => Ok(Self::Simulate),
            "/disable" => Ok(Self::Disable),
            other => Err(DziError::input(format!(
                "DZI_OVERPRINT must be one of /enable, /simulate, /disable, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Object storage
    pub s3_host: String,
    pub s3_key: String,
    pub s3_secret: String,
    pub s3_bucket: String,

    // Tiling
    pub tile_size: u32,
    pub overlap: u32,
    pub tile_format: String,
    pub tile_setting: String,
    pub cover_height: u32,

    // Rasterization
    pub default_dpi: u32,
    pub min_resolution: u32,
    pub max_resolution: u32,
    pub max_size_pixels: u32,
    pub overprint: OverprintMode,
    pub graphics_alpha_bits: u32,
    pub icc_profile_path: String,

    // Runtime
    pub max_cpu_count: usize,
    pub debug: bool,
    pub split_channels: bool,
    pub copy_channels: bool,
    pub extract_text: bool,

    pub libreoffice_path: String,
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| DziError::input(format!("{key} has an invalid value: {raw:?}"))),
    }
}

fn env_bool(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(DziError::input(format!(
                "{key} has an invalid boolean value: {raw:?}"
            ))),
        },
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            s3_host: env_string("DZI_S3_HOST", ""),
            s3_key: env_string("DZI_S3_KEY", ""),
            s3_secret: env_string("DZI_S3_SECRET", ""),
            s3_bucket: env_string("DZI_BUCKET", "dzi"),

            tile_size: env_parsed("DZI_TILE_SIZE", 1024)?,
            overlap: env_parsed("DZI_OVERLAP", 1)?,
            tile_format: env_string("DZI_TILE_FORMAT", "png"),
            tile_setting: env_string("DZI_TILE_SETTING", ""),
            cover_height: env_parsed("DZI_COVER_H", 300)?,

            default_dpi: env_parsed("DZI_RESOLUTION", 600)?,
            min_resolution: env_parsed("DZI_MIN_RESOLUTION", 200)?,
            max_resolution: env_parsed("DZI_MAX_RESOLUTION", 1600)?,
            max_size_pixels: env_parsed("MAX_SIZE_PIXELS", 15000)?,
            overprint: OverprintMode::parse(&env_string("DZI_OVERPRINT", "/enable"))?,
            graphics_alpha_bits: env_parsed("GRAPHICS_ALPHA_BITS", 4)?,
            icc_profile_path: env_string("ICC_PROFILE_PATH", ""),

            max_cpu_count: env_parsed("MAX_CPU_COUNT", 4usize)?,
            debug: env_bool("DZI_DEBUG", false)?,
            split_channels: env_bool("DZI_SPLIT_CHANNELS", true)?,
            copy_channels: env_bool("DZI_COPY_CHANNELS", false)?,
            extract_text: env_bool("DZI_EXTRACT_TEXT", true)?,

            libreoffice_path: env_string("LIBREOFFICE_PATH", "soffice"),
        })
    }

    /// Lowered limits applied when the input was a presentation converted
    /// to PDF first (spec §4.9).
    pub fn for_presentation_branch(mut self) -> Self {
        self.max_size_pixels = 5000;
        self.max_resolution = 600;
        self.split_channels = false;
        self
    }
}

#[cfg(test)]
mod tests;
