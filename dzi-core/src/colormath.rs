//! Pure color-space conversions: CMYK↔RGB, Lab→RGB, hex formatting, and the
//! embedded PANTONE name→RGB lookup. Ported from `colorutils/colorutils.go`
//! and `assets/assets.go`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// CMYK percentages (0..=100) to 8-bit RGB. Matches `Cmyk2rgb` exactly,
/// including its `ceil` rounding.
pub fn cmyk_to_rgb(c: f64, m: f64, y: f64, k: f64) -> [u8; 3] {
    let r = 255.0 * (1.0 - c / 100.0) * (1.0 - k / 100.0);
    let g = 255.0 * (1.0 - m / 100.0) * (1.0 - k / 100.0);
    let b = 255.0 * (1.0 - y / 100.0) * (1.0 - k / 100.0);
    [r.ceil() as u8, g.ceil() as u8, b.ceil() as u8]
}

/// CIE L*a*b* to 8-bit sRGB, matching `Lab2rgb`'s D65 matrix and gamma.
/// Each output channel is clamped to `[0, 255]`.
pub fn lab_to_rgb(l: f64, a: f64, b: f64) -> [u8; 3] {
    let y = (l + 16.0) / 116.0;
    let x = a / 500.0 + y;
    let z = y - b / 200.0;

    let f = |v: f64, k: f64| -> f64 {
        if v * v * v > 0.008856 {
            k * v * v * v
        } else {
            k * ((v - 16.0 / 116.0) / 7.787)
        }
    };

    let x = f(x, 0.95047);
    let y = f(y, 1.0);
    let z = f(z, 1.08883);

    let lin = |v: f64| -> f64 {
        if v > 0.0031308 {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        } else {
            12.92 * v
        }
    };

    let r = lin(x * 3.2406 + y * -1.5372 + z * -0.4986);
    let g = lin(x * -0.9689 + y * 1.8758 + z * 0.0415);
    let bl = lin(x * 0.0557 + y * -0.2040 + z * 1.0570);

    let clamp255 = |v: f64| -> u8 { (v.clamp(0.0, 1.0) * 255.0).ceil().clamp(0.0, 255.0) as u8 };

    [clamp255(r), clamp255(g), clamp255(bl)]
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Parses a `#rrggbb` string back into components. Used by the colorizer
/// when it needs raw channel values for a matte backdrop.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Default ink color for the CMYK process channels, used when no spot
/// metadata overrides them. Matches the Go original's `CMYK` default table
/// for the four process inks (pure-ink screen colors).
pub fn process_ink_default_rgb(name: &str) -> Option<[u8; 3]> {
    match name.to_ascii_lowercase().as_str() {
        "cyan" => Some([0, 174, 239]),
        "magenta" => Some([236, 0, 140]),
        "yellow" => Some([255, 241, 0]),
        "black" => Some([35, 31, 32]),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct PantoneEntry {
    name: String,
    components: [f64; 3],
}

#[derive(Debug, Deserialize)]
struct PantoneTable {
    colors: Vec<PantoneEntry>,
}

static PANTONES_JSON: &str = include_str!("pantones.json");

static PANTONE_LAB: Lazy<HashMap<String, [f64; 3]>> = Lazy::new(|| {
    let table: PantoneTable =
        serde_json::from_str(PANTONES_JSON).expect("embedded pantones.json must parse");
    table
        .colors
        .into_iter()
        .map(|c| (c.name.to_ascii_lowercase(), c.components))
        .collect()
});

/// Case-insensitive PANTONE name lookup, authoritative per §4.3 precedence
/// rule 1. Returns the Lab→RGB conversion of the embedded swatch.
pub fn pantone_rgb(name: &str) -> Option<[u8; 3]> {
    PANTONE_LAB
        .get(&name.to_ascii_lowercase())
        .map(|&[l, a, b]| lab_to_rgb(l, a, b))
}

#[cfg(test)]
mod tests;
