use std::path::Path;

use image::Rgba;
use serde::Deserialize;

use crate::render::Alignment;
use crate::retry::Backoff;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Padding in pixels added around detected bounding boxes.
    pub padding: u32,
    /// Erase fill color, hex `#RRGGBB`.
    pub background_color: String,
    /// Replacement text color, hex `#RRGGBB`.
    pub text_color: String,
    pub alignment: Alignment,

    // Bubble search
    pub search_expand: f64,
    pub probe_angles: u32,
    pub bubble_brightness_min: u8,
    pub bubble_fill_tolerance: u8,
    pub bubble_min_area_ratio: f64,
    pub bubble_inner_pad: u32,

    // Ink footprint
    pub ink_threshold: u8,
    pub ink_dilate_radius: u8,

    // Fonts
    pub primary_font: String,
    pub fallback_font: String,
    pub min_font_size: u32,
    pub line_spacing: f32,

    // Collaborator retries
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub retry_backoff: Backoff,

    /// Worker threads for independent files (0 = rayon default).
    pub parallel_workers: usize,
    pub report_filename: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            padding: 10,
            background_color: "#FCFCFC".to_string(),
            text_color: "#000000".to_string(),
            alignment: Alignment::Center,
            search_expand: 1.2,
            probe_angles: 12,
            bubble_brightness_min: 200,
            bubble_fill_tolerance: 24,
            bubble_min_area_ratio: 0.5,
            bubble_inner_pad: 4,
            ink_threshold: 96,
            ink_dilate_radius: 2,
            primary_font: "Arial".to_string(),
            fallback_font: "DejaVu Sans".to_string(),
            min_font_size: 12,
            line_spacing: 1.1,
            max_retries: 3,
            retry_delay_ms: 2000,
            retry_backoff: Backoff::Fixed,
            parallel_workers: 0,
            report_filename: "translation_report.json".to_string(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::PageTranslateError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Parse a `#RRGGBB` hex color into an opaque RGBA pixel.
pub fn parse_hex_color(s: &str) -> crate::error::Result<Rgba<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(crate::error::PageTranslateError::config(format!(
            "Invalid color '{s}' (expected #RRGGBB)"
        )));
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    Ok(Rgba([r, g, b, 255]))
}
