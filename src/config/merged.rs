use std::time::Duration;

use image::Rgba;

use super::job::Job;
use super::settings::{Settings, parse_hex_color};
use crate::font::fitter::FontParams;
use crate::region::RegionParams;
use crate::render::Alignment;
use crate::retry::RetryPolicy;

/// Per-job configuration after applying job overrides on top of the
/// settings file. Job `Some` values win; `None` falls back to settings.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub padding: u32,
    pub background: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub alignment: Alignment,
    pub region: RegionParams,
    pub font: FontParams,
    pub retry: RetryPolicy,
    pub parallel_workers: usize,
    pub report_filename: String,
}

impl MergedConfig {
    pub fn new(settings: &Settings, job: &Job) -> crate::error::Result<Self> {
        Ok(MergedConfig {
            padding: job.padding.unwrap_or(settings.padding),
            background: parse_hex_color(&settings.background_color)?,
            text_color: parse_hex_color(&settings.text_color)?,
            alignment: job.alignment.unwrap_or(settings.alignment),
            region: RegionParams {
                search_expand: settings.search_expand,
                probe_angles: settings.probe_angles,
                bubble_brightness_min: settings.bubble_brightness_min,
                bubble_fill_tolerance: settings.bubble_fill_tolerance,
                bubble_min_area_ratio: settings.bubble_min_area_ratio,
                bubble_inner_pad: settings.bubble_inner_pad,
                ink_threshold: settings.ink_threshold,
                ink_dilate_radius: settings.ink_dilate_radius,
            },
            font: FontParams {
                families: vec![settings.primary_font.clone(), settings.fallback_font.clone()],
                min_size: job.min_font_size.unwrap_or(settings.min_font_size),
                line_spacing: settings.line_spacing,
            },
            retry: RetryPolicy {
                max_attempts: settings.max_retries,
                delay: Duration::from_millis(settings.retry_delay_ms),
                backoff: settings.retry_backoff,
            },
            parallel_workers: settings.parallel_workers,
            report_filename: settings.report_filename.clone(),
        })
    }
}

impl Default for MergedConfig {
    /// All-defaults configuration, mainly for tests.
    fn default() -> Self {
        let settings = Settings::default();
        let job = Job {
            input: String::new(),
            detections: String::new(),
            output: String::new(),
            pages: None,
            padding: None,
            min_font_size: None,
            alignment: None,
        };
        MergedConfig::new(&settings, &job).expect("default settings are valid")
    }
}
