//! Outcome records at detection, page, file and run granularity.
//!
//! The JSON schema is a contract with downstream consumers: every
//! detection entry carries source text, translated text, bounding box
//! and outcome, and field names stay stable across engine changes.

use serde::{Deserialize, Serialize};

use crate::geometry::RelBBox;

/// Terminal state of one detection's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Source text erased and replacement drawn.
    Rendered,
    /// Detection carried no bounding box.
    SkippedNoBbox,
    /// Bounding box collapsed to zero area after clamping.
    SkippedGeometry,
    /// Replacement text missing or drawing refused.
    RenderFailed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Rendered)
    }
}

/// Report entry for one detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub source_text: String,
    pub translated_text: String,
    pub bounding_box: Option<RelBBox>,
    pub outcome: Outcome,
}

/// Ordered per-detection outcomes for one page. Finalized once all
/// detections are processed, immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub page_number: u32,
    pub text_found: bool,
    pub detections: Vec<DetectionRecord>,
    pub replaced: u32,
    pub failed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn new(page_number: u32) -> Self {
        PageResult {
            page_number,
            text_found: false,
            detections: Vec::new(),
            replaced: 0,
            failed: 0,
            error: None,
        }
    }

    /// Record one detection's terminal outcome, in detector order.
    pub fn record(&mut self, record: DetectionRecord) {
        if record.outcome.is_success() {
            self.replaced += 1;
        } else {
            self.failed += 1;
        }
        self.detections.push(record);
    }
}

/// All page results for one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub total_pages: u32,
    pub pages_with_text: u32,
    pub pages: Vec<PageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub generated_at: String,
    pub pipeline: String,
    pub total_files: u32,
    pub total_pages: u32,
    pub total_detections: u32,
    pub total_replaced: u32,
    pub total_failed: u32,
    pub elapsed_seconds: f64,
}

/// Aggregate of all files processed in one run. Accumulated additively,
/// written once at end of run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Fold per-file reports into a run report with aggregate counts.
    pub fn assemble(files: Vec<FileReport>, generated_at: String, elapsed_seconds: f64) -> Self {
        let mut total_pages = 0;
        let mut total_detections = 0;
        let mut total_replaced = 0;
        let mut total_failed = 0;
        for file in &files {
            total_pages += file.total_pages;
            for page in &file.pages {
                total_detections += page.detections.len() as u32;
                total_replaced += page.replaced;
                total_failed += page.failed;
            }
        }

        RunReport {
            metadata: RunMetadata {
                generated_at,
                pipeline: env!("CARGO_PKG_NAME").to_string(),
                total_files: files.len() as u32,
                total_pages,
                total_detections,
                total_replaced,
                total_failed,
                elapsed_seconds,
            },
            files,
        }
    }
}
