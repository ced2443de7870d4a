//! Detector and translator backed by a sidecar JSON file.
//!
//! The sidecar carries precomputed detections (the output of an
//! upstream OCR/translation stage) keyed by page number:
//!
//! ```json
//! {
//!   "pages": [
//!     { "page_number": 1,
//!       "extractions": [
//!         { "source_text": "東京タワー",
//!           "translated_text": "Tokyo Tower",
//!           "bounding_box": { "x": 0.45, "y": 0.12, "width": 0.18, "height": 0.04 } }
//!       ] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use serde::Deserialize;
use tracing::debug;

use super::{Detection, Detector, Translator};
use crate::error::{PageTranslateError, Result};

#[derive(Debug, Deserialize)]
struct SidecarFile {
    pages: Vec<SidecarPage>,
}

#[derive(Debug, Deserialize)]
struct SidecarPage {
    page_number: u32,
    #[serde(default)]
    extractions: Vec<Detection>,
}

/// Detector reading precomputed detections from a sidecar file.
pub struct SidecarDetector {
    // 0-based page index -> detections, detector order preserved.
    by_page: HashMap<u32, Vec<Detection>>,
}

impl SidecarDetector {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PageTranslateError::detect(format!("cannot read sidecar {}: {e}", path.display()))
        })?;
        let file: SidecarFile = serde_json::from_str(&content).map_err(|e| {
            PageTranslateError::detect(format!("invalid sidecar {}: {e}", path.display()))
        })?;

        let mut by_page = HashMap::new();
        for page in file.pages {
            if page.page_number == 0 {
                return Err(PageTranslateError::detect(format!(
                    "sidecar {} uses 1-based page numbers, found 0",
                    path.display()
                )));
            }
            by_page.insert(page.page_number - 1, page.extractions);
        }
        debug!(pages = by_page.len(), sidecar = %path.display(), "sidecar loaded");
        Ok(SidecarDetector { by_page })
    }
}

impl Detector for SidecarDetector {
    fn detect(&self, _image: &RgbaImage, page_index: u32) -> Result<Vec<Detection>> {
        Ok(self.by_page.get(&page_index).cloned().unwrap_or_default())
    }
}

/// Translator answering from the sidecar's source/translated pairs.
/// Unknown texts translate to the empty string (translation failed for
/// that segment), preserving length and order.
pub struct SidecarTranslator {
    by_source: HashMap<String, String>,
}

impl SidecarTranslator {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PageTranslateError::translate(format!("cannot read sidecar {}: {e}", path.display()))
        })?;
        let file: SidecarFile = serde_json::from_str(&content).map_err(|e| {
            PageTranslateError::translate(format!("invalid sidecar {}: {e}", path.display()))
        })?;

        let mut by_source = HashMap::new();
        for page in file.pages {
            for det in page.extractions {
                by_source.insert(det.source_text, det.translated_text);
            }
        }
        Ok(SidecarTranslator { by_source })
    }
}

impl Translator for SidecarTranslator {
    fn translate(&self, texts: &[String]) -> Result<Vec<String>> {
        Ok(texts
            .iter()
            .map(|t| self.by_source.get(t).cloned().unwrap_or_default())
            .collect())
    }
}
