//! Collaborator contracts consumed by the engine.
//!
//! Rasterization, detection and translation are external concerns; the
//! engine only sees these traits. Reference implementations that work
//! from local files live in [`fs`] and [`sidecar`].

pub mod fs;
pub mod sidecar;

use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::RelBBox;
use crate::report::RunReport;

/// Advisory styling hints attached to a detection. The engine logs
/// them but does not select face variants from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
    pub bold: bool,
    pub italic: bool,
}

/// One located text segment. Immutable once produced by the detector;
/// the engine never rewrites its texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub source_text: String,
    #[serde(default)]
    pub translated_text: String,
    pub bounding_box: Option<RelBBox>,
    #[serde(default)]
    pub styling: Styling,
}

/// Produces the ordered page rasters of one input document.
pub trait Rasterizer {
    fn pages(&self, document: &Path) -> Result<Vec<RgbaImage>>;
}

/// Locates foreign-script text on one page. An empty result means "no
/// text found", not an error. Bounding boxes are relative [0,1]
/// coordinates.
pub trait Detector {
    fn detect(&self, image: &RgbaImage, page_index: u32) -> Result<Vec<Detection>>;
}

/// Translates a batch of source texts. Implementations must return one
/// entry per input, same order; the caller rejects short or reordered
/// output as an error.
pub trait Translator {
    fn translate(&self, texts: &[String]) -> Result<Vec<String>>;
}

/// Persists the final run report.
pub trait ReportSink {
    fn write(&self, report: &RunReport) -> Result<()>;
}

/// Persists one modified page raster (lossless).
pub trait PageSink {
    fn write(&self, file_stem: &str, page_number: u32, image: &RgbaImage) -> Result<()>;
}
