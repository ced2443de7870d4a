//! Filesystem reference collaborators: page images from a directory,
//! PNG output, JSON report.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::debug;

use super::{PageSink, Rasterizer, ReportSink};
use crate::error::{PageTranslateError, Result};
use crate::report::RunReport;

/// "Rasterizer" over a directory of already-rasterized page images,
/// ordered by filename. Accepts .png, .jpg and .jpeg.
pub struct DirRasterizer;

impl Rasterizer for DirRasterizer {
    fn pages(&self, document: &Path) -> Result<Vec<RgbaImage>> {
        if !document.is_dir() {
            return Err(PageTranslateError::raster(format!(
                "not a directory: {}",
                document.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(document)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("png") | Some("jpg") | Some("jpeg")
                )
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(PageTranslateError::raster(format!(
                "no page images in {}",
                document.display()
            )));
        }

        let mut pages = Vec::with_capacity(paths.len());
        for path in &paths {
            let img = image::open(path)?.to_rgba8();
            debug!(page = %path.display(), w = img.width(), h = img.height(), "page loaded");
            pages.push(img);
        }
        Ok(pages)
    }
}

/// Writes modified pages as `{stem}_page_{NNN}.png` into a directory.
pub struct PngPageSink {
    out_dir: PathBuf,
}

impl PngPageSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        PngPageSink {
            out_dir: out_dir.into(),
        }
    }
}

impl PageSink for PngPageSink {
    fn write(&self, file_stem: &str, page_number: u32, image: &RgbaImage) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{file_stem}_page_{page_number:03}.png"));
        image.save(&path)?;
        Ok(())
    }
}

/// Writes the run report as pretty-printed JSON.
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonReportSink { path: path.into() }
    }
}

impl ReportSink for JsonReportSink {
    fn write(&self, report: &RunReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
