//! Per-file processing: rasterize -> detect -> translate -> replace ->
//! persist, page at a time.
//!
//! Collaborator failures are scoped: a detect or translate failure
//! after retries marks that page (or its detections) failed and the
//! remaining pages continue. Only an unreadable input aborts the job.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::backend::fs::{DirRasterizer, PngPageSink};
use crate::backend::sidecar::{SidecarDetector, SidecarTranslator};
use crate::backend::{Detection, Detector, PageSink, Rasterizer, Translator};
use crate::config::merged::MergedConfig;
use crate::error::{PageTranslateError, Result};
use crate::font::resolver::FontResolver;
use crate::pipeline::page_processor::PageEngine;
use crate::report::{DetectionRecord, FileReport, Outcome, PageResult};
use crate::retry::{Delay, ThreadSleep, with_retry};

/// Configuration for a single job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Directory of rasterized page images.
    pub input_path: PathBuf,
    /// Detections sidecar JSON.
    pub detections_path: PathBuf,
    /// Output directory for modified pages.
    pub output_dir: PathBuf,
    /// Optional 1-based page subset; pages outside pass through.
    pub pages: Option<Vec<u32>>,
    pub merged: MergedConfig,
}

/// Run one job with the filesystem reference collaborators.
pub fn run_job(config: &JobConfig) -> Result<FileReport> {
    let detector = SidecarDetector::open(&config.detections_path)?;
    let translator = SidecarTranslator::open(&config.detections_path)?;
    let page_sink = PngPageSink::new(&config.output_dir);
    let resolver = FontResolver::from_system();

    run_job_with(
        config,
        &DirRasterizer,
        &detector,
        &translator,
        &page_sink,
        &resolver,
        &ThreadSleep,
    )
}

/// Run one job over injected collaborators.
pub fn run_job_with(
    config: &JobConfig,
    rasterizer: &dyn Rasterizer,
    detector: &dyn Detector,
    translator: &dyn Translator,
    page_sink: &dyn PageSink,
    resolver: &FontResolver,
    delay: &dyn Delay,
) -> Result<FileReport> {
    let file_name = config
        .input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.input_path.display().to_string());

    // Input raster pages; unreadable input is the one fatal condition.
    let pages = rasterizer.pages(&config.input_path)?;
    let total_pages = pages.len() as u32;
    info!("processing {file_name}: {total_pages} page(s)");

    let engine = PageEngine::new(config.merged.clone(), resolver);
    let retry = &config.merged.retry;

    let mut page_results: Vec<PageResult> = Vec::with_capacity(pages.len());
    let mut pages_with_text = 0;

    for (idx, page) in pages.iter().enumerate() {
        let page_number = idx as u32 + 1;
        let label = format!("{file_name} p{page_number}/{total_pages}");

        if let Some(subset) = &config.pages
            && !subset.contains(&page_number)
        {
            // Pass-through page: untouched copy, empty result.
            page_sink.write(&file_name, page_number, page)?;
            page_results.push(PageResult::new(page_number));
            continue;
        }

        // Detection, bounded retries; exhaustion fails the page only.
        let detections = match with_retry(retry, delay, "detect", || {
            detector.detect(page, idx as u32)
        }) {
            Ok(d) => d,
            Err(e) => {
                warn!("[{label}] detection failed: {e}");
                let mut result = PageResult::new(page_number);
                result.error = Some(e.to_string());
                page_sink.write(&file_name, page_number, page)?;
                page_results.push(result);
                continue;
            }
        };

        if detections.is_empty() {
            info!("[{label}] no text found");
            page_sink.write(&file_name, page_number, page)?;
            page_results.push(PageResult::new(page_number));
            continue;
        }
        pages_with_text += 1;

        // Batch translation for the page.
        let mut working = page.clone();
        match translate_batch(translator, retry, delay, &detections) {
            Ok(translated) => {
                let result = engine.process_page(&mut working, &translated, page_number, &label);
                page_sink.write(&file_name, page_number, &working)?;
                page_results.push(result);
            }
            Err(e) => {
                // Every detection on the page fails; source text is kept.
                warn!("[{label}] translation failed: {e}");
                let mut result = PageResult::new(page_number);
                result.text_found = true;
                result.error = Some(e.to_string());
                for det in &detections {
                    result.record(DetectionRecord {
                        source_text: det.source_text.clone(),
                        translated_text: String::new(),
                        bounding_box: det.bounding_box,
                        outcome: Outcome::RenderFailed,
                    });
                }
                page_sink.write(&file_name, page_number, page)?;
                page_results.push(result);
            }
        }
    }

    info!("{file_name}: {pages_with_text}/{total_pages} page(s) contained text");

    Ok(FileReport {
        file: file_name,
        total_pages,
        pages_with_text,
        pages: page_results,
        error: None,
    })
}

/// Translate all source texts of a page in one batch and pair the
/// results back onto fresh detections. A response of the wrong length
/// is a translator contract violation, reported as an error.
fn translate_batch(
    translator: &dyn Translator,
    retry: &crate::retry::RetryPolicy,
    delay: &dyn Delay,
    detections: &[Detection],
) -> Result<Vec<Detection>> {
    let texts: Vec<String> = detections.iter().map(|d| d.source_text.clone()).collect();
    let translations = with_retry(retry, delay, "translate", || translator.translate(&texts))?;

    if translations.len() != detections.len() {
        return Err(PageTranslateError::translate(format!(
            "translator returned {} entries for {} inputs",
            translations.len(),
            detections.len()
        )));
    }

    Ok(detections
        .iter()
        .zip(translations)
        .map(|(det, translated)| Detection {
            translated_text: translated,
            ..det.clone()
        })
        .collect())
}
