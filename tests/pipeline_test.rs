//! Per-file pipeline behavior with injected collaborators: failure
//! isolation, retry exhaustion scoping, pass-through pages.

use std::path::Path;
use std::sync::Mutex;

use image::{Rgba, RgbaImage};
use page_translate::backend::{Detection, Detector, PageSink, Rasterizer, Translator};
use page_translate::config::merged::MergedConfig;
use page_translate::error::{PageTranslateError, Result};
use page_translate::font::resolver::FontResolver;
use page_translate::geometry::RelBBox;
use page_translate::pipeline::job_runner::{JobConfig, run_job_with};
use page_translate::report::Outcome;
use page_translate::retry::Delay;

struct FixedRasterizer(Vec<RgbaImage>);

impl Rasterizer for FixedRasterizer {
    fn pages(&self, _document: &Path) -> Result<Vec<RgbaImage>> {
        Ok(self.0.clone())
    }
}

struct FixedDetector {
    // detections per 0-based page index
    per_page: Vec<Vec<Detection>>,
    fail_on_page: Option<u32>,
}

impl Detector for FixedDetector {
    fn detect(&self, _image: &RgbaImage, page_index: u32) -> Result<Vec<Detection>> {
        if self.fail_on_page == Some(page_index) {
            return Err(PageTranslateError::detect("backend unavailable"));
        }
        Ok(self
            .per_page
            .get(page_index as usize)
            .cloned()
            .unwrap_or_default())
    }
}

/// Echo translator that fails whole batches containing the marker text.
struct MarkerTranslator {
    calls: Mutex<u32>,
}

impl Translator for MarkerTranslator {
    fn translate(&self, texts: &[String]) -> Result<Vec<String>> {
        *self.calls.lock().unwrap() += 1;
        if texts.iter().any(|t| t == "FAIL") {
            return Err(PageTranslateError::translate("service down"));
        }
        Ok(texts.iter().map(|t| format!("<{t}>")).collect())
    }
}

#[derive(Default)]
struct CollectingSink {
    written: Mutex<Vec<(String, u32)>>,
}

impl PageSink for CollectingSink {
    fn write(&self, file_stem: &str, page_number: u32, _image: &RgbaImage) -> Result<()> {
        self.written
            .lock()
            .unwrap()
            .push((file_stem.to_string(), page_number));
        Ok(())
    }
}

struct NoDelay;

impl Delay for NoDelay {
    fn sleep(&self, _d: std::time::Duration) {}
}

fn job_config() -> JobConfig {
    JobConfig {
        input_path: "doc".into(),
        detections_path: "doc.json".into(),
        output_dir: "out".into(),
        pages: None,
        merged: MergedConfig::default(),
    }
}

fn detection(source: &str, bbox: RelBBox) -> Detection {
    Detection {
        source_text: source.to_string(),
        translated_text: String::new(),
        bounding_box: Some(bbox),
        styling: Default::default(),
    }
}

fn bbox() -> RelBBox {
    RelBBox {
        x: 0.2,
        y: 0.2,
        width: 0.4,
        height: 0.1,
    }
}

fn white_page(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
}

fn resolver() -> FontResolver {
    // Empty database keeps tests independent of installed fonts.
    FontResolver::with_database(fontdb::Database::new())
}

#[test]
fn test_all_detections_fail_when_translator_exhausts_retries() {
    let dets: Vec<Detection> = (0..5)
        .map(|i| {
            let mut d = detection("FAIL", bbox());
            d.source_text = if i == 0 {
                "FAIL".to_string()
            } else {
                format!("text{i}")
            };
            d
        })
        .collect();

    // Page 1's batch contains the marker and fails; page 2 translates.
    let detector = FixedDetector {
        per_page: vec![dets, vec![detection("ことば", bbox())]],
        fail_on_page: None,
    };
    let translator = MarkerTranslator {
        calls: Mutex::new(0),
    };
    let sink = CollectingSink::default();

    let report = run_job_with(
        &job_config(),
        &FixedRasterizer(vec![white_page(400, 400), white_page(400, 400)]),
        &detector,
        &translator,
        &sink,
        &resolver(),
        &NoDelay,
    )
    .expect("job should not abort");

    // 3 attempts for page 1's batch, 1 for page 2's.
    assert_eq!(*translator.calls.lock().unwrap(), 4);

    let page1 = &report.pages[0];
    assert_eq!(page1.detections.len(), 5);
    assert!(page1.detections.iter().all(|d| d.outcome == Outcome::RenderFailed));
    assert_eq!(page1.failed, 5);
    assert!(page1.error.is_some());

    let page2 = &report.pages[1];
    assert_eq!(page2.replaced, 1);
    assert_eq!(page2.detections[0].outcome, Outcome::Rendered);
    assert_eq!(page2.detections[0].translated_text, "<ことば>");
}

#[test]
fn test_detector_failure_scoped_to_one_page() {
    let detector = FixedDetector {
        per_page: vec![Vec::new(), vec![detection("ことば", bbox())]],
        fail_on_page: Some(0),
    };
    let translator = MarkerTranslator {
        calls: Mutex::new(0),
    };
    let sink = CollectingSink::default();

    let report = run_job_with(
        &job_config(),
        &FixedRasterizer(vec![white_page(300, 300), white_page(300, 300)]),
        &detector,
        &translator,
        &sink,
        &resolver(),
        &NoDelay,
    )
    .expect("job should not abort");

    assert!(report.pages[0].error.is_some());
    assert!(report.pages[0].detections.is_empty());
    assert_eq!(report.pages[1].replaced, 1);

    // Both pages still reach the sink, failed one unmodified.
    assert_eq!(sink.written.lock().unwrap().len(), 2);
}

#[test]
fn test_zero_detections_passes_page_through() {
    let page = white_page(200, 200);
    let detector = FixedDetector {
        per_page: vec![Vec::new()],
        fail_on_page: None,
    };
    let translator = MarkerTranslator {
        calls: Mutex::new(0),
    };
    let sink = CollectingSink::default();

    let report = run_job_with(
        &job_config(),
        &FixedRasterizer(vec![page]),
        &detector,
        &translator,
        &sink,
        &resolver(),
        &NoDelay,
    )
    .expect("job should not abort");

    assert_eq!(report.pages_with_text, 0);
    assert!(!report.pages[0].text_found);
    assert!(report.pages[0].detections.is_empty());
    assert_eq!(*translator.calls.lock().unwrap(), 0);
    assert_eq!(sink.written.lock().unwrap().len(), 1);
}

#[test]
fn test_page_subset_passes_other_pages_through() {
    let detector = FixedDetector {
        per_page: vec![
            vec![detection("いち", bbox())],
            vec![detection("に", bbox())],
        ],
        fail_on_page: None,
    };
    let translator = MarkerTranslator {
        calls: Mutex::new(0),
    };
    let sink = CollectingSink::default();

    let mut config = job_config();
    config.pages = Some(vec![2]);

    let report = run_job_with(
        &config,
        &FixedRasterizer(vec![white_page(300, 300), white_page(300, 300)]),
        &detector,
        &translator,
        &sink,
        &resolver(),
        &NoDelay,
    )
    .expect("job should not abort");

    // Page 1 passed through without detection or translation.
    assert!(report.pages[0].detections.is_empty());
    assert_eq!(report.pages[1].replaced, 1);
    assert_eq!(*translator.calls.lock().unwrap(), 1);
    assert_eq!(sink.written.lock().unwrap().len(), 2);
}

#[test]
fn test_edge_bbox_clamps_and_renders() {
    let edge = RelBBox {
        x: 0.99,
        y: 0.99,
        width: 0.05,
        height: 0.05,
    };
    let detector = FixedDetector {
        per_page: vec![vec![detection("端", edge)]],
        fail_on_page: None,
    };
    let translator = MarkerTranslator {
        calls: Mutex::new(0),
    };
    let sink = CollectingSink::default();

    let report = run_job_with(
        &job_config(),
        &FixedRasterizer(vec![white_page(1000, 1000)]),
        &detector,
        &translator,
        &sink,
        &resolver(),
        &NoDelay,
    )
    .expect("job should not abort");

    // Clamped to the image edge; still a valid region, still terminal.
    assert_eq!(report.pages[0].detections.len(), 1);
    assert_eq!(report.pages[0].detections[0].outcome, Outcome::Rendered);
}
