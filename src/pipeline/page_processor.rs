//! Per-page engine: drives each detection through geometry mapping,
//! region analysis, erasure, font fitting and rendering.
//!
//! Detections are processed strictly in detector order, one at a time
//! (every step mutates the shared page raster). A failure for one
//! detection never halts the rest of the page; each detection ends in
//! exactly one terminal outcome recorded on the page result.

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::backend::Detection;
use crate::config::merged::MergedConfig;
use crate::eraser::erase;
use crate::font::fitter::FontFitter;
use crate::font::resolver::FontResolver;
use crate::geometry::map_to_pixels;
use crate::region::RegionAnalyzer;
use crate::render::render;
use crate::report::{DetectionRecord, Outcome, PageResult};

pub struct PageEngine {
    config: MergedConfig,
    analyzer: RegionAnalyzer,
    fitter: FontFitter,
}

impl PageEngine {
    /// Build the engine for one job. Font resolution happens once here;
    /// a degraded (bitmap-only) resolution is logged, not fatal.
    pub fn new(config: MergedConfig, resolver: &FontResolver) -> Self {
        let fitter = FontFitter::new(resolver, config.font.clone());
        if fitter.is_degraded() {
            warn!("no scalable font available; replacement text quality is degraded");
        }
        let analyzer = RegionAnalyzer::new(config.region.clone());
        PageEngine {
            config,
            analyzer,
            fitter,
        }
    }

    /// Process all detections of one page against its raster copy.
    /// Returns the finalized page result.
    pub fn process_page(
        &self,
        image: &mut RgbaImage,
        detections: &[Detection],
        page_number: u32,
        label: &str,
    ) -> PageResult {
        let mut result = PageResult::new(page_number);
        result.text_found = !detections.is_empty();

        for (i, detection) in detections.iter().enumerate() {
            let outcome = self.process_detection(image, detection);
            if outcome.is_success() {
                debug!(
                    "[{label}] detection {}: '{}' -> '{}'",
                    i + 1,
                    detection.source_text,
                    detection.translated_text
                );
            } else {
                warn!("[{label}] detection {}: {:?}", i + 1, outcome);
            }
            result.record(DetectionRecord {
                source_text: detection.source_text.clone(),
                translated_text: detection.translated_text.clone(),
                bounding_box: detection.bounding_box,
                outcome,
            });
        }

        info!(
            "[{label}] replacements: {} successful, {} failed",
            result.replaced, result.failed
        );
        result
    }

    /// One detection, start to terminal state. Never panics and never
    /// returns an error; every exit is an outcome.
    fn process_detection(&self, image: &mut RgbaImage, detection: &Detection) -> Outcome {
        let Some(bbox) = detection.bounding_box else {
            return Outcome::SkippedNoBbox;
        };
        if detection.translated_text.trim().is_empty() {
            // Translation failed upstream; leave the source text intact.
            return Outcome::RenderFailed;
        }
        if detection.styling.bold || detection.styling.italic {
            debug!("styling hints present (advisory, not applied)");
        }

        let Some(region) =
            map_to_pixels(&bbox, image.width(), image.height(), self.config.padding)
        else {
            return Outcome::SkippedGeometry;
        };

        let mask = self.analyzer.analyze(image, region);
        erase(image, &mask, self.config.background);

        let plan = self.fitter.fit(&detection.translated_text, region);
        if render(
            image,
            &plan,
            region,
            self.config.alignment,
            self.config.text_color,
        ) {
            Outcome::Rendered
        } else {
            Outcome::RenderFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RelBBox;
    use image::Rgba;

    fn engine() -> PageEngine {
        // Empty database forces the builtin face; keeps tests hermetic.
        let resolver = FontResolver::with_database(fontdb::Database::new());
        PageEngine::new(MergedConfig::default(), &resolver)
    }

    fn detection(bbox: Option<RelBBox>, source: &str, translated: &str) -> Detection {
        Detection {
            source_text: source.to_string(),
            translated_text: translated.to_string(),
            bounding_box: bbox,
            styling: Default::default(),
        }
    }

    #[test]
    fn detection_without_bbox_is_skipped() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let dets = vec![detection(None, "語", "word")];
        let result = engine().process_page(&mut img, &dets, 1, "test");
        assert_eq!(result.detections[0].outcome, Outcome::SkippedNoBbox);
        assert_eq!(result.failed, 1);
    }

    #[test]
    fn empty_translation_fails_without_erasing() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([10, 10, 10, 255]));
        let before = img.clone();
        let bbox = RelBBox {
            x: 0.2,
            y: 0.2,
            width: 0.5,
            height: 0.2,
        };
        let dets = vec![detection(Some(bbox), "語", "")];
        let result = engine().process_page(&mut img, &dets, 1, "test");
        assert_eq!(result.detections[0].outcome, Outcome::RenderFailed);
        assert_eq!(img.as_raw(), before.as_raw());
    }

    #[test]
    fn degenerate_bbox_is_skipped_geometry() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let bbox = RelBBox {
            x: 1.5,
            y: 1.5,
            width: 0.1,
            height: 0.1,
        };
        let dets = vec![detection(Some(bbox), "語", "word")];
        let result = engine().process_page(&mut img, &dets, 1, "test");
        assert_eq!(result.detections[0].outcome, Outcome::SkippedGeometry);
    }

    #[test]
    fn one_failure_does_not_halt_the_page() {
        let mut img = RgbaImage::from_pixel(400, 400, Rgba([255, 255, 255, 255]));
        let good = RelBBox {
            x: 0.1,
            y: 0.1,
            width: 0.5,
            height: 0.15,
        };
        let dets = vec![
            detection(None, "一", "one"),
            detection(Some(good), "二", "two"),
        ];
        let result = engine().process_page(&mut img, &dets, 1, "test");
        assert_eq!(result.detections[0].outcome, Outcome::SkippedNoBbox);
        assert_eq!(result.detections[1].outcome, Outcome::Rendered);
        assert_eq!(result.replaced, 1);
        assert_eq!(result.failed, 1);
    }
}
