//! Region analysis: decide how to erase source text without destroying
//! surrounding artwork.
//!
//! Two independent products per region:
//! - a classification (`Bubble` vs `Plain`) choosing the erase geometry,
//! - a fine-grained ink footprint used to gauge how aggressively the
//!   region is inked (diagnostics; the eraser always fills the full
//!   geometry).

use std::collections::VecDeque;

use image::{GrayImage, Pixel, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, dilate};
use tracing::debug;

use crate::geometry::PixelRegion;

/// Tunables for bubble search and ink footprint extraction.
#[derive(Debug, Clone)]
pub struct RegionParams {
    /// Window multiplier beyond the padded region for bubble search.
    pub search_expand: f64,
    /// Number of evenly spaced rays probed from the region center.
    pub probe_angles: u32,
    /// Minimum luma for a pixel to count as bubble fill.
    pub bubble_brightness_min: u8,
    /// Luma tolerance around the seed during flood fill.
    pub bubble_fill_tolerance: u8,
    /// Flood area must reach this fraction of the padded region area.
    pub bubble_min_area_ratio: f64,
    /// Internal padding added to a found bubble's extent.
    pub bubble_inner_pad: u32,
    /// Pixels darker than this count as ink.
    pub ink_threshold: u8,
    /// Dilation radius for the ink footprint (applied twice).
    pub ink_dilate_radius: u8,
}

impl Default for RegionParams {
    fn default() -> Self {
        RegionParams {
            search_expand: 1.2,
            probe_angles: 12,
            bubble_brightness_min: 200,
            bubble_fill_tolerance: 24,
            bubble_min_area_ratio: 0.5,
            bubble_inner_pad: 4,
            ink_threshold: 96,
            ink_dilate_radius: 2,
        }
    }
}

/// How a region's erase geometry was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// An enclosing near-uniform light region was found; extent covers it.
    Bubble,
    /// No enclosing shape; extent is the padded rectangle.
    Plain,
}

/// Erasure decision for one region. Analysis never fails: the worst
/// case is the plain rectangle.
pub struct ErasureMask {
    pub kind: MaskKind,
    /// Geometry the eraser fills in full.
    pub extent: PixelRegion,
    /// Binary ink footprint over the padded region (255 = ink).
    pub footprint: GrayImage,
    /// Fraction of the padded region covered by the dilated footprint.
    pub footprint_coverage: f64,
}

pub struct RegionAnalyzer {
    params: RegionParams,
}

impl RegionAnalyzer {
    pub fn new(params: RegionParams) -> Self {
        RegionAnalyzer { params }
    }

    /// Classify the padded `region` and build its ink footprint.
    pub fn analyze(&self, image: &RgbaImage, region: PixelRegion) -> ErasureMask {
        let (w, h) = (image.width(), image.height());
        let window = region.scale_about_center(self.params.search_expand, w, h);

        let (kind, extent) = match self.find_bubble(image, region, window) {
            Some(extent) => (MaskKind::Bubble, extent),
            None => (MaskKind::Plain, region),
        };

        let (footprint, footprint_coverage) = self.ink_footprint(image, region);

        debug!(
            ?kind,
            extent_w = extent.width(),
            extent_h = extent.height(),
            coverage = format!("{footprint_coverage:.2}"),
            "region analyzed"
        );

        ErasureMask {
            kind,
            extent,
            footprint,
            footprint_coverage,
        }
    }

    /// Search outward from the region center along evenly spaced rays for
    /// a large enclosing light region. Returns its padded bounding extent.
    fn find_bubble(
        &self,
        image: &RgbaImage,
        region: PixelRegion,
        window: PixelRegion,
    ) -> Option<PixelRegion> {
        let min_area = (region.area() as f64 * self.params.bubble_min_area_ratio) as u64;
        let (cx, cy) = region.center();
        let max_radius = (window.width().max(window.height()) / 2) as i64;

        // Pixels already consumed by a failed flood; seeds landing on
        // them would refill the same component.
        let mut visited = vec![false; (window.width() * window.height()) as usize];

        for k in 0..self.params.probe_angles {
            let angle = k as f64 * std::f64::consts::TAU / self.params.probe_angles as f64;
            let (dx, dy) = (angle.cos(), angle.sin());

            let mut r: i64 = 0;
            while r <= max_radius {
                let px = cx as i64 + (dx * r as f64) as i64;
                let py = cy as i64 + (dy * r as f64) as i64;
                r += 4;

                if px < 0 || py < 0 {
                    break;
                }
                let (px, py) = (px as u32, py as u32);
                if !window.contains(px, py) {
                    break;
                }
                if visited[Self::window_index(window, px, py)] {
                    continue;
                }
                if luma_at(image, px, py) < self.params.bubble_brightness_min {
                    continue;
                }

                let (area, extent) = self.flood(image, window, (px, py), &mut visited);
                if area >= min_area {
                    return Some(extent.expand(
                        self.params.bubble_inner_pad,
                        image.width(),
                        image.height(),
                    ));
                }
            }
        }

        None
    }

    /// 4-connected flood fill restricted to the search window. Fills
    /// pixels within the fill tolerance of the seed luma and at least as
    /// bright as the bubble threshold. Returns area and bounding extent.
    fn flood(
        &self,
        image: &RgbaImage,
        window: PixelRegion,
        seed: (u32, u32),
        visited: &mut [bool],
    ) -> (u64, PixelRegion) {
        let seed_luma = luma_at(image, seed.0, seed.1) as i16;
        let tolerance = self.params.bubble_fill_tolerance as i16;
        let floor = self.params.bubble_brightness_min;

        let mut queue = VecDeque::new();
        visited[Self::window_index(window, seed.0, seed.1)] = true;
        queue.push_back(seed);

        let mut area: u64 = 0;
        let mut extent = PixelRegion {
            left: seed.0,
            top: seed.1,
            right: seed.0 + 1,
            bottom: seed.1 + 1,
        };

        while let Some((x, y)) = queue.pop_front() {
            area += 1;
            extent.left = extent.left.min(x);
            extent.top = extent.top.min(y);
            extent.right = extent.right.max(x + 1);
            extent.bottom = extent.bottom.max(y + 1);

            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if !window.contains(nx, ny) {
                    continue;
                }
                let idx = Self::window_index(window, nx, ny);
                if visited[idx] {
                    continue;
                }
                let luma = luma_at(image, nx, ny);
                if luma < floor || (luma as i16 - seed_luma).abs() > tolerance {
                    continue;
                }
                visited[idx] = true;
                queue.push_back((nx, ny));
            }
        }

        (area, extent)
    }

    /// Binary ink footprint over the padded region: dark pixels, dilated
    /// twice, then closed to seal gaps between strokes.
    fn ink_footprint(&self, image: &RgbaImage, region: PixelRegion) -> (GrayImage, f64) {
        let mut mask = GrayImage::new(region.width(), region.height());
        for y in 0..region.height() {
            for x in 0..region.width() {
                let luma = luma_at(image, region.left + x, region.top + y);
                if luma < self.params.ink_threshold {
                    mask.put_pixel(x, y, image::Luma([255]));
                }
            }
        }

        let radius = self.params.ink_dilate_radius;
        if radius > 0 {
            mask = dilate(&mask, Norm::LInf, radius);
            mask = dilate(&mask, Norm::LInf, radius);
        }
        mask = close(&mask, Norm::LInf, 1);

        let set = mask.pixels().filter(|p| p[0] > 0).count() as f64;
        let coverage = set / (region.area() as f64);
        (mask, coverage)
    }

    fn window_index(window: PixelRegion, x: u32, y: u32) -> usize {
        ((y - window.top) * window.width() + (x - window.left)) as usize
    }
}

fn luma_at(image: &RgbaImage, x: u32, y: u32) -> u8 {
    image.get_pixel(x, y).to_luma()[0]
}
