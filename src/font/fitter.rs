//! Font size fitting and word wrapping.
//!
//! Picks the largest size at or above the configured floor at which the
//! wrapped text block fits the target region. At the floor, overflow is
//! accepted rather than reported as an error.

use tracing::{debug, warn};

use super::FontHandle;
use super::resolver::FontResolver;
use crate::geometry::PixelRegion;

#[derive(Debug, Clone)]
pub struct FontParams {
    /// Family search order; first resolvable wins.
    pub families: Vec<String>,
    /// Auto-shrink floor in pixels.
    pub min_size: u32,
    /// Multiplier on the single-line height when stacking lines.
    pub line_spacing: f32,
}

impl Default for FontParams {
    fn default() -> Self {
        FontParams {
            families: vec!["Arial".to_string(), "DejaVu Sans".to_string()],
            min_size: 12,
            line_spacing: 1.1,
        }
    }
}

/// Everything the renderer needs for one region, produced once per
/// detection and consumed once.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub font: FontHandle,
    pub size: u32,
    pub lines: Vec<String>,
    /// Vertical advance per line, spacing included.
    pub line_advance: u32,
    /// Offset from the region top to the first line, never negative.
    pub y_offset: u32,
    /// Set when only the built-in bitmap face resolved.
    pub degraded: bool,
}

pub struct FontFitter {
    handle: FontHandle,
    degraded: bool,
    params: FontParams,
}

impl FontFitter {
    /// Resolve the configured family chain once up front. Styling hints
    /// from detections are advisory and do not select face variants.
    pub fn new(resolver: &FontResolver, params: FontParams) -> Self {
        let (handle, degraded) = resolver.resolve(&params.families);
        FontFitter {
            handle,
            degraded,
            params,
        }
    }

    /// Fitter over an already-resolved handle. Used by tests.
    pub fn with_handle(handle: FontHandle, params: FontParams) -> Self {
        FontFitter {
            handle,
            degraded: false,
            params,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Fit `text` into `region`: shrink from 80% of region height down
    /// to the floor until the wrapped block fits both dimensions.
    pub fn fit(&self, text: &str, region: PixelRegion) -> RenderPlan {
        let region_w = region.width();
        let region_h = region.height();
        let floor = self.params.min_size;

        let text = text.trim();
        if text.is_empty() {
            return self.plan(floor, Vec::new(), region_h);
        }

        let mut size = ((region_h as f32 * 0.8) as u32).max(floor);
        loop {
            let lines = self.wrap(text, size, region_w);
            let block_h = lines.len() as u32 * self.line_advance(size);
            let widest = lines
                .iter()
                .map(|l| self.handle.line_width(size, l))
                .fold(0.0f32, f32::max);

            let fits = block_h <= region_h && widest <= region_w as f32;
            if fits || size <= floor {
                if !fits {
                    warn!(
                        size,
                        block_h, region_h, "text does not fit at floor size; accepting overflow"
                    );
                }
                debug!(size, lines = lines.len(), "font fitted");
                return self.plan(size, lines, region_h);
            }
            size = size.saturating_sub(2).max(floor);
        }
    }

    /// Greedy whitespace wrap. A single word wider than the region gets
    /// its own overflowing line; the size search above reacts to that.
    fn wrap(&self, text: &str, size: u32, max_width: u32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.handle.line_width(size, &candidate) <= max_width as f32 {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn line_advance(&self, size: u32) -> u32 {
        (self.handle.line_height(size) * self.params.line_spacing).round() as u32
    }

    fn plan(&self, size: u32, lines: Vec<String>, region_h: u32) -> RenderPlan {
        let line_advance = self.line_advance(size);
        let block_h = lines.len() as u32 * line_advance;
        RenderPlan {
            font: self.handle.clone(),
            size,
            lines,
            line_advance,
            y_offset: region_h.saturating_sub(block_h) / 2,
            degraded: self.degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitter(min_size: u32) -> FontFitter {
        FontFitter::with_handle(
            FontHandle::Builtin,
            FontParams {
                min_size,
                ..FontParams::default()
            },
        )
    }

    fn region(w: u32, h: u32) -> PixelRegion {
        PixelRegion {
            left: 0,
            top: 0,
            right: w,
            bottom: h,
        }
    }

    #[test]
    fn size_never_below_floor() {
        let plan = fitter(12).fit("an extremely long line of text", region(20, 10));
        assert!(plan.size >= 12);
    }

    #[test]
    fn lines_fit_width_above_floor() {
        let plan = fitter(8).fit("Tokyo Tower", region(180, 56));
        assert!(plan.size > 8);
        for line in &plan.lines {
            assert!(plan.font.line_width(plan.size, line) <= 180.0);
        }
    }

    #[test]
    fn empty_text_yields_zero_lines() {
        let plan = fitter(12).fit("   ", region(100, 40));
        assert!(plan.lines.is_empty());
        assert_eq!(plan.y_offset, 20);
    }

    #[test]
    fn block_is_vertically_centered() {
        let plan = fitter(8).fit("Hi", region(200, 100));
        let block = plan.lines.len() as u32 * plan.line_advance;
        assert_eq!(plan.y_offset, (100 - block) / 2);
    }
}
