use serde::{Deserialize, Serialize};

/// Relative bounding box as produced by a detector, nominally in [0,1].
///
/// Detectors are not trusted to keep coordinates in range; the mapper
/// clamps everything to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelBBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle in pixel space, clamped to `[0, W] x [0, H]`.
///
/// Non-degenerate by construction: `right > left` and `bottom > top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRegion {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Center of the region in pixel coordinates.
    pub fn center(&self) -> (u32, u32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Expand by `pad` pixels on every side, clamped to `[0, w] x [0, h]`.
    pub fn expand(&self, pad: u32, w: u32, h: u32) -> PixelRegion {
        PixelRegion {
            left: self.left.saturating_sub(pad),
            top: self.top.saturating_sub(pad),
            right: (self.right + pad).min(w),
            bottom: (self.bottom + pad).min(h),
        }
    }

    /// Scale about the center by `factor`, clamped to `[0, w] x [0, h]`.
    pub fn scale_about_center(&self, factor: f64, w: u32, h: u32) -> PixelRegion {
        let (cx, cy) = (
            (self.left + self.right) as f64 / 2.0,
            (self.top + self.bottom) as f64 / 2.0,
        );
        let half_w = self.width() as f64 * factor / 2.0;
        let half_h = self.height() as f64 * factor / 2.0;

        PixelRegion {
            left: (cx - half_w).clamp(0.0, w as f64) as u32,
            top: (cy - half_h).clamp(0.0, h as f64) as u32,
            right: (cx + half_w).clamp(0.0, w as f64).ceil() as u32,
            bottom: (cy + half_h).clamp(0.0, h as f64).ceil() as u32,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Map a relative bounding box to a padded pixel region.
///
/// Each edge is clamped into the image independently, so out-of-range
/// boxes shrink instead of producing negative extents. Returns `None`
/// when clamping collapses the region to zero width or height; callers
/// record that as a skipped detection, never as a failure of the run.
pub fn map_to_pixels(bbox: &RelBBox, img_w: u32, img_h: u32, pad: u32) -> Option<PixelRegion> {
    if img_w == 0 || img_h == 0 {
        return None;
    }
    let (wf, hf) = (img_w as f64, img_h as f64);
    let pad = pad as f64;

    let left = (bbox.x * wf - pad).clamp(0.0, wf);
    let top = (bbox.y * hf - pad).clamp(0.0, hf);
    let right = ((bbox.x + bbox.width) * wf + pad).clamp(0.0, wf);
    let bottom = ((bbox.y + bbox.height) * hf + pad).clamp(0.0, hf);

    if !left.is_finite() || !top.is_finite() || !right.is_finite() || !bottom.is_finite() {
        return None;
    }

    let region = PixelRegion {
        left: left.floor() as u32,
        top: top.floor() as u32,
        right: (right.ceil() as u32).min(img_w),
        bottom: (bottom.ceil() as u32).min(img_h),
    };

    if region.right > region.left && region.bottom > region.top {
        Some(region)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_within_bounds() {
        let bbox = RelBBox {
            x: 0.45,
            y: 0.12,
            width: 0.18,
            height: 0.04,
        };
        let region = map_to_pixels(&bbox, 1000, 1400, 0).expect("valid region");
        assert_eq!(region.left, 450);
        assert_eq!(region.top, 168);
        assert_eq!(region.right, 630);
        assert_eq!(region.bottom, 224);
        assert_eq!(region.height(), 56);
    }

    #[test]
    fn clamps_out_of_range_box() {
        let bbox = RelBBox {
            x: -0.2,
            y: 0.5,
            width: 1.5,
            height: 0.7,
        };
        let region = map_to_pixels(&bbox, 100, 100, 0).expect("clamped region");
        assert_eq!(region.left, 0);
        assert_eq!(region.right, 100);
        assert_eq!(region.bottom, 100);
    }

    #[test]
    fn zero_area_box_is_degenerate() {
        let bbox = RelBBox {
            x: 1.2,
            y: 1.2,
            width: 0.1,
            height: 0.1,
        };
        assert!(map_to_pixels(&bbox, 100, 100, 0).is_none());
    }

    #[test]
    fn nan_box_is_degenerate() {
        let bbox = RelBBox {
            x: f64::NAN,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        };
        assert!(map_to_pixels(&bbox, 100, 100, 4).is_none());
    }
}
