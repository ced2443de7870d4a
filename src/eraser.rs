//! Rectangular erasure of source text.
//!
//! The mask's full geometry is filled, not just the ink footprint;
//! partial fills leave residual stroke fragments behind.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::region::ErasureMask;

/// Fill the mask geometry with the configured background color.
pub fn erase(image: &mut RgbaImage, mask: &ErasureMask, background: Rgba<u8>) {
    let extent = mask.extent;
    if extent.width() == 0 || extent.height() == 0 {
        return;
    }
    let rect = Rect::at(extent.left as i32, extent.top as i32)
        .of_size(extent.width(), extent.height());
    draw_filled_rect_mut(image, rect, background);
}
