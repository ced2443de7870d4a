//! Composites fitted text onto the erased page.

use ab_glyph::PxScale;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use serde::Deserialize;

use crate::font::{BUILTIN_GLYPH_SIZE, FontHandle};
use crate::font::fitter::RenderPlan;
use crate::geometry::PixelRegion;

/// Horizontal placement of each line inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Center,
    Left,
}

/// Draw the plan's wrapped lines into `region` at the fitted offset.
///
/// Returns `false` (render failure) when a wrapped line is empty; a
/// plan with zero lines draws nothing and succeeds. Drawing the same
/// plan onto the same image twice produces byte-identical output.
pub fn render(
    image: &mut RgbaImage,
    plan: &RenderPlan,
    region: PixelRegion,
    alignment: Alignment,
    color: Rgba<u8>,
) -> bool {
    if plan.lines.is_empty() {
        return true;
    }
    if plan.lines.iter().any(|l| l.is_empty()) {
        return false;
    }

    let mut y = region.top + plan.y_offset;
    for line in &plan.lines {
        let line_w = plan.font.line_width(plan.size, line);
        let x = match alignment {
            Alignment::Left => region.left,
            Alignment::Center => {
                let slack = (region.width() as f32 - line_w).max(0.0) / 2.0;
                region.left + slack as u32
            }
        };

        match &plan.font {
            FontHandle::Scalable { font, .. } => {
                draw_text_mut(
                    image,
                    color,
                    x as i32,
                    y as i32,
                    PxScale::from(plan.size as f32),
                    font.as_ref(),
                    line,
                );
            }
            FontHandle::Builtin => {
                draw_builtin_line(image, color, x, y, plan.size, line);
            }
        }

        y += plan.line_advance;
    }
    true
}

/// Rasterize a line with the 8x8 bitmap face at an integer scale.
/// Glyphs outside the basic plane are skipped but still advance.
fn draw_builtin_line(image: &mut RgbaImage, color: Rgba<u8>, x: u32, y: u32, size: u32, line: &str) {
    let scale = FontHandle::builtin_scale(size);
    let cell = BUILTIN_GLYPH_SIZE * scale;

    let mut pen_x = x;
    for ch in line.chars() {
        if let Some(glyph) = BASIC_FONTS.get(ch) {
            for (row_idx, row) in glyph.iter().enumerate() {
                for bit in 0..BUILTIN_GLYPH_SIZE {
                    if (*row >> bit) & 1 == 0 {
                        continue;
                    }
                    // Scale each set bit to a scale x scale block, clipped.
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let px = pen_x + bit * scale + dx;
                            let py = y + row_idx as u32 * scale + dy;
                            if px < image.width() && py < image.height() {
                                image.put_pixel(px, py, color);
                            }
                        }
                    }
                }
            }
        }
        pen_x += cell;
    }
}
