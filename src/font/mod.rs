pub mod fitter;
pub mod resolver;

use std::fmt;
use std::sync::Arc;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};

/// Pixel cell size of the built-in bitmap face.
pub const BUILTIN_GLYPH_SIZE: u32 = 8;

/// A resolved font, either a scalable system face or the built-in 8x8
/// bitmap face used when no system font resolves. The built-in face has
/// no continuous size scaling; it renders at integer multiples of its
/// cell size.
#[derive(Clone)]
pub enum FontHandle {
    Scalable {
        family: String,
        font: Arc<FontVec>,
    },
    Builtin,
}

impl FontHandle {
    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin)
    }

    pub fn family_name(&self) -> &str {
        match self {
            FontHandle::Scalable { family, .. } => family,
            FontHandle::Builtin => "builtin-8x8",
        }
    }

    /// Integer pixel multiplier the builtin face uses for `size`.
    pub fn builtin_scale(size: u32) -> u32 {
        (size / BUILTIN_GLYPH_SIZE).max(1)
    }

    /// Rendered width of `text` as a single line at `size` pixels.
    pub fn line_width(&self, size: u32, text: &str) -> f32 {
        match self {
            FontHandle::Scalable { font, .. } => {
                let scaled = font.as_scaled(PxScale::from(size as f32));
                let mut width = 0.0;
                let mut prev: Option<ab_glyph::GlyphId> = None;
                for ch in text.chars() {
                    let id = font.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            FontHandle::Builtin => {
                let cell = BUILTIN_GLYPH_SIZE * Self::builtin_scale(size);
                (text.chars().count() as u32 * cell) as f32
            }
        }
    }

    /// Height of a single text line at `size` pixels.
    pub fn line_height(&self, size: u32) -> f32 {
        match self {
            FontHandle::Scalable { font, .. } => {
                font.as_scaled(PxScale::from(size as f32)).height()
            }
            FontHandle::Builtin => (BUILTIN_GLYPH_SIZE * Self::builtin_scale(size)) as f32,
        }
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::Scalable { family, .. } => write!(f, "Scalable({family})"),
            FontHandle::Builtin => write!(f, "Builtin"),
        }
    }
}
