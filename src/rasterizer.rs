//! The glyph rasterizer seam.
//!
//! Layout only ever talks to fonts through [`Rasterizer`]: widths for
//! wrapping decisions and draws into the output bitmap go through the same
//! trait object, which keeps measured and drawn extents identical.

mod box_rasterizer;
mod fontdue_rasterizer;

pub use box_rasterizer::BoxRasterizer;
pub use fontdue_rasterizer::FontdueRasterizer;

use crate::{bitmap::Bitmap, color::Color, font_flags::FontFlags};

/// Turns runs of text into pixel widths and pixels.
///
/// Implementations must be deterministic: the same arguments always produce
/// the same width and the same pixels.
pub trait Rasterizer: Send + Sync {
    /// Width in pixels of `text` set in the given font.
    fn text_width(&self, text: &str, font_name: &str, font_height: i32, flags: FontFlags) -> i32;

    /// Draws `text` with its top-left corner at `(x, y)`.
    ///
    /// Only pixels covered by glyphs are touched; the rest of the bitmap is
    /// left as it was.
    fn draw_text(
        &self,
        bitmap: &mut Bitmap,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        font_name: &str,
        font_height: i32,
        flags: FontFlags,
    );

    /// Width of one space character.
    fn single_space_width(&self, font_name: &str, font_height: i32, flags: FontFlags) -> i32 {
        self.text_width(" ", font_name, font_height, flags)
    }
}
