use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    bitmap::Bitmap, color::Color, font_flags::FontFlags, font_storage::FontStorage,
    rasterizer::Rasterizer,
};

/// [`Rasterizer`] backed by `fontdb` face lookup and `fontdue` rasterization.
///
/// `font_height` is treated as the full line height: the pixel size passed to
/// fontdue is scaled so that ascent + descent + line gap of the face equals
/// the requested height.
pub struct FontdueRasterizer {
    storage: Mutex<FontStorage>,
}

impl Default for FontdueRasterizer {
    fn default() -> Self {
        Self::new(FontStorage::new())
    }
}

impl FontdueRasterizer {
    pub fn new(storage: FontStorage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    /// Creates a rasterizer with the system fonts loaded.
    pub fn with_system_fonts() -> Self {
        let mut storage = FontStorage::new();
        storage.load_system_fonts();
        Self::new(storage)
    }

    /// The underlying font storage, e.g. to load additional font files.
    pub fn storage(&self) -> &Mutex<FontStorage> {
        &self.storage
    }

    fn face(&self, font_name: &str, flags: FontFlags) -> Option<Arc<fontdue::Font>> {
        self.storage.lock().resolve(font_name, flags)
    }
}

/// One glyph placed along the pen line, relative to the run origin.
struct PlacedGlyph {
    index: u16,
    pen_x: f32,
}

/// Shapes `text` into pen positions, applying kerning between neighbours.
///
/// Returns the placed glyphs, the total advance and the pixel size used.
fn place_glyphs(font: &fontdue::Font, text: &str, font_height: i32) -> (Vec<PlacedGlyph>, f32, f32) {
    let px = pixel_size(font, font_height);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut previous: Option<u16> = None;

    for ch in text.chars() {
        let index = font.lookup_glyph_index(ch);
        if let Some(prev) = previous {
            pen += font.horizontal_kern_indexed(prev, index, px).unwrap_or(0.0);
        }
        glyphs.push(PlacedGlyph { index, pen_x: pen });
        pen += font.metrics_indexed(index, px).advance_width;
        previous = Some(index);
    }

    (glyphs, pen, px)
}

fn pixel_size(font: &fontdue::Font, font_height: i32) -> f32 {
    let height = font_height as f32;
    match font.horizontal_line_metrics(height) {
        Some(metrics) if metrics.new_line_size > 0.0 => height * height / metrics.new_line_size,
        _ => height,
    }
}

impl Rasterizer for FontdueRasterizer {
    fn text_width(&self, text: &str, font_name: &str, font_height: i32, flags: FontFlags) -> i32 {
        let Some(font) = self.face(font_name, flags) else {
            return 0;
        };
        let (_, advance, _) = place_glyphs(&font, text, font_height);
        advance.ceil() as i32
    }

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
    ) {
        let Some(font) = self.face(font_name, flags) else {
            return;
        };

        let (glyphs, advance, px) = place_glyphs(&font, text, font_height);
        let ascent = font
            .horizontal_line_metrics(px)
            .map(|metrics| metrics.ascent)
            .unwrap_or(px);
        let baseline = y + ascent.round() as i32;

        for glyph in &glyphs {
            let (metrics, coverage) = font.rasterize_indexed(glyph.index, px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }

            // fontdue reports ymin relative to the baseline, y axis up.
            let origin_x = x + (glyph.pen_x + metrics.xmin as f32).round() as i32;
            let origin_y = baseline - (metrics.ymin + metrics.height as i32);

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    bitmap.blend(origin_x + col as i32, origin_y + row as i32, color, alpha);
                }
            }
        }

        if flags.contains(FontFlags::UNDERLINE) {
            let row = (baseline + 1).min(y + font_height - 1);
            for col in x..x + advance.ceil() as i32 {
                bitmap.blend(col, row, color, 255);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fonts_measure_zero_and_draw_nothing() {
        let rasterizer = FontdueRasterizer::default();
        assert_eq!(rasterizer.text_width("hello", "serif", 20, FontFlags::empty()), 0);

        let mut bmp = Bitmap::new(10, 10, Color::TRANSPARENT_WHITE);
        rasterizer.draw_text(&mut bmp, "hello", 0, 0, Color::WHITE, "serif", 20, FontFlags::UNDERLINE);
        assert!(bmp.is_transparent());
    }
}
