use crate::{
    bitmap::Bitmap, color::Color, font_flags::FontFlags, rasterizer::Rasterizer,
    text::segment::is_breaking_asian_glyph,
};

/// Rasterizer that draws every glyph as a solid box.
///
/// It needs no font files, so it suits headless previews and tests that
/// assert on exact pixel positions. Advances are derived from the font
/// height alone:
///
/// * whitespace: `font_height / 4` (at least 1), drawn as nothing
/// * breaking Asian glyphs: `font_height`
/// * everything else: `font_height / 2` (at least 1)
///
/// `BOLD` widens non-whitespace glyphs by one pixel and `UNDERLINE` fills the
/// bottom row under the whole run. Each box leaves its rightmost column empty
/// so neighbouring glyphs stay distinguishable.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxRasterizer;

impl BoxRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Advance of a single character.
    pub fn glyph_width(ch: char, font_height: i32, flags: FontFlags) -> i32 {
        if ch.is_whitespace() {
            return (font_height / 4).max(1);
        }
        let base = if is_breaking_asian_glyph(ch) {
            font_height
        } else {
            (font_height / 2).max(1)
        };
        if flags.contains(FontFlags::BOLD) {
            base + 1
        } else {
            base
        }
    }
}

impl Rasterizer for BoxRasterizer {
    fn text_width(&self, text: &str, _font_name: &str, font_height: i32, flags: FontFlags) -> i32 {
        text.chars()
            .map(|ch| Self::glyph_width(ch, font_height, flags))
            .sum()
    }

    fn draw_text(
        &self,
        bitmap: &mut Bitmap,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        _font_name: &str,
        font_height: i32,
        flags: FontFlags,
    ) {
        let mut cursor = x;
        for ch in text.chars() {
            let advance = Self::glyph_width(ch, font_height, flags);
            if !ch.is_whitespace() {
                let ink = if advance > 1 { advance - 1 } else { advance };
                for row in y..y + font_height {
                    for col in cursor..cursor + ink {
                        bitmap.blend(col, row, color, 255);
                    }
                }
            }
            cursor += advance;
        }

        if flags.contains(FontFlags::UNDERLINE) {
            let row = y + font_height - 1;
            for col in x..cursor {
                bitmap.blend(col, row, color, 255);
            }
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_character_classes() {
        let r = BoxRasterizer::new();
        assert_eq!(r.text_width("ab", "any", 20, FontFlags::empty()), 20);
        assert_eq!(r.text_width("a b", "any", 20, FontFlags::empty()), 25);
        assert_eq!(r.text_width("中", "any", 20, FontFlags::empty()), 20);
        assert_eq!(r.text_width("ab", "any", 20, FontFlags::BOLD), 22);
        assert_eq!(r.single_space_width("any", 20, FontFlags::BOLD), 5);
    }

    #[test]
    fn draws_boxes_with_a_gap_column() {
        let r = BoxRasterizer::new();
        let mut bmp = Bitmap::new(30, 10, Color::TRANSPARENT_WHITE);
        r.draw_text(&mut bmp, "ab", 2, 0, Color::RED, "any", 10, FontFlags::empty());

        assert_eq!(bmp.get(1, 0).unwrap().alpha(), 0);
        assert_eq!(bmp.get(2, 0), Some(Color::RED));
        assert_eq!(bmp.get(5, 9), Some(Color::RED));
        // Last column of the first box stays empty.
        assert_eq!(bmp.get(6, 0).unwrap().alpha(), 0);
        assert_eq!(bmp.get(7, 0), Some(Color::RED));
        assert_eq!(bmp.get(12, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn underline_spans_the_run() {
        let r = BoxRasterizer::new();
        let mut bmp = Bitmap::new(20, 10, Color::TRANSPARENT_WHITE);
        r.draw_text(&mut bmp, "a a", 0, 0, Color::RED, "any", 10, FontFlags::UNDERLINE);
        for x in 0..12 {
            assert_eq!(bmp.get(x, 9), Some(Color::RED), "x = {x}");
        }
        assert_eq!(bmp.get(12, 9).unwrap().alpha(), 0);
    }
}
