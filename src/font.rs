//! Font objects that draw glyph by glyph onto a [`Canvas`].
//!
//! Where [`crate::text`] renders whole blocks into one bitmap, a [`Font`]
//! keeps one image per glyph in its [`GlyphCache`] and issues a draw call per
//! character. That makes scaled, rotated and anchored text cheap once the
//! glyphs are cached.

mod glyph_cache;

pub use glyph_cache::{CachedGlyph, GlyphCache};

use std::sync::Arc;

use euclid::{Angle, vec2};

use crate::{
    Error, Result,
    bitmap::Bitmap,
    color::Color,
    font_flags::FontFlags,
    rasterizer::Rasterizer,
    renderer::{Canvas, Image, Transform},
    text::{FormattedChar, markup},
};

/// Glyphs are rasterized at this multiple of the font height and scaled down
/// when measured and drawn.
pub const OVERSAMPLING: i32 = 2;

/// A named font at a fixed height with default style flags.
///
/// Text passed to [`Font::text_width`] and the draw methods may contain
/// markup; `<b>` etc. add to the font's own flags and `<c=..>` colors are
/// multiplied with the draw color. Entity references have no glyph here and
/// are skipped.
pub struct Font {
    name: String,
    /// Rasterization height, `OVERSAMPLING` times the requested one.
    height: i32,
    flags: FontFlags,
    rasterizer: Arc<dyn Rasterizer>,
    glyphs: GlyphCache,
}

impl Font {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        height: i32,
        name: impl Into<String>,
        flags: FontFlags,
    ) -> Result<Self> {
        if height <= 0 {
            return Err(Error::InvalidArgument("font height must be > 0"));
        }
        let height = height
            .checked_mul(OVERSAMPLING)
            .ok_or(Error::InvalidArgument("font height is too large"))?;

        Ok(Self {
            name: name.into(),
            height,
            flags,
            rasterizer,
            glyphs: GlyphCache::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height in pixels at scale 1.
    pub fn height(&self) -> i32 {
        self.height / OVERSAMPLING
    }

    pub fn flags(&self) -> FontFlags {
        self.flags
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    fn glyph(&self, ch: char, flags: FontFlags) -> CachedGlyph {
        self.glyphs
            .get_or_rasterize(ch, flags, || self.rasterize(ch, flags))
    }

    fn rasterize(&self, ch: char, flags: FontFlags) -> CachedGlyph {
        let mut buf = [0; 4];
        let text = ch.encode_utf8(&mut buf);

        let width = self
            .rasterizer
            .text_width(text, &self.name, self.height, flags)
            .max(0);
        let mut bitmap = Bitmap::new(
            width as usize,
            self.height as usize,
            Color::TRANSPARENT_WHITE,
        );
        self.rasterizer.draw_text(
            &mut bitmap,
            text,
            0,
            0,
            Color::WHITE,
            &self.name,
            self.height,
            flags,
        );

        log::trace!(
            "Rasterized {ch:?} ({flags:?}) of {} at {}px: {width}px wide",
            self.name,
            self.height
        );

        CachedGlyph {
            image: Image::new(bitmap),
            factor: 1.0 / OVERSAMPLING as f64,
        }
    }

    fn glyph_chars(&self, text: &str) -> Vec<FormattedChar> {
        let run = markup::parse(text, Color::WHITE, self.flags);
        run.chars()
            .iter()
            .filter(|fc| fc.entity.is_none())
            .cloned()
            .collect()
    }

    /// Width of `text` in pixels, horizontally scaled by `scale_x`.
    pub fn text_width(&self, text: &str, scale_x: f64) -> f64 {
        self.glyph_chars(text)
            .iter()
            .map(|fc| self.glyph(fc.ch, fc.flags).advance())
            .sum::<f64>()
            * scale_x
    }

    /// Draws `text` with its top-left corner at `(x, y)`.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f64,
        y: f64,
        z: f64,
        scale_x: f64,
        scale_y: f64,
        color: Color,
    ) {
        self.draw_transformed(
            canvas,
            text,
            x,
            y,
            z,
            scale_x,
            scale_y,
            color,
            &Transform::identity(),
        );
    }

    /// Draws `text` anchored at `(x, y)`.
    ///
    /// `rel_x` and `rel_y` pick the anchor inside the text's box: `(0, 0)` is
    /// the top-left corner, `(0.5, 0.5)` the center, `(1, 1)` the bottom-right.
    pub fn draw_rel(
        &self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f64,
        y: f64,
        z: f64,
        rel_x: f64,
        rel_y: f64,
        scale_x: f64,
        scale_y: f64,
        color: Color,
    ) {
        let x = x - self.text_width(text, 1.0) * scale_x * rel_x;
        let y = y - self.height() as f64 * scale_y * rel_y;
        self.draw(canvas, text, x, y, z, scale_x, scale_y, color);
    }

    /// Draws `text` at `(x, y)` rotated by `angle_degrees` around `(x, y)`.
    pub fn draw_rot(
        &self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f64,
        y: f64,
        z: f64,
        angle_degrees: f64,
        scale_x: f64,
        scale_y: f64,
        color: Color,
    ) {
        let pivot = Transform::translation(-x, -y)
            .then_rotate(Angle::degrees(angle_degrees))
            .then_translate(vec2(x, y));
        self.draw_transformed(canvas, text, x, y, z, scale_x, scale_y, color, &pivot);
    }

    fn draw_transformed(
        &self,
        canvas: &mut dyn Canvas,
        text: &str,
        x: f64,
        y: f64,
        z: f64,
        scale_x: f64,
        scale_y: f64,
        color: Color,
        base: &Transform,
    ) {
        let mut cursor = x;
        for fc in self.glyph_chars(text) {
            let glyph = self.glyph(fc.ch, fc.flags);
            if glyph.image.width() > 0 {
                let transform = Transform::scale(scale_x * glyph.factor, scale_y * glyph.factor)
                    .then_translate(vec2(cursor, y))
                    .then(base);
                canvas.draw_image(&glyph.image, &transform, z, fc.color.multiply(color));
            }
            cursor += glyph.advance() * scale_x;
        }
    }

    /// Replaces the glyph of `ch` drawn with exactly `flags` by `image`.
    ///
    /// The image is used at its own size, without oversampling. Fails if the
    /// glyph already has an image, including one rasterized by an earlier
    /// draw or measurement.
    pub fn set_image(&self, ch: char, flags: FontFlags, image: Image) -> Result<()> {
        self.glyphs.set(ch, flags, CachedGlyph { image, factor: 1.0 })
    }

    /// Like [`Font::set_image`] for every flag combination at once.
    pub fn set_image_all_flags(&self, ch: char, image: Image) -> Result<()> {
        self.glyphs
            .set_all_flags(ch, CachedGlyph { image, factor: 1.0 })
    }
}
