use crate::{
    bitmap::Bitmap,
    entity::EntityRegistry,
    font_flags::FontFlags,
    rasterizer::Rasterizer,
    text::formatted::{FormattedRun, StylePart},
};

/// The collaborators a layout call draws with.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub rasterizer: &'a dyn Rasterizer,
    pub entities: &'a EntityRegistry,
}

impl<'a> LayoutContext<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer, entities: &'a EntityRegistry) -> Self {
        Self {
            rasterizer,
            entities,
        }
    }
}

/// Measures and draws style parts in one font.
///
/// Word widths used for wrapping and the cursor advance used while drawing
/// both come from [`Typesetter::part_width`], so a line never drifts from the
/// width it was packed with.
#[derive(Clone, Copy)]
pub struct Typesetter<'a> {
    ctx: LayoutContext<'a>,
    font_name: &'a str,
    font_height: i32,
}

impl<'a> Typesetter<'a> {
    pub fn new(ctx: LayoutContext<'a>, font_name: &'a str, font_height: i32) -> Self {
        Self {
            ctx,
            font_name,
            font_height,
        }
    }

    pub fn font_height(&self) -> i32 {
        self.font_height
    }

    /// Pixel width of a part: the entity bitmap width for entity parts, the
    /// rasterizer's text width otherwise. Unknown entities are zero wide.
    pub fn part_width(&self, part: &StylePart<'_>) -> i32 {
        match part.entity() {
            Some(name) => self
                .ctx
                .entities
                .get(name)
                .map_or(0, |bitmap| bitmap.width() as i32),
            None => self.ctx.rasterizer.text_width(
                &part.text(),
                self.font_name,
                self.font_height,
                part.flags(),
            ),
        }
    }

    pub fn run_width(&self, run: &FormattedRun) -> i32 {
        run.parts().map(|part| self.part_width(&part)).sum()
    }

    pub fn space_width(&self, flags: FontFlags) -> i32 {
        self.ctx
            .rasterizer
            .single_space_width(self.font_name, self.font_height, flags)
    }

    /// Draws `part` with its top-left corner at `(x, y)` and returns the
    /// advance, which always equals [`Typesetter::part_width`].
    pub fn draw_part(&self, bitmap: &mut Bitmap, part: &StylePart<'_>, x: i32, y: i32) -> i32 {
        match part.entity() {
            Some(name) => {
                let Some(entity) = self.ctx.entities.get(name) else {
                    log::warn!("Unknown entity &{name}; drawn as nothing");
                    return 0;
                };
                let alpha = part.color().alpha();
                if alpha == 0xff {
                    bitmap.composite(entity, x, y);
                } else {
                    let mut tinted = Bitmap::clone(entity);
                    tinted.multiply_alpha(alpha);
                    bitmap.composite(&tinted, x, y);
                }
                entity.width() as i32
            }
            None => {
                let text = part.text();
                self.ctx.rasterizer.draw_text(
                    bitmap,
                    &text,
                    x,
                    y,
                    part.color(),
                    self.font_name,
                    self.font_height,
                    part.flags(),
                );
                self.ctx
                    .rasterizer
                    .text_width(&text, self.font_name, self.font_height, part.flags())
            }
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color, rasterizer::BoxRasterizer, text::markup};

    #[test]
    fn draw_advance_matches_measured_width() {
        let rasterizer = BoxRasterizer::new();
        let mut entities = EntityRegistry::new();
        entities.register("dot", Bitmap::new(7, 3, Color::WHITE));
        let ts = Typesetter::new(LayoutContext::new(&rasterizer, &entities), "any", 10);

        let run = markup::parse("ab<b>cd</b>&dot;&nope;", Color::WHITE, FontFlags::empty());
        let mut bmp = Bitmap::new(100, 10, Color::TRANSPARENT_WHITE);
        let mut x = 0;
        for part in run.parts() {
            let advance = ts.draw_part(&mut bmp, &part, x, 0);
            assert_eq!(advance, ts.part_width(&part));
            x += advance;
        }
        assert_eq!(x, ts.run_width(&run));
        assert_eq!(x, 10 + 12 + 7);
    }

    #[test]
    fn entity_alpha_follows_run_color() {
        let rasterizer = BoxRasterizer::new();
        let mut entities = EntityRegistry::new();
        entities.register("dot", Bitmap::new(1, 1, Color::WHITE));
        let ts = Typesetter::new(LayoutContext::new(&rasterizer, &entities), "any", 10);

        let run = markup::parse("<c=80ffffff>&dot;", Color::WHITE, FontFlags::empty());
        let part = run.parts().next().unwrap();
        let mut bmp = Bitmap::new(1, 1, Color::TRANSPARENT_WHITE);
        ts.draw_part(&mut bmp, &part, 0, 0);
        assert_eq!(bmp.get(0, 0).unwrap().alpha(), 0x80);
    }
}
