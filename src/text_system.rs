use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    Result,
    bitmap::Bitmap,
    entity::EntityRegistry,
    font::Font,
    font_flags::FontFlags,
    rasterizer::{FontdueRasterizer, Rasterizer},
    text::{self, LayoutContext, TextBlockConfig},
};

/// High-level entry point for text rendering.
///
/// Owns the rasterizer shared by every layout call and font, plus the
/// registry of inline entities referenced from markup as `&name;`.
///
/// All methods take `&self`; the entity registry sits behind a `RwLock` so a
/// `TextSystem` can be shared between threads, which is common in UI
/// frameworks.
pub struct TextSystem {
    rasterizer: Arc<dyn Rasterizer>,
    entities: RwLock<EntityRegistry>,
}

impl TextSystem {
    /// Creates a text system drawing with `rasterizer`.
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            entities: RwLock::new(EntityRegistry::new()),
        }
    }

    /// Creates a text system that renders with the fonts installed on the
    /// system.
    pub fn with_system_fonts() -> Self {
        Self::new(Arc::new(FontdueRasterizer::with_system_fonts()))
    }

    pub fn rasterizer(&self) -> &Arc<dyn Rasterizer> {
        &self.rasterizer
    }
}

/// entities
impl TextSystem {
    /// Registers `bitmap` as the entity `&name;`, replacing any previous one.
    pub fn register_entity(&self, name: impl Into<Arc<str>>, bitmap: Bitmap) {
        self.entities.write().register(name, bitmap);
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.read().contains(name)
    }
}

/// layout
impl TextSystem {
    /// Lays out `text` wrapped to `config.width`. See [`text::create_text`].
    pub fn create_text(&self, text: &str, config: &TextBlockConfig) -> Result<Bitmap> {
        let entities = self.entities.read();
        text::create_text(LayoutContext::new(&*self.rasterizer, &entities), text, config)
    }

    /// Renders `text` one row per line without wrapping. See
    /// [`text::create_text_line`].
    pub fn create_text_line(
        &self,
        text: &str,
        font_name: &str,
        font_height: i32,
        flags: FontFlags,
    ) -> Result<Bitmap> {
        let entities = self.entities.read();
        text::create_text_line(
            LayoutContext::new(&*self.rasterizer, &entities),
            text,
            font_name,
            font_height,
            flags,
        )
    }

    /// Creates a glyph-cached [`Font`] sharing this system's rasterizer.
    pub fn font(&self, height: i32, name: impl Into<String>, flags: FontFlags) -> Result<Font> {
        Font::new(self.rasterizer.clone(), height, name, flags)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, color::Color, rasterizer::BoxRasterizer, text::Alignment};

    fn box_system() -> TextSystem {
        TextSystem::new(Arc::new(BoxRasterizer))
    }

    fn config(width: i32) -> TextBlockConfig {
        TextBlockConfig {
            font_name: "box".into(),
            font_height: 10,
            width,
            ..Default::default()
        }
    }

    #[test]
    fn create_text_wraps_to_the_configured_width() {
        let system = box_system();
        // Each word is 15px plus a 2px space: two fit in 40px.
        let bitmap = system.create_text("aaa bbb ccc", &config(40)).unwrap();
        assert_eq!(bitmap.width(), 40);
        assert_eq!(bitmap.height(), 20);
    }

    #[test]
    fn invalid_configs_fail_before_layout() {
        let system = box_system();
        assert!(matches!(
            system.create_text("a", &config(0)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(system.create_text_line("a", "box", 0, FontFlags::empty()).is_err());
        assert!(system.font(0, "box", FontFlags::empty()).is_err());
    }

    #[test]
    fn registered_entities_are_drawn_inline() {
        let system = box_system();
        system.register_entity("dot", Bitmap::new(3, 3, Color::RED));
        assert!(system.has_entity("dot"));

        let bitmap = system
            .create_text_line("&dot;", "box", 10, FontFlags::empty())
            .unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.get(0, 0), Some(Color::RED));
    }

    #[test]
    fn fonts_share_the_system_rasterizer() {
        let system = box_system();
        let font = system.font(10, "box", FontFlags::empty()).unwrap();
        let block = system
            .create_text_line("abc", "box", 10, FontFlags::empty())
            .unwrap();
        assert_eq!(font.text_width("abc", 1.0), block.width() as f64);
    }

    #[test]
    fn layout_is_deterministic() {
        let system = box_system();
        let config = TextBlockConfig {
            alignment: Alignment::Justify,
            ..config(60)
        };
        let text = "<b>one</b> two <c=f00>three</c> four five";
        assert_eq!(
            system.create_text(text, &config).unwrap(),
            system.create_text(text, &config).unwrap()
        );
    }
}
