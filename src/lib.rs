//! # Kumihan
//!
//! Word-wrapped text blocks and glyph-cached fonts rendered on the CPU.
//!
//! ## Overview
//!
//! `Kumihan` turns text with inline markup into pixels. The entry point is
//! the [`TextSystem`], which owns a [`Rasterizer`] and the registry of inline
//! entities (small bitmaps referenced from text as `&name;`).
//!
//! Two ways of drawing text are offered:
//!
//! * [`TextSystem::create_text`] lays a whole block out into one [`Bitmap`]:
//!   paragraphs are split into words, words are packed greedily into lines of
//!   the configured width, and lines are aligned left, right, centered or
//!   justified.
//! * [`Font`] caches one image per glyph and issues a draw call per character
//!   to a [`renderer::Canvas`], which suits scaled and rotated labels.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kumihan::{TextSystem, text::{Alignment, TextBlockConfig}};
//!
//! let system = TextSystem::with_system_fonts();
//! let config = TextBlockConfig {
//!     width: 320,
//!     alignment: Alignment::Justify,
//!     ..Default::default()
//! };
//! let bitmap = system
//!     .create_text("Hello <b>bold</b> and <c=f80>orange</c> world", &config)
//!     .unwrap();
//! assert_eq!(bitmap.width(), 320);
//! ```
//!
//! ## Markup
//!
//! *   `<b>`, `<i>`, `<u>` and their closing tags toggle bold, italic and
//!     underline; they nest.
//! *   `<c=rgb>`, `<c=rrggbb>`, `<c=aarrggbb>` push a color, `</c>` pops it.
//! *   `&lt;`, `&gt;` and `&amp;` are escapes; any other `&name;` is an entity.
//!
//! Malformed markup is kept as literal text.

pub mod bitmap;
pub mod color;
pub mod entity;
pub mod font;
pub mod font_flags;
pub mod font_storage;
pub mod rasterizer;
pub mod renderer;
pub mod text;
pub mod text_system;

// common re-exports
pub use bitmap::Bitmap;
pub use color::Color;
pub use entity::EntityRegistry;
pub use font::Font;
pub use font_flags::FontFlags;
pub use font_storage::FontStorage;
pub use rasterizer::Rasterizer;
pub use text_system::TextSystem;

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;

/// Errors reported by layout and font operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A caller-supplied value is out of range. Reported before any work is
    /// done, so no partial output exists.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The glyph already has an image; the cache was left unchanged.
    #[error("glyph {ch:?} with flags {flags:?} already has an image")]
    GlyphAlreadySet { ch: char, flags: FontFlags },
}

pub type Result<T> = std::result::Result<T, Error>;
