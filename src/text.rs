/// Wrapped text blocks: the line builder and the public entry points.
pub mod block;
/// Character runs carrying color, flags and entity references.
pub mod formatted;
/// Inline markup parser producing formatted runs.
pub mod markup;
/// Greedy line packing.
pub mod packer;
/// Word segmentation of a paragraph.
pub mod segment;
/// Shared measuring and drawing of style parts.
pub mod typesetter;

pub use block::{Alignment, TextBlockBuilder, TextBlockConfig, create_text, create_text_line};
pub use formatted::{FormattedChar, FormattedRun, StylePart, StyleParts};
pub use packer::{LineEvent, PackedLine, pack_words};
pub use segment::{Word, is_break_space, is_breaking_asian_glyph, segment_paragraph};
pub use typesetter::{LayoutContext, Typesetter};
