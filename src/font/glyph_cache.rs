use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{Error, Result, font_flags::FontFlags, renderer::Image};

/// Number of characters stored in the direct-indexed table.
const ASCII_RANGE: usize = 128;

/// A glyph image and the factor it is scaled by when measured or drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedGlyph {
    pub image: Image,
    /// `1 / oversampling` for rasterized glyphs, `1.0` for user images.
    pub factor: f64,
}

impl CachedGlyph {
    /// Advance of the glyph in pixels at scale 1.
    pub fn advance(&self) -> f64 {
        self.image.width() as f64 * self.factor
    }
}

/// Bits of `flags` that take part in glyph keys; unknown bits are ignored.
fn key_bits(flags: FontFlags) -> u32 {
    (flags & FontFlags::all()).bits()
}

/// Non-ASCII key: the UTF-8 bytes of the character (zero padded) plus the
/// flag bits. Ordered so the map iterates in byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct GlyphKey {
    utf8: [u8; 4],
    flags: u32,
}

impl GlyphKey {
    fn new(ch: char, flags: FontFlags) -> Self {
        let mut utf8 = [0; 4];
        ch.encode_utf8(&mut utf8);
        Self {
            utf8,
            flags: key_bits(flags),
        }
    }
}

struct GlyphTable {
    /// `ASCII_RANGE * FontFlags::COMBINATIONS` slots, indexed by
    /// `ch * COMBINATIONS + flags`.
    ascii: Vec<Option<CachedGlyph>>,
    other: BTreeMap<GlyphKey, CachedGlyph>,
}

impl GlyphTable {
    fn ascii_index(ch: char, flags: FontFlags) -> Option<usize> {
        let code = ch as usize;
        (code < ASCII_RANGE).then(|| code * FontFlags::COMBINATIONS + key_bits(flags) as usize)
    }

    fn get(&self, ch: char, flags: FontFlags) -> Option<&CachedGlyph> {
        match Self::ascii_index(ch, flags) {
            Some(index) => self.ascii[index].as_ref(),
            None => self.other.get(&GlyphKey::new(ch, flags)),
        }
    }

    fn contains(&self, ch: char, flags: FontFlags) -> bool {
        self.get(ch, flags).is_some()
    }

    fn insert(&mut self, ch: char, flags: FontFlags, glyph: CachedGlyph) {
        match Self::ascii_index(ch, flags) {
            Some(index) => self.ascii[index] = Some(glyph),
            None => {
                self.other.insert(GlyphKey::new(ch, flags), glyph);
            }
        }
    }

    fn len(&self) -> usize {
        self.ascii.iter().flatten().count() + self.other.len()
    }
}

/// Glyph images of one font, keyed by character and [`FontFlags`].
///
/// ASCII characters live in a direct-indexed table, everything else in an
/// ordered map. Each key is rasterized at most once for the lifetime of the
/// cache, also when several threads miss on the same key at the same time:
/// the rasterization runs under the write lock after re-checking the table,
/// so the first writer wins and later threads reuse its image.
pub struct GlyphCache {
    table: RwLock<GlyphTable>,
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(GlyphTable {
                ascii: vec![None; ASCII_RANGE * FontFlags::COMBINATIONS],
                other: BTreeMap::new(),
            }),
        }
    }

    pub fn get(&self, ch: char, flags: FontFlags) -> Option<CachedGlyph> {
        self.table.read().get(ch, flags).cloned()
    }

    /// Returns the cached glyph, calling `rasterize` only on the first miss.
    pub fn get_or_rasterize(
        &self,
        ch: char,
        flags: FontFlags,
        rasterize: impl FnOnce() -> CachedGlyph,
    ) -> CachedGlyph {
        if let Some(glyph) = self.table.read().get(ch, flags) {
            return glyph.clone();
        }

        let mut table = self.table.write();
        if let Some(glyph) = table.get(ch, flags) {
            return glyph.clone();
        }

        log::trace!("Glyph cache miss for {ch:?} ({flags:?})");
        let glyph = rasterize();
        table.insert(ch, flags, glyph.clone());
        glyph
    }

    /// Stores a glyph for a key that has none yet.
    pub fn set(&self, ch: char, flags: FontFlags, glyph: CachedGlyph) -> Result<()> {
        let mut table = self.table.write();
        if table.contains(ch, flags) {
            return Err(Error::GlyphAlreadySet { ch, flags });
        }
        table.insert(ch, flags, glyph);
        Ok(())
    }

    /// Stores `glyph` for every flag combination of `ch`.
    ///
    /// Either all combinations are set or, if any of them already has an
    /// image, none is.
    pub fn set_all_flags(&self, ch: char, glyph: CachedGlyph) -> Result<()> {
        let mut table = self.table.write();
        if let Some(flags) = FontFlags::combinations().find(|&flags| table.contains(ch, flags)) {
            return Err(Error::GlyphAlreadySet { ch, flags });
        }
        for flags in FontFlags::combinations() {
            table.insert(ch, flags, glyph.clone());
        }
        Ok(())
    }

    /// Number of cached glyphs.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
