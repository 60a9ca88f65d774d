use bitflags::bitflags;

bitflags! {
    /// Style flags that select a font variant and decoration.
    ///
    /// The flags take part in every glyph key, so the same character drawn
    /// bold and regular is cached as two separate glyphs.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct FontFlags: u32 {
        const BOLD = 0b001;
        const ITALIC = 0b010;
        const UNDERLINE = 0b100;
    }
}

impl FontFlags {
    /// Number of distinct flag combinations.
    pub const COMBINATIONS: usize = 8;

    /// Iterates over every flag combination, `0..COMBINATIONS`.
    pub fn combinations() -> impl Iterator<Item = FontFlags> {
        (0..Self::COMBINATIONS as u32).map(FontFlags::from_bits_truncate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_cover_every_bit_pattern_once() {
        let all: Vec<_> = FontFlags::combinations().collect();
        assert_eq!(all.len(), FontFlags::COMBINATIONS);
        assert_eq!(all[0], FontFlags::empty());
        assert_eq!(all[7], FontFlags::all());
    }
}
