use std::{ops::Range, sync::Arc};

use crate::{color::Color, font_flags::FontFlags};

/// Character stored in the slot of an inline entity.
pub const ENTITY_PLACEHOLDER: char = '\u{fffc}';

/// One character of a [`FormattedRun`] with its style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedChar {
    pub ch: char,
    pub color: Color,
    pub flags: FontFlags,
    /// Name of the inline entity drawn in place of `ch`.
    pub entity: Option<Arc<str>>,
}

impl FormattedChar {
    pub fn plain(ch: char, color: Color, flags: FontFlags) -> Self {
        Self {
            ch,
            color,
            flags,
            entity: None,
        }
    }

    pub fn entity(name: Arc<str>, color: Color, flags: FontFlags) -> Self {
        Self {
            ch: ENTITY_PLACEHOLDER,
            color,
            flags,
            entity: Some(name),
        }
    }

    fn same_style(&self, other: &FormattedChar) -> bool {
        self.color == other.color
            && self.flags == other.flags
            && self.entity.is_none()
            && other.entity.is_none()
    }
}

/// Immutable text where every character carries color, flags and an optional
/// entity reference. Produced by [`crate::text::markup::parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormattedRun {
    chars: Vec<FormattedChar>,
}

impl FromIterator<FormattedChar> for FormattedRun {
    fn from_iter<I: IntoIterator<Item = FormattedChar>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl FormattedRun {
    pub fn new(chars: Vec<FormattedChar>) -> Self {
        Self { chars }
    }

    /// A run without markup: every character gets `color` and `flags`.
    pub fn unstyled(text: &str, color: Color, flags: FontFlags) -> Self {
        text.chars()
            .map(|ch| FormattedChar::plain(ch, color, flags))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[FormattedChar] {
        &self.chars
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars[index].ch
    }

    pub fn color_at(&self, index: usize) -> Color {
        self.chars[index].color
    }

    pub fn flags_at(&self, index: usize) -> FontFlags {
        self.chars[index].flags
    }

    pub fn entity_at(&self, index: usize) -> Option<&str> {
        self.chars[index].entity.as_deref()
    }

    /// Copies the characters in `range` into a new run.
    pub fn range(&self, range: Range<usize>) -> FormattedRun {
        Self {
            chars: self.chars[range].to_vec(),
        }
    }

    /// The characters without styling. Entities appear as their placeholder.
    pub fn unformat(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Splits at every `'\n'`; `n` line breaks yield `n + 1` paragraphs, so
    /// an empty run is one empty paragraph.
    pub fn split_lines(&self) -> Vec<FormattedRun> {
        self.chars
            .split(|c| c.ch == '\n' && c.entity.is_none())
            .map(|line| FormattedRun {
                chars: line.to_vec(),
            })
            .collect()
    }

    /// Lazily iterates over the style-homogeneous parts of the run.
    pub fn parts(&self) -> StyleParts<'_> {
        StyleParts {
            run: self,
            position: 0,
        }
    }
}

/// Maximal sub-range of a [`FormattedRun`] with one color, one set of flags
/// and no entity, or a single entity character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StylePart<'a> {
    run: &'a FormattedRun,
    range: Range<usize>,
}

impl<'a> StylePart<'a> {
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn color(&self) -> Color {
        self.run.color_at(self.range.start)
    }

    pub fn flags(&self) -> FontFlags {
        self.run.flags_at(self.range.start)
    }

    pub fn entity(&self) -> Option<&'a str> {
        self.run.chars[self.range.start].entity.as_deref()
    }

    pub fn text(&self) -> String {
        self.run.chars[self.range.clone()]
            .iter()
            .map(|c| c.ch)
            .collect()
    }
}

/// Iterator returned by [`FormattedRun::parts`].
#[derive(Clone, Debug)]
pub struct StyleParts<'a> {
    run: &'a FormattedRun,
    position: usize,
}

impl<'a> Iterator for StyleParts<'a> {
    type Item = StylePart<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let chars = &self.run.chars;
        let start = self.position;
        let first = chars.get(start)?;

        let mut end = start + 1;
        while end < chars.len() && first.same_style(&chars[end]) {
            end += 1;
        }

        self.position = end;
        Some(StylePart {
            run: self.run,
            range: start..end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(parts: &[(&str, Color)]) -> FormattedRun {
        parts
            .iter()
            .flat_map(|(text, color)| {
                text.chars()
                    .map(|ch| FormattedChar::plain(ch, *color, FontFlags::empty()))
            })
            .collect()
    }

    #[test]
    fn parts_reconstruct_the_run() {
        let run = styled(&[("ab", Color::RED), ("cd", Color::BLUE), ("e", Color::RED)]);
        let parts: Vec<_> = run.parts().collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].text(), "ab");
        assert_eq!(parts[1].color(), Color::BLUE);
        assert_eq!(parts[2].range(), 4..5);

        let joined: String = parts.iter().map(|p| p.text()).collect();
        assert_eq!(joined, run.unformat());
        // Restartable.
        assert_eq!(run.parts().count(), 3);
    }

    #[test]
    fn entities_are_single_character_parts() {
        let name: Arc<str> = Arc::from("star");
        let run = FormattedRun::new(vec![
            FormattedChar::plain('a', Color::WHITE, FontFlags::empty()),
            FormattedChar::entity(Arc::clone(&name), Color::WHITE, FontFlags::empty()),
            FormattedChar::entity(name, Color::WHITE, FontFlags::empty()),
            FormattedChar::plain('b', Color::WHITE, FontFlags::empty()),
        ]);

        let parts: Vec<_> = run.parts().collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[1].entity(), Some("star"));
        assert_eq!(parts[1].len(), 1);
        assert_eq!(parts[3].entity(), None);
    }

    #[test]
    fn split_lines_keeps_empty_paragraphs() {
        let run = FormattedRun::unstyled("a\n\nb", Color::WHITE, FontFlags::empty());
        let lines: Vec<_> = run.split_lines().iter().map(|l| l.unformat()).collect();
        assert_eq!(lines, ["a", "", "b"]);

        let empty = FormattedRun::default();
        assert_eq!(empty.split_lines().len(), 1);
        assert_eq!(empty.parts().count(), 0);
    }

    #[test]
    fn range_copies_styles() {
        let run = styled(&[("ab", Color::RED), ("cd", Color::BLUE)]);
        let sub = run.range(1..3);
        assert_eq!(sub.unformat(), "bc");
        assert_eq!(sub.color_at(0), Color::RED);
        assert_eq!(sub.color_at(1), Color::BLUE);
    }
}
