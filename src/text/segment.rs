use crate::text::{formatted::FormattedRun, typesetter::Typesetter};

/// Whether `ch` belongs to a script that is written without spaces, so each
/// glyph is a valid line break opportunity on its own.
///
/// Covers Hiragana, Katakana, the CJK Unified Ideographs block and the CJK
/// Compatibility Ideographs block.
pub fn is_breaking_asian_glyph(ch: char) -> bool {
    matches!(
        ch as u32,
        0x3040..=0x3096 | 0x30a0..=0x30fa | 0x4e00..=0x9fff | 0xf900..=0xfaff
    )
}

/// Whitespace that separates words. No-break spaces (U+00A0, U+2007,
/// U+202F) are whitespace too but glue their neighbours into one word.
pub fn is_break_space(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\u{a0}' | '\u{2007}' | '\u{202f}')
}

/// Unbreakable horizontal unit of a paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: FormattedRun,
    pub width: i32,
    /// Width of the whitespace following the word; 0 at the end of a
    /// paragraph and before Asian glyphs.
    pub space_width: i32,
    /// Set on the last word of a paragraph.
    pub is_end_of_line: bool,
}

impl Word {
    pub fn is_whitespace(&self) -> bool {
        self.text
            .chars()
            .first()
            .is_some_and(|c| c.entity.is_none() && is_break_space(c.ch))
    }
}

/// Splits one paragraph into words.
///
/// Whitespace ends the pending word and becomes its trailing space; further
/// consecutive whitespace widens that trailing space. Whitespace before the
/// first word is dropped. Each breaking Asian glyph is a word of its own, and
/// the text in front of it is flushed first, so `"AB中C"` yields `AB`, `中`,
/// `C`.
///
/// An empty or whitespace-only paragraph yields no words, which the packer
/// turns into a blank line.
pub fn segment_paragraph(paragraph: &FormattedRun, typesetter: &Typesetter<'_>) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut begin = 0;

    let flush = |words: &mut Vec<Word>, from: usize, to: usize, space_width: i32| {
        let text = paragraph.range(from..to);
        let width = typesetter.run_width(&text);
        words.push(Word {
            text,
            width,
            space_width,
            is_end_of_line: false,
        });
    };

    for (cur, c) in paragraph.chars().iter().enumerate() {
        if c.entity.is_none() && is_break_space(c.ch) {
            let space = typesetter.space_width(c.flags);
            if begin != cur {
                flush(&mut words, begin, cur, space);
            } else if let Some(previous) = words.last_mut() {
                previous.space_width += space;
            }
            begin = cur + 1;
        } else if c.entity.is_none() && is_breaking_asian_glyph(c.ch) {
            if begin != cur {
                flush(&mut words, begin, cur, 0);
            }
            flush(&mut words, cur, cur + 1, 0);
            begin = cur + 1;
        }
    }

    if begin < paragraph.len() {
        flush(&mut words, begin, paragraph.len(), 0);
    }

    if let Some(last) = words.last_mut() {
        last.space_width = 0;
        last.is_end_of_line = true;
    }

    words
}
