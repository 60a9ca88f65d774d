//! Minimal inline markup.
//!
//! Supported syntax:
//!
//! * `<b>`, `<i>`, `<u>` and their closing tags toggle [`FontFlags`]; tags
//!   nest, so `<b><b>x</b>y</b>` keeps `y` bold.
//! * `<c=rgb>`, `<c=rrggbb>` and `<c=aarrggbb>` push a color, `</c>` pops it.
//! * `&lt;`, `&gt;` and `&amp;` produce the escaped character.
//! * any other `&name;` (ASCII letters, digits, `_`) becomes an inline entity.
//!
//! Anything that does not parse as one of the above is kept as literal text,
//! so malformed markup never fails.

use std::sync::Arc;

use crate::{
    color::Color,
    font_flags::FontFlags,
    text::formatted::{FormattedChar, FormattedRun},
};

/// Longest tag, `<c=aarrggbb>`.
const MAX_TAG_LEN: usize = 12;
/// Longest entity reference, `&` + 32 name bytes + `;`.
const MAX_ENTITY_LEN: usize = 34;

/// Position of `delim` within the first `limit` bytes of `text`.
///
/// Bounding the search keeps unterminated `<` and `&` from scanning the rest
/// of the input, which would make parsing quadratic.
fn find_within(text: &str, delim: u8, limit: usize) -> Option<usize> {
    text.as_bytes().iter().take(limit).position(|&b| b == delim)
}

/// Parses `text` into a [`FormattedRun`], starting with `color` and `flags`.
pub fn parse(text: &str, color: Color, flags: FontFlags) -> FormattedRun {
    let mut parser = Parser {
        base_flags: flags,
        bold: 0,
        italic: 0,
        underline: 0,
        colors: vec![color],
        out: Vec::with_capacity(text.len()),
    };
    parser.run(text);
    FormattedRun::new(parser.out)
}

struct Parser {
    base_flags: FontFlags,
    bold: u32,
    italic: u32,
    underline: u32,
    /// Never empty; the first entry is the base color.
    colors: Vec<Color>,
    out: Vec<FormattedChar>,
}

impl Parser {
    fn run(&mut self, text: &str) {
        let mut rest = text;
        while let Some(ch) = rest.chars().next() {
            let consumed = match ch {
                '<' => self.tag(rest),
                '&' => self.entity(rest),
                _ => None,
            };

            match consumed {
                Some(len) => rest = &rest[len..],
                None => {
                    self.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
    }

    fn flags(&self) -> FontFlags {
        let mut flags = self.base_flags;
        flags.set(FontFlags::BOLD, flags.contains(FontFlags::BOLD) || self.bold > 0);
        flags.set(FontFlags::ITALIC, flags.contains(FontFlags::ITALIC) || self.italic > 0);
        flags.set(
            FontFlags::UNDERLINE,
            flags.contains(FontFlags::UNDERLINE) || self.underline > 0,
        );
        flags
    }

    fn color(&self) -> Color {
        self.colors.last().copied().unwrap_or(Color::WHITE)
    }

    fn push(&mut self, ch: char) {
        let c = FormattedChar::plain(ch, self.color(), self.flags());
        self.out.push(c);
    }

    /// Handles a tag at the start of `text`, returning its byte length.
    fn tag(&mut self, text: &str) -> Option<usize> {
        let end = find_within(text, b'>', MAX_TAG_LEN)?;
        let body = &text[1..end];

        match body {
            "b" => self.bold += 1,
            "/b" => self.bold = self.bold.saturating_sub(1),
            "i" => self.italic += 1,
            "/i" => self.italic = self.italic.saturating_sub(1),
            "u" => self.underline += 1,
            "/u" => self.underline = self.underline.saturating_sub(1),
            "/c" => {
                if self.colors.len() > 1 {
                    self.colors.pop();
                }
            }
            _ => {
                let hex = body.strip_prefix("c=")?;
                let color = parse_hex_color(hex)?;
                self.colors.push(color);
            }
        }

        Some(end + 1)
    }

    /// Handles an entity at the start of `text`, returning its byte length.
    fn entity(&mut self, text: &str) -> Option<usize> {
        let end = find_within(text, b';', MAX_ENTITY_LEN)?;
        let name = &text[1..end];
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }

        match name {
            "lt" => self.push('<'),
            "gt" => self.push('>'),
            "amp" => self.push('&'),
            _ => {
                let c = FormattedChar::entity(Arc::from(name), self.color(), self.flags());
                self.out.push(c);
            }
        }

        Some(end + 1)
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        3 => {
            let expand = |nibble: u32| ((nibble & 0xf) * 0x11) as u8;
            Some(Color::rgb(
                expand(value >> 8),
                expand(value >> 4),
                expand(value),
            ))
        }
        6 => Some(Color(0xff00_0000 | value)),
        8 => Some(Color(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_plain(text: &str) -> FormattedRun {
        parse(text, Color::WHITE, FontFlags::empty())
    }

    #[test]
    fn flags_nest_and_unbalanced_closers_are_ignored() {
        let run = parse_plain("</b>a<b>b<b>c</b>d</b>e");
        assert_eq!(run.unformat(), "abcde");
        assert_eq!(run.flags_at(0), FontFlags::empty());
        assert_eq!(run.flags_at(1), FontFlags::BOLD);
        assert_eq!(run.flags_at(3), FontFlags::BOLD);
        assert_eq!(run.flags_at(4), FontFlags::empty());
    }

    #[test]
    fn base_flags_survive_closing_tags() {
        let run = parse("<i>a</i>b", Color::WHITE, FontFlags::UNDERLINE);
        assert_eq!(run.flags_at(0), FontFlags::UNDERLINE | FontFlags::ITALIC);
        assert_eq!(run.flags_at(1), FontFlags::UNDERLINE);
    }

    #[test]
    fn color_tags_form_a_stack() {
        let run = parse_plain("<c=f00>a<c=ff00ff00>b</c>c</c></c>d");
        assert_eq!(run.unformat(), "abcd");
        assert_eq!(run.color_at(0), Color::RED);
        assert_eq!(run.color_at(1), Color(0xff00_ff00));
        assert_eq!(run.color_at(2), Color::RED);
        assert_eq!(run.color_at(3), Color::WHITE);

        let run = parse_plain("<c=0000ff>x");
        assert_eq!(run.color_at(0), Color::BLUE);
    }

    #[test]
    fn escapes_and_entities() {
        let run = parse_plain("&lt;a&gt; &amp; &star;!");
        assert_eq!(run.len(), 8);
        assert_eq!(run.char_at(0), '<');
        assert_eq!(run.char_at(2), '>');
        assert_eq!(run.char_at(4), '&');
        assert_eq!(run.entity_at(6), Some("star"));
        assert_eq!(run.entity_at(7), None);
    }

    #[test]
    fn malformed_markup_is_literal() {
        for text in ["a < b", "<c=zz>", "<c=12345>", "&;", "& x;", "&unterminated", "<q>"] {
            assert_eq!(parse_plain(text).unformat(), text, "{text:?}");
        }
    }

    #[test]
    fn tokens_longer_than_any_valid_one_are_literal() {
        let long_name = format!("&{};", "x".repeat(40));
        assert_eq!(parse_plain(&long_name).unformat(), long_name);
        assert_eq!(parse_plain("<c=ff00ff00 >").unformat(), "<c=ff00ff00 >");

        let max_name = format!("&{};", "y".repeat(32));
        assert_eq!(parse_plain(&max_name).entity_at(0), Some("y".repeat(32).as_str()));
        assert_eq!(parse_plain("<c=ff00ff00>a").color_at(0), Color::GREEN);
    }

    #[test]
    fn long_runs_of_unterminated_markup_stay_literal() {
        for unit in ["<", "& ", "&a", "<c=1"] {
            let text = unit.repeat(50_000);
            let run = parse_plain(&text);
            assert_eq!(run.len(), text.chars().count(), "{unit:?}");
            assert_eq!(run.unformat(), text);
        }
    }
}
