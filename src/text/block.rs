use crate::{
    Error, Result,
    bitmap::Bitmap,
    color::Color,
    font_flags::FontFlags,
    text::{
        formatted::FormattedRun,
        markup,
        packer::{LineEvent, PackedLine, pack_words},
        segment::{Word, segment_paragraph},
        typesetter::{LayoutContext, Typesetter},
    },
};

/// Number of lines the output bitmap grows by at a time.
pub const LINE_BATCH: usize = 10;

/// Horizontal placement of each line inside the block width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
    /// Stretches every line but the last of a paragraph to the full width.
    Justify,
}

/// Parameters of a wrapped text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlockConfig {
    pub font_name: String,
    /// Height of one line of text in pixels.
    pub font_height: i32,
    /// Extra pixels between lines; may be negative down to `-font_height`.
    pub line_spacing: i32,
    /// Target width lines are wrapped to, in pixels.
    pub width: i32,
    pub alignment: Alignment,
    pub flags: FontFlags,
}

impl Default for TextBlockConfig {
    fn default() -> Self {
        Self {
            font_name: "sans-serif".to_owned(),
            font_height: 20,
            line_spacing: 0,
            width: 200,
            alignment: Alignment::Left,
            flags: FontFlags::empty(),
        }
    }
}

impl TextBlockConfig {
    /// Rejects configurations that cannot produce a block.
    pub fn validate(&self) -> Result<()> {
        if self.font_height <= 0 {
            return Err(Error::InvalidArgument("font_height must be > 0"));
        }
        if self.width <= 0 {
            return Err(Error::InvalidArgument("width must be > 0"));
        }
        if self.line_spacing < -self.font_height {
            return Err(Error::InvalidArgument("line_spacing must be >= -font_height"));
        }
        Ok(())
    }
}

/// Incrementally draws packed lines into a growing bitmap.
///
/// Lines are appended with [`TextBlockBuilder::add_line`] and
/// [`TextBlockBuilder::add_blank_line`]; the bitmap height is over-allocated in
/// batches of [`LINE_BATCH`] lines. [`TextBlockBuilder::finish`] trims it to
/// the used lines and hands the bitmap over.
pub struct TextBlockBuilder<'a> {
    typesetter: Typesetter<'a>,
    bitmap: Bitmap,
    used_lines: usize,
    allocated_lines: usize,
    line_spacing: i32,
    width: i32,
    alignment: Alignment,
}

impl<'a> TextBlockBuilder<'a> {
    pub fn new(ctx: LayoutContext<'a>, config: &'a TextBlockConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            typesetter: Typesetter::new(ctx, &config.font_name, config.font_height),
            bitmap: Bitmap::new(config.width as usize, 0, Color::TRANSPARENT_WHITE),
            used_lines: 0,
            allocated_lines: 0,
            line_spacing: config.line_spacing,
            width: config.width,
            alignment: config.alignment,
        })
    }

    pub fn typesetter(&self) -> &Typesetter<'a> {
        &self.typesetter
    }

    /// Target width the lines are packed to.
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn used_lines(&self) -> usize {
        self.used_lines
    }

    /// Reserves the next row and returns its top coordinate.
    fn allocate_next_line(&mut self) -> i32 {
        self.used_lines += 1;
        if self.used_lines > self.allocated_lines {
            self.allocated_lines += LINE_BATCH;
            self.resize_to_allocated_lines();
        }
        (self.used_lines as i32 - 1) * (self.typesetter.font_height() + self.line_spacing)
    }

    fn resize_to_allocated_lines(&mut self) {
        let height = block_height(
            self.allocated_lines,
            self.typesetter.font_height(),
            self.line_spacing,
        );
        self.bitmap
            .resize(self.bitmap.width(), height, Color::TRANSPARENT_WHITE);
    }

    fn ensure_width(&mut self, right: i32) {
        if right > self.bitmap.width() as i32 {
            self.bitmap.resize(
                right as usize,
                self.bitmap.height(),
                Color::TRANSPARENT_WHITE,
            );
        }
    }

    /// Reserves a row without drawing anything into it.
    pub fn add_blank_line(&mut self) {
        self.allocate_next_line();
    }

    /// Draws `words` as the next row.
    ///
    /// `words_width` is the sum of the word widths. With
    /// `override_align` set, [`Alignment::Justify`] falls back to natural
    /// spacing from the left edge; this is used for the last line of a
    /// paragraph.
    pub fn add_line(&mut self, words: &[Word], words_width: i32, override_align: bool) {
        let top = self.allocate_next_line();
        if words.is_empty() {
            return;
        }

        let spaces_width: i32 = words[..words.len() - 1]
            .iter()
            .map(|w| w.space_width)
            .sum();
        let slack = self.width - words_width - spaces_width;

        let start = match self.alignment {
            Alignment::Right => slack,
            // Truncates toward zero: an odd slack puts the extra pixel on the
            // right-hand side.
            Alignment::Center => slack / 2,
            Alignment::Left | Alignment::Justify => 0,
        }
        .max(0);

        let justify = self.alignment == Alignment::Justify && !override_align && words.len() > 1;
        let gap = if justify {
            (self.width - words_width) as f64 / (words.len() - 1) as f64
        } else {
            0.0
        };

        let mut natural_x = start;
        let mut words_before = 0;
        for (k, word) in words.iter().enumerate() {
            // Justified positions are distributed cumulatively from the line
            // start and rounded once per word, so the last word ends exactly
            // at the target width.
            let x = if justify {
                (words_before as f64 + k as f64 * gap).round() as i32
            } else {
                natural_x
            };

            self.draw_word(word, x, top);

            words_before += word.width;
            natural_x += word.width + word.space_width;
        }
    }

    fn draw_word(&mut self, word: &Word, x: i32, top: i32) {
        let mut cursor = x;
        for part in word.text.parts() {
            let width = self.typesetter.part_width(&part);
            self.ensure_width(cursor + width);
            cursor += self.typesetter.draw_part(&mut self.bitmap, &part, cursor, top);
        }
    }

    /// Adds one paragraph: segments, packs and draws it.
    pub fn add_paragraph(&mut self, paragraph: &FormattedRun) {
        let words = segment_paragraph(paragraph, &self.typesetter);
        for event in pack_words(&words, self.width) {
            match event {
                LineEvent::Blank => self.add_blank_line(),
                LineEvent::Words(PackedLine {
                    range,
                    words_width,
                    is_paragraph_end,
                    ..
                }) => self.add_line(&words[range], words_width, is_paragraph_end),
            }
        }
    }

    /// Trims the bitmap to the used lines and returns it.
    pub fn finish(mut self) -> Bitmap {
        self.allocated_lines = self.used_lines;
        self.resize_to_allocated_lines();
        self.bitmap
    }
}

fn block_height(lines: usize, font_height: i32, line_spacing: i32) -> usize {
    if lines == 0 {
        return 0;
    }
    let lines = lines as i64;
    let height = font_height as i64 * lines + line_spacing as i64 * (lines - 1);
    height.max(0) as usize
}

/// Lays out `text` (with markup) wrapped to `config.width` and renders it.
///
/// Every `'\n'` starts a new paragraph; empty paragraphs become blank rows.
/// The returned bitmap is `config.width` wide unless a word or entity wider
/// than that forced it to grow, and exactly as tall as the used rows.
pub fn create_text(ctx: LayoutContext<'_>, text: &str, config: &TextBlockConfig) -> Result<Bitmap> {
    let mut builder = TextBlockBuilder::new(ctx, config)?;

    let run = markup::parse(text, Color::WHITE, config.flags);
    for paragraph in run.split_lines() {
        builder.add_paragraph(&paragraph);
    }

    log::debug!(
        "Laid out {} chars into {} lines ({:?}, width {})",
        run.len(),
        builder.used_lines(),
        config.alignment,
        config.width
    );

    Ok(builder.finish())
}

/// Renders `text` without wrapping: one row per input line, each
/// `font_height` tall. The bitmap is as wide as the widest line.
pub fn create_text_line(
    ctx: LayoutContext<'_>,
    text: &str,
    font_name: &str,
    font_height: i32,
    flags: FontFlags,
) -> Result<Bitmap> {
    if font_height <= 0 {
        return Err(Error::InvalidArgument("font_height must be > 0"));
    }

    let typesetter = Typesetter::new(ctx, font_name, font_height);
    let lines = markup::parse(text, Color::WHITE, flags).split_lines();
    let mut bitmap = Bitmap::new(
        0,
        lines.len() * font_height as usize,
        Color::TRANSPARENT_WHITE,
    );

    for (i, line) in lines.iter().enumerate() {
        let top = i as i32 * font_height;
        let mut x = 0;
        for part in line.parts() {
            let width = typesetter.part_width(&part);
            if x + width > bitmap.width() as i32 {
                bitmap.resize(
                    (x + width) as usize,
                    bitmap.height(),
                    Color::TRANSPARENT_WHITE,
                );
            }
            x += typesetter.draw_part(&mut bitmap, &part, x, top);
        }
    }

    Ok(bitmap)
}
