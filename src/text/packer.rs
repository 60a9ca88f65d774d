use std::ops::Range;

use crate::text::segment::Word;

/// A run of words assigned to one output row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedLine {
    /// Indices into the word slice given to [`pack_words`].
    pub range: Range<usize>,
    /// Sum of the word widths.
    pub words_width: i32,
    /// Natural spacing between the words: the trailing spaces of every word
    /// except the last.
    pub spaces_width: i32,
    /// Last line of the paragraph; never stretched by justification.
    pub is_paragraph_end: bool,
}

impl PackedLine {
    pub fn word_count(&self) -> usize {
        self.range.len()
    }
}

/// Output of the packer, one event per output row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineEvent {
    /// A paragraph without words still takes up one row.
    Blank,
    Words(PackedLine),
}

/// Greedily partitions `words` into lines no wider than `target_width`.
///
/// A word is accepted while `words_width + word.width + spaces_width <=
/// target_width` (a word that fits exactly stays). A word that does not fit
/// closes the current line and starts the next one. A word that opens a line
/// is always accepted, even when it alone is wider than the target; it is
/// never split. The final line is always emitted and marked as the paragraph
/// end. Empty input produces a single [`LineEvent::Blank`].
pub fn pack_words(words: &[Word], target_width: i32) -> Vec<LineEvent> {
    if words.is_empty() {
        return vec![LineEvent::Blank];
    }

    let mut lines = Vec::new();
    let mut line_begin = 0;
    // Width of the words [line_begin..i).
    let mut words_width = 0;
    // Trailing spaces of the words [line_begin..i), i.e. the gaps a new word
    // at `i` would have in front of it.
    let mut spaces_width = 0;

    for (i, word) in words.iter().enumerate() {
        let candidate = words_width + word.width;
        if line_begin == i || candidate + spaces_width <= target_width {
            words_width = candidate;
            spaces_width += word.space_width;
        } else {
            lines.push(LineEvent::Words(close_line(
                words,
                line_begin..i,
                words_width,
                false,
            )));
            line_begin = i;
            words_width = word.width;
            spaces_width = word.space_width;
        }
    }

    lines.push(LineEvent::Words(close_line(
        words,
        line_begin..words.len(),
        words_width,
        true,
    )));

    lines
}

fn close_line(
    words: &[Word],
    range: Range<usize>,
    words_width: i32,
    is_paragraph_end: bool,
) -> PackedLine {
    let line = &words[range.clone()];
    let spaces_width = line
        .split_last()
        .map_or(0, |(_, init)| init.iter().map(|w| w.space_width).sum());

    PackedLine {
        range,
        words_width,
        spaces_width,
        is_paragraph_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::formatted::FormattedRun;

    fn word(width: i32, space_width: i32) -> Word {
        Word {
            text: FormattedRun::default(),
            width,
            space_width,
            is_end_of_line: false,
        }
    }

    fn ranges(events: &[LineEvent]) -> Vec<Range<usize>> {
        events
            .iter()
            .map(|event| match event {
                LineEvent::Words(line) => line.range.clone(),
                LineEvent::Blank => 0..0,
            })
            .collect()
    }

    #[test]
    fn empty_input_requests_one_blank_line() {
        assert_eq!(pack_words(&[], 100), vec![LineEvent::Blank]);
    }

    #[test]
    fn greedy_packing_respects_the_budget() {
        let words = [word(30, 10), word(30, 10), word(30, 10), word(30, 0)];
        let events = pack_words(&words, 80);
        assert_eq!(ranges(&events), [0..2, 2..4]);

        for event in &events {
            let LineEvent::Words(line) = event else {
                panic!("unexpected blank line");
            };
            assert!(line.words_width + line.spaces_width <= 80);
            assert_eq!(line.words_width, 60);
            assert_eq!(line.spaces_width, 10);
        }
    }

    #[test]
    fn exact_fit_stays_on_the_line() {
        let words = [word(30, 10), word(40, 0)];
        let events = pack_words(&words, 80);
        assert_eq!(ranges(&events), [0..2]);

        let events = pack_words(&words, 79);
        assert_eq!(ranges(&events), [0..1, 1..2]);
    }

    #[test]
    fn only_the_last_line_is_the_paragraph_end() {
        let words = [word(50, 5), word(50, 5), word(50, 0)];
        let events = pack_words(&words, 60);
        let ends: Vec<bool> = events
            .iter()
            .map(|e| matches!(e, LineEvent::Words(l) if l.is_paragraph_end))
            .collect();
        assert_eq!(ends, [false, false, true]);
    }

    #[test]
    fn overflowing_words_get_their_own_line() {
        let words = [word(200, 5), word(10, 5), word(300, 5), word(10, 0)];
        let events = pack_words(&words, 100);
        assert_eq!(ranges(&events), [0..1, 1..2, 2..3, 3..4]);

        let LineEvent::Words(first) = &events[0] else {
            panic!("unexpected blank line");
        };
        assert_eq!(first.words_width, 200);
        assert_eq!(first.spaces_width, 0);
        assert_eq!(first.word_count(), 1);
    }

    #[test]
    fn every_line_respects_the_width_bound() {
        let word_sets: [&[(i32, i32)]; 4] = [
            &[(30, 10), (30, 10), (30, 10), (30, 0)],
            &[(5, 3), (120, 3), (7, 0), (64, 8), (1, 1), (33, 2), (50, 0)],
            &[(10, 0), (10, 0), (10, 0), (10, 0), (10, 0)],
            &[(90, 20), (15, 5), (15, 5), (80, 0), (45, 12), (3, 0)],
        ];

        for set in word_sets {
            let words: Vec<Word> = set.iter().map(|&(w, s)| word(w, s)).collect();
            for target in [1, 20, 40, 64, 79, 80, 100, 150, 500] {
                let events = pack_words(&words, target);
                let mut next = 0;
                for (i, event) in events.iter().enumerate() {
                    let LineEvent::Words(line) = event else {
                        panic!("unexpected blank line");
                    };
                    assert_eq!(line.range.start, next, "lines must be contiguous");
                    assert!(line.word_count() > 0);
                    assert!(
                        line.words_width + line.spaces_width <= target || line.word_count() == 1,
                        "{set:?} at {target}: {line:?}"
                    );
                    assert_eq!(line.is_paragraph_end, i + 1 == events.len());

                    let expected: i32 = words[line.range.clone()].iter().map(|w| w.width).sum();
                    assert_eq!(line.words_width, expected);
                    next = line.range.end;
                }
                assert_eq!(next, words.len());
            }
        }
    }

    #[test]
    fn no_line_is_ever_empty() {
        let words = [word(500, 0)];
        let events = pack_words(&words, 1);
        assert_eq!(ranges(&events), [0..1]);
    }
}
