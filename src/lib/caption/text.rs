//! Module implementing the layout of caption text.

use crate::model::constants::LINE_SPACING;


/// Break the text into lines that fit within given width.
///
/// Words are separated by single spaces and are never broken,
/// so a word wider than `max_width` ends up alone on its own (overflowing) line.
/// The result always contains at least one line, which may be empty.
pub fn wrap<M>(text: &str, max_width: f32, mut measure: M) -> Vec<String>
    where M: FnMut(&str) -> f32
{
    let mut lines = vec![];
    let mut line = String::new();
    for word in text.split(' ') {
        let candidate = if line.is_empty() {
            word.to_owned()
        } else {
            format!("{} {}", line, word)
        };
        if measure(&candidate) > max_width && !line.is_empty() {
            trace!("Breaking line before {:?}", word);
            lines.push(line);
            line = word.to_owned();
        } else {
            line = candidate;
        }
    }
    lines.push(line);
    lines
}


/// Block of text lines, laid out vertically around a center line.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutBlock {
    pub lines: Vec<String>,
    /// Font size the lines are drawn with.
    pub font_size: f32,
    /// Distance between the centers of consecutive lines.
    pub line_height: f32,
    /// Where the middle of the whole block should be.
    pub center_y: f32,
}

impl LayoutBlock {
    pub fn new(lines: Vec<String>, font_size: f32, center_y: f32) -> Self {
        LayoutBlock{
            lines,
            font_size,
            line_height: font_size * LINE_SPACING,
            center_y,
        }
    }

    #[inline]
    pub fn total_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Vertical position of the first line.
    #[inline]
    pub fn start_y(&self) -> f32 {
        self.center_y - self.total_height() / 2.0 + self.font_size / 2.0
    }

    /// Iterate over the lines together with the vertical positions to draw them at.
    pub fn positioned_lines<'b>(&'b self) -> impl Iterator<Item=(&'b str, f32)> + 'b {
        let start_y = self.start_y();
        self.lines.iter().enumerate()
            .map(move |(i, line)| (line.as_str(), start_y + i as f32 * self.line_height))
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::{wrap, LayoutBlock};

    /// Every character is 10 pixels wide.
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    fn words_of(lines: &[String]) -> Vec<String> {
        lines.iter().flat_map(|l| l.split_whitespace()).map(str::to_owned).collect()
    }

    #[test]
    fn empty_text() {
        assert_eq!(vec![String::new()], wrap("", 100.0, measure));
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(vec!["HELLO WORLD"], wrap("HELLO WORLD", 110.0, measure));
    }

    #[test]
    fn breaks_greedily() {
        let lines = wrap("one two three four five", 90.0, measure);
        assert_eq!(vec!["one two", "three", "four five"], lines);
    }

    #[test]
    fn long_word_overflows() {
        let lines = wrap("a supercalifragilistic b", 50.0, measure);
        assert_eq!(vec!["a", "supercalifragilistic", "b"], lines);
        assert_eq!(vec!["supercalifragilistic"], wrap("supercalifragilistic", 50.0, measure));
    }

    #[test]
    fn preserves_words() {
        let texts = [
            "the quick brown fox jumps over the lazy dog",
            "WHEN YOU FINALLY FIX THE BUG BUT THEN THE TESTS START FAILING",
            "x",
            "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod",
        ];
        for text in texts.iter() {
            let expected: Vec<_> = text.split_whitespace().map(str::to_owned).collect();
            for &width in [10.0, 55.0, 120.0, 300.0, 10000.0].iter() {
                let lines = wrap(text, width, measure);
                assert_that!(lines.len()).is_greater_than(0);
                assert_eq!(expected, words_of(&lines), "text={:?} width={}", text, width);
            }
        }
    }

    #[test]
    fn lines_fit_unless_single_word() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit";
        for line in wrap(text, 120.0, measure) {
            if line.contains(' ') {
                assert_that!(measure(&line)).is_less_than_or_equal_to(120.0);
            }
        }
    }

    #[test]
    fn deterministic() {
        let text = "same input gives the same output every single time";
        assert_eq!(wrap(text, 100.0, measure), wrap(text, 100.0, measure));
    }

    #[test]
    fn single_line_is_centered() {
        let block = LayoutBlock::new(vec!["HELLO".into()], 100.0, 500.0);
        let lines: Vec<_> = block.positioned_lines().collect();
        assert_eq!(1, lines.len());
        assert_eq!("HELLO", lines[0].0);
        // 500 - 105/2 + 50
        assert_that!(lines[0].1).is_close_to(497.5, 0.001);
    }

    #[test]
    fn block_is_symmetric_around_center() {
        let (font_size, center_y) = (64.0f32, 300.0f32);
        for n in 1..8 {
            let block = LayoutBlock::new(vec!["LINE".into(); n], font_size, center_y);
            let ys: Vec<f32> = block.positioned_lines().map(|(_, y)| y).collect();
            assert_eq!(n, ys.len());

            let line_height = font_size * 1.05;
            let expected_first = center_y - (n - 1) as f32 * line_height / 2.0;
            assert_that!(ys[0]).is_close_to(expected_first, line_height);

            let middle = (ys[0] + ys[n - 1]) / 2.0;
            assert_that!(middle).is_close_to(center_y, line_height);
            for pair in ys.windows(2) {
                assert_that!(pair[1] - pair[0]).is_close_to(line_height, 0.001);
            }
        }
    }
}
