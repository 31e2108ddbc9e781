//! Module implementing the heuristic parser of meme descriptions.

use regex::Regex;

use crate::model::{parse_dimension, RenderSpec};
use crate::model::constants::MAX_TEXT_LENGTH;


lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+\s*").unwrap();
}


/// Turn a free-text description of a meme into a `RenderSpec`.
///
/// The description is first scanned for `key: value` lines
/// (`top`, `bottom`, `template`/`templateId`, `width`, `height`).
/// If that doesn't yield any text, the description itself is split
/// into top & bottom text: by sentences, by commas, or in half by word count,
/// whichever works first.
pub fn parse_description(description: &str) -> RenderSpec {
    let mut spec = RenderSpec::default();
    if description.is_empty() {
        return spec;
    }

    for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = match line.find(':') {
            Some(idx) => (&line[..idx], line[idx + 1..].trim()),
            None => continue,
        };
        let key = key.trim().to_lowercase();
        if key.starts_with("top") {
            spec.top = value.to_owned();
        } else if key.starts_with("bottom") {
            spec.bottom = value.to_owned();
        } else if key == "template" || key == "templateid" {
            spec.template_id = value.to_owned();
        } else if key == "width" {
            spec.width = parse_dimension(value).unwrap_or(spec.width);
        } else if key == "height" {
            spec.height = parse_dimension(value).unwrap_or(spec.height);
        }
    }

    if spec.top.is_empty() && spec.bottom.is_empty() {
        let (top, bottom) = split_text(description);
        trace!("Split description into {:?} and {:?}", top, bottom);
        spec.top = top;
        spec.bottom = bottom;
    }

    spec.top = truncate(&spec.top, MAX_TEXT_LENGTH);
    spec.bottom = truncate(&spec.bottom, MAX_TEXT_LENGTH);
    spec
}

/// Split text without explicit keys into top & bottom part.
fn split_text(text: &str) -> (String, String) {
    let sentences: Vec<_> = SENTENCE_END.split(text).filter(|s| !s.is_empty()).collect();
    if sentences.len() >= 2 {
        return (sentences[0].to_owned(), sentences[1..].join(" "));
    }

    let segments: Vec<_> = text.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if segments.len() >= 2 {
        return (segments[0].to_owned(), segments[1..].join(", "));
    }

    let words: Vec<_> = text.split_whitespace().collect();
    let mid = (words.len() + 1) / 2;
    (words[..mid].join(" "), words[mid..].join(" "))
}


/// Truncate the string to given number of characters.
pub(super) fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_owned(),
        None => s.to_owned(),
    }
}


#[cfg(test)]
mod tests {
    use std::iter;
    use spectral::prelude::*;
    use crate::model::RenderSpec;
    use super::{parse_description, truncate};

    #[test]
    fn empty() {
        assert_eq!(RenderSpec::default(), parse_description(""));
    }

    #[test]
    fn explicit_keys() {
        let spec = parse_description("top: Success\nbottom: Failure\ntemplate: drake");
        assert_that!(spec.top).contains("Success");
        assert_that!(spec.bottom).contains("Failure");
        assert_eq!("drake", spec.template_id);
        assert_eq!((1200, 675), (spec.width, spec.height));
        assert_eq!(None, spec.background);
    }

    #[test]
    fn key_variants() {
        let spec = parse_description(
            "  Top text:   one: two \r\n\r\nBOTTOM LINE: three\nTemplateId: loss\nWidth: 1600px\nheight: abc");
        assert_eq!("one: two", spec.top);
        assert_eq!("three", spec.bottom);
        assert_eq!("loss", spec.template_id);
        assert_eq!(1600, spec.width);
        assert_eq!(675, spec.height);
    }

    #[test]
    fn only_size_given() {
        let spec = parse_description("width: 2000\nheight: 1000");
        assert_eq!((2000, 1000), (spec.width, spec.height));
        // No text keys, so the whole description is split in half.
        assert_eq!("width: 2000", spec.top);
        assert_eq!("height: 1000", spec.bottom);
    }

    #[test]
    fn sentences() {
        let spec = parse_description("I tried to fix the bug. Now there are three bugs! Great?");
        assert_eq!("I tried to fix the bug", spec.top);
        assert_eq!("Now there are three bugs Great", spec.bottom);
    }

    #[test]
    fn single_sentence_with_commas() {
        let spec = parse_description("when the code works, but you don't know why, at all");
        assert_eq!("when the code works", spec.top);
        assert_eq!("but you don't know why, at all", spec.bottom);
    }

    #[test]
    fn words_split_in_half() {
        let spec = parse_description("one two three four five");
        assert_eq!("one two three", spec.top);
        assert_eq!("four five", spec.bottom);

        let spec = parse_description("lonely");
        assert_eq!("lonely", spec.top);
        assert_eq!("", spec.bottom);
    }

    #[test]
    fn long_text_truncated() {
        let long: String = iter::repeat('a').take(300).collect();
        let spec = parse_description(&format!("top: {}", long));
        assert_eq!(200, spec.top.chars().count());

        let spec = parse_description(&format!("{}. {}", long, long));
        assert_eq!(200, spec.top.chars().count());
        assert_eq!(200, spec.bottom.chars().count());
    }

    #[test]
    fn truncate_chars() {
        assert_eq!("żół", truncate("żółw", 3));
        assert_eq!("abc", truncate("abc", 3));
        assert_eq!("", truncate("abc", 0));
    }
}
