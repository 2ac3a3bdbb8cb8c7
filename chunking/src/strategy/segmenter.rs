//! Sentence segmentation backends for [`SentenceChunker`](super::SentenceChunker).

use std::fmt::Debug;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

/// Splits text into sentences.
///
/// Returned spans must cover the input in order, with each sentence keeping
/// its trailing whitespace, so that concatenating them reproduces the text.
pub trait SentenceSegmenter: Send + Sync + Debug {
    /// Segments `text` into sentence spans.
    fn segment<'a>(&self, text: &'a str) -> Result<Vec<&'a str>>;
}

/// UAX #29 sentence boundaries.
///
/// Handles Latin and CJK terminators alike and needs no model download.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl SentenceSegmenter for UnicodeSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        Ok(text.split_sentence_bounds().collect())
    }
}

/// Cuts after a run of terminator characters and the whitespace that follows.
#[derive(Debug, Clone)]
pub struct PunctuationSegmenter {
    terminators: Vec<char>,
}

impl PunctuationSegmenter {
    /// Creates a segmenter for the given terminators.
    #[must_use]
    pub fn new(terminators: impl IntoIterator<Item = char>) -> Self {
        Self {
            terminators: terminators.into_iter().collect(),
        }
    }

    fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }
}

impl Default for PunctuationSegmenter {
    fn default() -> Self {
        Self::new(['.', '!', '?', '。', '！', '？'])
    }
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut spans = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !self.is_terminator(c) {
                continue;
            }
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !self.is_terminator(next) {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            spans.push(&text[start..end]);
            start = end;
        }

        if start < text.len() {
            spans.push(&text[start..]);
        }
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_segments_keep_trailing_whitespace() {
        let text = "First one. Second one!  Third?";
        let spans = UnicodeSegmenter.segment(text).unwrap();
        assert_eq!(spans, vec!["First one. ", "Second one!  ", "Third?"]);
        assert_eq!(spans.concat(), text);
    }

    #[test]
    fn unicode_segments_cjk() {
        let text = "今天天气很好。我们去公园吧！";
        let spans = UnicodeSegmenter.segment(text).unwrap();
        assert_eq!(spans, vec!["今天天气很好。", "我们去公园吧！"]);
    }

    #[test]
    fn punctuation_groups_terminator_runs() {
        let text = "Really?! Yes... ok";
        let spans = PunctuationSegmenter::default().segment(text).unwrap();
        assert_eq!(spans, vec!["Really?! ", "Yes... ", "ok"]);
        assert_eq!(spans.concat(), text);
    }

    #[test]
    fn punctuation_custom_terminators() {
        let spans = PunctuationSegmenter::new([';'])
            .segment("a; b. c;")
            .unwrap();
        assert_eq!(spans, vec!["a; ", "b. c;"]);
    }
}
