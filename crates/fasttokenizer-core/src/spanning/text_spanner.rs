//! # Regex Text Spanner

use core::ops::Range;

use regex::bytes::Regex;

use crate::errors::{FTError, FTResult};

/// A GPT-2 style word split pattern.
///
/// Contractions, letter runs, digit runs, and punctuation runs each take
/// one optional leading space; remaining whitespace forms its own spans.
pub const DEFAULT_WORD_PATTERN: &str =
    r"'(?:[sdmt]|ll|ve|re)| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+";

/// Splits byte strings into spans at regex matches.
#[derive(Debug, Clone)]
pub struct TextSpanner {
    word_re: Regex,
}

impl TextSpanner {
    /// Build a new [`TextSpanner`] from a pattern.
    ///
    /// ## Returns
    /// The spanner, or [`FTError::Pattern`] if the pattern does not compile.
    pub fn from_pattern(pattern: &str) -> FTResult<Self> {
        let word_re = Regex::new(pattern).map_err(|e| FTError::Pattern(e.to_string()))?;
        Ok(Self { word_re })
    }

    /// Get the split pattern.
    pub fn pattern(&self) -> &str {
        self.word_re.as_str()
    }

    /// Split `text` into spans.
    ///
    /// Every match is a span, and so is every gap between matches; the
    /// spans cover `text` in order, without overlap. Empty matches are dropped.
    pub fn split_spans(
        &self,
        text: &[u8],
    ) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut last = 0;
        for m in self.word_re.find_iter(text) {
            if m.is_empty() {
                continue;
            }
            if m.start() > last {
                spans.push(last..m.start());
            }
            spans.push(m.range());
            last = m.end();
        }
        if last < text.len() {
            spans.push(last..text.len());
        }
        spans
    }
}
