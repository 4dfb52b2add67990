//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Text Module
//!
//! Tokenization and span utilities used by every transformation. A sentence is
//! split into a contiguous sequence of tokens (words, punctuation, whitespace)
//! carrying byte offsets into the raw string, so that swap sites can be
//! located and replacements spliced back without disturbing the surrounding
//! text.
//!
//! ## Scripts
//!
//! - **Latin and other spaced scripts**: a word is a run of letters, digits and
//!   marks, optionally joined by apostrophes, hyphens or underscores
//! - **Han**: runs of Han characters are segmented by forward maximum matching
//!   against a [`ZiLexicon`]; characters not covered by the lexicon become
//!   single-character words
//!
//! ## Granularity
//!
//! With [`ZiGranularity::Character`] every letter or Han character becomes its
//! own word, which lets character-level transformations address single
//! characters as swap sites.

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_pattern() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?P<han>\p{Han}+)|(?P<word>[[\p{L}\p{N}\p{M}]&&\P{Han}](?:[[\p{L}\p{N}\p{M}'’_\-]&&\P{Han}]*[[\p{L}\p{N}\p{M}]&&\P{Han}])?)|(?P<space>\s+)|(?P<other>(?s:.))",
        )
        .expect("token pattern is valid")
    })
}

/// Level at which a transformation addresses the sentence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiGranularity {
    /// Sites are words (or lexicon segments for Han text).
    #[default]
    Word,
    /// Sites are single characters.
    Character,
    /// Sites are named-entity spans; the sentence is tokenized into words.
    Entity,
}

impl ZiGranularity {
    /// Swap fraction used when the augmenter config does not set one.
    pub fn default_pct_words_to_swap(self) -> f64 {
        match self {
            ZiGranularity::Word => 0.1,
            ZiGranularity::Character => 0.05,
            ZiGranularity::Entity => 1.0,
        }
    }

    fn splits_characters(self) -> bool {
        matches!(self, ZiGranularity::Character)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZiTokenKind {
    Word,
    Punctuation,
    Whitespace,
}

/// A single token with its byte range in the raw sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub kind: ZiTokenKind,
}

impl ZiToken {
    fn new(text: &str, start: usize, kind: ZiTokenKind) -> Self {
        ZiToken {
            text: text.to_string(),
            start,
            end: start + text.len(),
            kind,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == ZiTokenKind::Word
    }
}

/// Tokenized, immutable view of one input string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiSentence {
    raw: String,
    tokens: Vec<ZiToken>,
    /// Token index of every word, in order.
    words: Vec<usize>,
    granularity: ZiGranularity,
}

impl ZiSentence {
    /// Tokenizes `text` with the default tokenizer (no lexicon).
    pub fn parse(text: &str) -> Self {
        ZiTokenizer::new().tokenize(text, ZiGranularity::Word)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[ZiToken] {
        &self.tokens
    }

    pub fn granularity(&self) -> ZiGranularity {
        self.granularity
    }

    /// True when tokenization produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.tokens
            .iter()
            .all(|token| token.kind == ZiTokenKind::Whitespace)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words
            .get(index)
            .map(|&token| self.tokens[token].text.as_str())
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words
            .iter()
            .map(move |&token| self.tokens[token].text.as_str())
    }

    pub fn word_token(&self, index: usize) -> Option<&ZiToken> {
        self.words.get(index).map(|&token| &self.tokens[token])
    }

    /// Byte range covered by words `[start, end)`, including whatever lies
    /// between them. `None` when the range is empty or out of bounds.
    pub fn byte_range(&self, start: usize, end: usize) -> Option<Range<usize>> {
        if start >= end || end > self.words.len() {
            return None;
        }
        let first = &self.tokens[self.words[start]];
        let last = &self.tokens[self.words[end - 1]];
        Some(first.start..last.end)
    }

    /// Raw text covered by words `[start, end)`.
    pub fn span_text(&self, start: usize, end: usize) -> Option<&str> {
        self.byte_range(start, end).map(|range| &self.raw[range])
    }

    /// Word indices `[start, end)` of the words overlapping the byte range.
    pub fn words_in_byte_range(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let mut first = None;
        let mut last = None;
        for (index, &token) in self.words.iter().enumerate() {
            let token = &self.tokens[token];
            if token.end > start && token.start < end {
                first.get_or_insert(index);
                last = Some(index);
            }
        }
        match (first, last) {
            (Some(first), Some(last)) => Some((first, last + 1)),
            _ => None,
        }
    }
}

/// Word list driving forward-maximum-matching segmentation of Han text.
#[derive(Clone, Debug, Default)]
pub struct ZiLexicon {
    words: HashSet<String>,
    max_chars: usize,
}

impl ZiLexicon {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lexicon = ZiLexicon::default();
        for word in words {
            lexicon.insert(word);
        }
        lexicon
    }

    /// Loads a newline-separated word list. Blank lines and `#` comments are skipped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Ok(Self::new(words))
    }

    pub fn insert(&mut self, word: impl Into<String>) {
        let word = word.into();
        let chars = word.chars().count();
        if chars == 0 {
            return;
        }
        self.max_chars = self.max_chars.max(chars);
        self.words.insert(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Splits a run of Han characters, longest lexicon match first.
    fn segment<'a>(&self, run: &'a str) -> Vec<&'a str> {
        let boundaries: Vec<usize> = run
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(run.len()))
            .collect();
        let chars = boundaries.len() - 1;

        let mut pieces = Vec::new();
        let mut at = 0;
        while at < chars {
            let longest = self.max_chars.min(chars - at);
            let mut taken = 1;
            for width in (2..=longest).rev() {
                let candidate = &run[boundaries[at]..boundaries[at + width]];
                if self.words.contains(candidate) {
                    taken = width;
                    break;
                }
            }
            pieces.push(&run[boundaries[at]..boundaries[at + taken]]);
            at += taken;
        }
        pieces
    }
}

/// Splits sentences into positioned tokens.
#[derive(Clone, Debug, Default)]
pub struct ZiTokenizer {
    lexicon: Option<Arc<ZiLexicon>>,
}

impl ZiTokenizer {
    pub fn new() -> Self {
        ZiTokenizer { lexicon: None }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<ZiLexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn lexicon(&self) -> Option<&ZiLexicon> {
        self.lexicon.as_deref()
    }

    pub fn tokenize(&self, text: &str, granularity: ZiGranularity) -> ZiSentence {
        let mut tokens = Vec::new();
        for captures in token_pattern().captures_iter(text) {
            if let Some(run) = captures.name("han") {
                self.push_han(&mut tokens, run.as_str(), run.start(), granularity);
            } else if let Some(word) = captures.name("word") {
                if granularity.splits_characters() {
                    push_characters(&mut tokens, word.as_str(), word.start());
                } else {
                    tokens.push(ZiToken::new(word.as_str(), word.start(), ZiTokenKind::Word));
                }
            } else if let Some(space) = captures.name("space") {
                tokens.push(ZiToken::new(
                    space.as_str(),
                    space.start(),
                    ZiTokenKind::Whitespace,
                ));
            } else if let Some(other) = captures.name("other") {
                tokens.push(ZiToken::new(
                    other.as_str(),
                    other.start(),
                    ZiTokenKind::Punctuation,
                ));
            }
        }

        let words = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_word())
            .map(|(index, _)| index)
            .collect();

        ZiSentence {
            raw: text.to_string(),
            tokens,
            words,
            granularity,
        }
    }

    fn push_han(
        &self,
        tokens: &mut Vec<ZiToken>,
        run: &str,
        offset: usize,
        granularity: ZiGranularity,
    ) {
        match &self.lexicon {
            Some(lexicon) if !granularity.splits_characters() => {
                let mut at = offset;
                for piece in lexicon.segment(run) {
                    tokens.push(ZiToken::new(piece, at, ZiTokenKind::Word));
                    at += piece.len();
                }
            }
            _ => push_characters(tokens, run, offset),
        }
    }
}

fn push_characters(tokens: &mut Vec<ZiToken>, run: &str, offset: usize) {
    for (at, ch) in run.char_indices() {
        let mut buffer = [0u8; 4];
        tokens.push(ZiToken::new(
            ch.encode_utf8(&mut buffer),
            offset + at,
            ZiTokenKind::Word,
        ));
    }
}

/// True for characters in the CJK unified ideograph blocks.
pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0x2A700..=0x2EBEF
        | 0xF900..=0xFAFF)
}
