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

use std::sync::Arc;

use serde_json::Value;

use crate::candidate::ZiSwapSite;
use crate::errors::{Result, ZiError};
use crate::resources::ZiLookupTable;
use crate::text::{ZiGranularity, ZiSentence};
use crate::transformation::{distinct_replacements, word_sites, ZiTransformation};
use crate::transformations::positive_option;

/// Replaces one character of a word with a similar character.
///
/// The homophone flavour uses a table of characters sharing a reading, the
/// morphonym flavour a table of visually similar characters. Each candidate
/// changes exactly one character, ordered by character position and then by
/// table order. With [`ZiGranularity::Character`] every character is its own
/// site.
#[derive(Debug, Clone)]
pub struct ZiCharacterSwap {
    name: &'static str,
    table: Arc<ZiLookupTable>,
    granularity: ZiGranularity,
    max_candidates: Option<usize>,
}

impl ZiCharacterSwap {
    pub fn new(name: &'static str, table: Arc<ZiLookupTable>) -> Self {
        ZiCharacterSwap {
            name,
            table,
            granularity: ZiGranularity::Word,
            max_candidates: None,
        }
    }

    pub fn homophone(table: Arc<ZiLookupTable>) -> Self {
        Self::new("chinese.homophone", table)
    }

    pub fn morphonym(table: Arc<ZiLookupTable>) -> Self {
        Self::new("chinese.morphonym", table)
    }

    /// Entity granularity is not meaningful here and falls back to words.
    pub fn with_granularity(mut self, granularity: ZiGranularity) -> Self {
        self.granularity = match granularity {
            ZiGranularity::Character => ZiGranularity::Character,
            _ => ZiGranularity::Word,
        };
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    fn has_substitute(&self, word: &str) -> bool {
        let mut buffer = [0u8; 4];
        word.chars()
            .any(|ch| self.table.contains(ch.encode_utf8(&mut buffer)))
    }
}

impl ZiTransformation for ZiCharacterSwap {
    fn name(&self) -> &'static str {
        self.name
    }

    fn granularity(&self) -> ZiGranularity {
        self.granularity
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        Ok(word_sites(sentence)
            .into_iter()
            .filter(|site| {
                sentence
                    .word(site.start)
                    .map(|word| self.has_substitute(word))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let Some(word) = sentence.span_text(site.start, site.end) else {
            return Ok(Vec::new());
        };

        let mut replacements = Vec::new();
        let mut buffer = [0u8; 4];
        for (offset, ch) in word.char_indices() {
            let key = ch.encode_utf8(&mut buffer);
            for substitute in self.table.lookup(key) {
                let mut replaced = String::with_capacity(word.len() + substitute.len());
                replaced.push_str(&word[..offset]);
                replaced.push_str(substitute);
                replaced.push_str(&word[offset + ch.len_utf8()..]);
                replacements.push(replaced);
            }
        }

        let mut replacements = distinct_replacements(word, replacements);
        if let Some(max) = self.max_candidates {
            replacements.truncate(max);
        }
        Ok(replacements)
    }
}

fn character_factory(
    name: &'static str,
    config: &Value,
    build: fn(Arc<ZiLookupTable>) -> ZiCharacterSwap,
) -> Result<Box<dyn ZiTransformation>> {
    let table = Arc::new(ZiLookupTable::from_config(name, config)?);
    let mut transformation = build(table);

    if let Some(granularity) = config.get("granularity") {
        let granularity: ZiGranularity = serde_json::from_value(granularity.clone())
            .map_err(|_| ZiError::validation(format!("{name} 'granularity' must be 'word' or 'character'")))?;
        transformation = transformation.with_granularity(granularity);
    }
    if let Some(max) = positive_option(config, name, "max_candidates")? {
        transformation = transformation.with_max_candidates(max);
    }
    Ok(Box::new(transformation))
}

pub fn chinese_homophone_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    character_factory("chinese.homophone", config, ZiCharacterSwap::homophone)
}

pub fn chinese_morphonym_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    character_factory("chinese.morphonym", config, ZiCharacterSwap::morphonym)
}
