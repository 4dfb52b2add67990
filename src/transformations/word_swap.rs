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

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::candidate::ZiSwapSite;
use crate::errors::Result;
use crate::resources::ZiLookupTable;
use crate::text::ZiSentence;
use crate::transformation::{distinct_replacements, word_sites, ZiTransformation};
use crate::transformations::positive_option;

/// Word-level swap backed by a lookup table.
///
/// Used for English synonym tables and for HowNet-style sense graphs over
/// Chinese words. In case-insensitive mode the table is keyed by lowercase
/// words and replacements inherit the capitalization of the original word.
#[derive(Debug, Clone)]
pub struct ZiWordSwapLookup {
    name: &'static str,
    table: Arc<ZiLookupTable>,
    max_candidates: Option<usize>,
    case_insensitive: bool,
}

impl ZiWordSwapLookup {
    pub fn new(name: &'static str, table: Arc<ZiLookupTable>) -> Self {
        ZiWordSwapLookup {
            name,
            table,
            max_candidates: None,
            case_insensitive: false,
        }
    }

    /// Synonym swap over a lowercase-keyed table.
    pub fn synonym(table: Arc<ZiLookupTable>) -> Self {
        Self {
            case_insensitive: true,
            ..Self::new("word_swap.synonym", table)
        }
    }

    /// Chinese word swap over a HowNet sense graph.
    pub fn hownet(table: Arc<ZiLookupTable>) -> Self {
        Self::new("chinese.hownet", table)
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    fn key<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if self.case_insensitive {
            Cow::Owned(word.to_lowercase())
        } else {
            Cow::Borrowed(word)
        }
    }

    fn match_case(&self, original: &str, replacement: &str) -> String {
        if !self.case_insensitive {
            return replacement.to_string();
        }
        let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
        let first_upper = letters.first().map(|c| c.is_uppercase()).unwrap_or(false);
        let all_upper = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
        if all_upper {
            replacement.to_uppercase()
        } else if first_upper {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        } else {
            replacement.to_string()
        }
    }
}

impl ZiTransformation for ZiWordSwapLookup {
    fn name(&self) -> &'static str {
        self.name
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        Ok(word_sites(sentence)
            .into_iter()
            .filter(|site| {
                sentence
                    .word(site.start)
                    .map(|word| self.table.contains(&self.key(word)))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let Some(word) = sentence.span_text(site.start, site.end) else {
            return Ok(Vec::new());
        };
        let replacements = self
            .table
            .lookup(&self.key(word))
            .iter()
            .map(|value| self.match_case(word, value));
        let mut replacements = distinct_replacements(word, replacements);
        if let Some(max) = self.max_candidates {
            replacements.truncate(max);
        }
        Ok(replacements)
    }
}

fn lookup_factory(
    name: &'static str,
    config: &Value,
    build: fn(Arc<ZiLookupTable>) -> ZiWordSwapLookup,
) -> Result<Box<dyn ZiTransformation>> {
    let table = Arc::new(ZiLookupTable::from_config(name, config)?);
    let mut transformation = build(table);
    if let Some(max) = positive_option(config, name, "max_candidates")? {
        transformation = transformation.with_max_candidates(max);
    }
    Ok(Box::new(transformation))
}

pub fn word_swap_synonym_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    lookup_factory("word_swap.synonym", config, ZiWordSwapLookup::synonym)
}

pub fn chinese_hownet_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    lookup_factory("chinese.hownet", config, ZiWordSwapLookup::hownet)
}
