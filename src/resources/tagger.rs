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

//! # Entity Tagger Module
//!
//! Contract for named-entity recognition collaborators and a dictionary-based
//! tagger. Entity-aware transformations only need span boundaries and labels;
//! they never look inside the tagger's model.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::resources::gazetteer;
use crate::text::{ZiGranularity, ZiTokenizer};

/// Entity label taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiEntityLabel {
    Person,
    Location,
    Organization,
    Misc,
    Other(String),
}

impl ZiEntityLabel {
    /// Maps common tag spellings (`PER`, `LOC`, `GPE`, `ORG`, `MISC`).
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        let tag = tag
            .strip_prefix("B-")
            .or_else(|| tag.strip_prefix("I-"))
            .or_else(|| tag.strip_prefix("S-"))
            .or_else(|| tag.strip_prefix("E-"))
            .unwrap_or(tag);
        match tag.to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => ZiEntityLabel::Person,
            "LOC" | "LOCATION" | "GPE" => ZiEntityLabel::Location,
            "ORG" | "ORGANIZATION" => ZiEntityLabel::Organization,
            "MISC" => ZiEntityLabel::Misc,
            _ => ZiEntityLabel::Other(tag.to_string()),
        }
    }
}

impl fmt::Display for ZiEntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiEntityLabel::Person => f.write_str("PER"),
            ZiEntityLabel::Location => f.write_str("LOC"),
            ZiEntityLabel::Organization => f.write_str("ORG"),
            ZiEntityLabel::Misc => f.write_str("MISC"),
            ZiEntityLabel::Other(tag) => f.write_str(tag),
        }
    }
}

/// Entity found by a tagger: byte range into the tagged text plus label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiEntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: ZiEntityLabel,
}

/// Named-entity recognition collaborator.
///
/// Implementations wrap a loaded model (load once, query many). A tagger
/// that cannot answer returns a `ZiError::Resource`, which the augmenter
/// propagates to the caller.
pub trait ZiEntityTagger: Debug + Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<ZiEntitySpan>>;
}

/// Dictionary tagger matching known phrases on word boundaries.
///
/// Person names are recognised as a known first name optionally followed by
/// a known last name. Other phrases match longest first.
pub struct ZiGazetteerTagger {
    phrases: HashMap<String, ZiEntityLabel>,
    max_phrase_words: usize,
    first_names: HashSet<String>,
    last_names: HashSet<String>,
    tokenizer: ZiTokenizer,
}

impl Debug for ZiGazetteerTagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiGazetteerTagger")
            .field("phrases", &self.phrases.len())
            .field("first_names", &self.first_names.len())
            .field("last_names", &self.last_names.len())
            .finish()
    }
}

impl Default for ZiGazetteerTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl ZiGazetteerTagger {
    pub fn new() -> Self {
        ZiGazetteerTagger {
            phrases: HashMap::new(),
            max_phrase_words: 0,
            first_names: HashSet::new(),
            last_names: HashSet::new(),
            tokenizer: ZiTokenizer::new(),
        }
    }

    /// Tagger loaded with the bundled English person and location lists.
    pub fn english() -> Self {
        Self::new()
            .with_phrases(ZiEntityLabel::Location, gazetteer::LOCATIONS.iter().copied())
            .with_person_names(
                gazetteer::FIRST_NAMES.iter().copied(),
                gazetteer::LAST_NAMES.iter().copied(),
            )
    }

    pub fn with_phrases<I, S>(mut self, label: ZiEntityLabel, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for phrase in phrases {
            let phrase: String = phrase.into();
            let words = phrase.split_whitespace().count();
            if words == 0 {
                continue;
            }
            self.max_phrase_words = self.max_phrase_words.max(words);
            let key = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
            self.phrases.insert(key, label.clone());
        }
        self
    }

    pub fn with_person_names<F, L, S, T>(mut self, first_names: F, last_names: L) -> Self
    where
        F: IntoIterator<Item = S>,
        L: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.first_names.extend(first_names.into_iter().map(Into::into));
        self.last_names.extend(last_names.into_iter().map(Into::into));
        self
    }
}

impl ZiEntityTagger for ZiGazetteerTagger {
    fn tag(&self, text: &str) -> Result<Vec<ZiEntitySpan>> {
        let sentence = self.tokenizer.tokenize(text, ZiGranularity::Word);
        let words: Vec<&str> = sentence.words().collect();
        let mut spans = Vec::new();

        let mut at = 0;
        while at < words.len() {
            if self.first_names.contains(words[at]) {
                let end = if at + 1 < words.len() && self.last_names.contains(words[at + 1]) {
                    at + 2
                } else {
                    at + 1
                };
                if let Some(range) = sentence.byte_range(at, end) {
                    spans.push(ZiEntitySpan {
                        start: range.start,
                        end: range.end,
                        label: ZiEntityLabel::Person,
                    });
                }
                at = end;
                continue;
            }

            let longest = self.max_phrase_words.min(words.len() - at);
            let matched = (1..=longest).rev().find_map(|width| {
                let key = words[at..at + width].join(" ");
                self.phrases.get(&key).map(|label| (width, label.clone()))
            });
            match matched {
                Some((width, label)) => {
                    if let Some(range) = sentence.byte_range(at, at + width) {
                        spans.push(ZiEntitySpan {
                            start: range.start,
                            end: range.end,
                            label,
                        });
                    }
                    at += width;
                }
                None => at += 1,
            }
        }
        Ok(spans)
    }
}
