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

//! # Constraint Module
//!
//! Constraints decide which candidates survive. They come in two kinds:
//!
//! - [`ZiConstraint`]: judges a fully assembled candidate sentence against
//!   the original. Registered constraints compose by logical AND and are
//!   evaluated in registration order, stopping at the first rejection.
//! - [`ZiSiteConstraint`]: rules a swap site out before the transformation
//!   is asked for candidates (stopwords, very short words).
//!
//! Both kinds are pure predicates: they never mutate their inputs, and a
//! rejection is a filtered result, not an error.

use std::collections::HashSet;
use std::fmt::{self, Debug};

use serde_json::Value;

use crate::candidate::{ZiAugmentedSentence, ZiSwapSite};
use crate::errors::{Result, ZiError};
use crate::text::ZiSentence;

/// Predicate over (original, candidate) sentence pairs.
pub trait ZiConstraint: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn allows(&self, original: &ZiSentence, candidate: &ZiAugmentedSentence<'_>) -> bool;
}

/// Predicate over swap sites, applied before candidate generation.
pub trait ZiSiteConstraint: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn permits(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> bool;
}

/// Logical AND over `constraints`, short-circuiting on the first rejection.
pub fn allows_all(
    constraints: &[Box<dyn ZiConstraint>],
    original: &ZiSentence,
    candidate: &ZiAugmentedSentence<'_>,
) -> bool {
    for constraint in constraints {
        if !constraint.allows(original, candidate) {
            log::trace!(
                "constraint '{}' rejected candidate '{}'",
                constraint.name(),
                candidate.text()
            );
            return false;
        }
    }
    true
}

/// Caps the number (and/or share) of original words a candidate may change.
#[derive(Debug, Clone)]
pub struct ZiMaxWordsPerturbed {
    max_num_words: Option<usize>,
    max_percent: Option<f64>,
}

impl ZiMaxWordsPerturbed {
    pub fn new(max_num_words: Option<usize>, max_percent: Option<f64>) -> Result<Self> {
        if max_num_words.is_none() && max_percent.is_none() {
            return Err(ZiError::validation(
                "max_words_perturbed requires 'max_num_words' or 'max_percent'",
            ));
        }
        if let Some(pct) = max_percent {
            if !(0.0..=1.0).contains(&pct) {
                return Err(ZiError::validation(
                    "max_words_perturbed 'max_percent' must be in [0,1]",
                ));
            }
        }
        Ok(ZiMaxWordsPerturbed {
            max_num_words,
            max_percent,
        })
    }
}

impl ZiConstraint for ZiMaxWordsPerturbed {
    fn name(&self) -> &'static str {
        "max_words_perturbed"
    }

    fn allows(&self, original: &ZiSentence, candidate: &ZiAugmentedSentence<'_>) -> bool {
        let perturbed = candidate.words_perturbed();
        if let Some(max) = self.max_num_words {
            if perturbed > max {
                return false;
            }
        }
        if let Some(pct) = self.max_percent {
            let words = original.word_count().max(1) as f64;
            if perturbed as f64 / words > pct {
                return false;
            }
        }
        true
    }
}

/// Caps the character-level Levenshtein distance to the original text.
#[derive(Debug, Clone)]
pub struct ZiMaxEditDistance {
    max_edit_distance: usize,
}

impl ZiMaxEditDistance {
    pub fn new(max_edit_distance: usize) -> Self {
        ZiMaxEditDistance { max_edit_distance }
    }
}

impl ZiConstraint for ZiMaxEditDistance {
    fn name(&self) -> &'static str {
        "max_edit_distance"
    }

    fn allows(&self, original: &ZiSentence, candidate: &ZiAugmentedSentence<'_>) -> bool {
        levenshtein(original.raw(), candidate.text()) <= self.max_edit_distance
    }
}

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

type ZiPredicate = dyn Fn(&ZiSentence, &ZiAugmentedSentence<'_>) -> bool + Send + Sync;

/// Constraint wrapping an arbitrary closure.
pub struct ZiPredicateConstraint {
    name: &'static str,
    predicate: Box<ZiPredicate>,
}

impl ZiPredicateConstraint {
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&ZiSentence, &ZiAugmentedSentence<'_>) -> bool + Send + Sync + 'static,
    {
        ZiPredicateConstraint {
            name,
            predicate: Box::new(predicate),
        }
    }
}

impl Debug for ZiPredicateConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiPredicateConstraint")
            .field("name", &self.name)
            .finish()
    }
}

impl ZiConstraint for ZiPredicateConstraint {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allows(&self, original: &ZiSentence, candidate: &ZiAugmentedSentence<'_>) -> bool {
        (self.predicate)(original, candidate)
    }
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Keeps sites that contain no stopword.
#[derive(Debug, Clone)]
pub struct ZiStopwordModification {
    stopwords: HashSet<String>,
}

impl Default for ZiStopwordModification {
    fn default() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied())
    }
}

impl ZiStopwordModification {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ZiStopwordModification {
            stopwords: stopwords
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl ZiSiteConstraint for ZiStopwordModification {
    fn name(&self) -> &'static str {
        "stopword_modification"
    }

    fn permits(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> bool {
        (site.start..site.end)
            .filter_map(|index| sentence.word(index))
            .all(|word| !self.stopwords.contains(&word.to_lowercase()))
    }
}

/// Keeps sites whose text has at least `min_length` characters.
#[derive(Debug, Clone)]
pub struct ZiMinWordLength {
    min_length: usize,
}

impl ZiMinWordLength {
    pub fn new(min_length: usize) -> Self {
        ZiMinWordLength { min_length }
    }
}

impl ZiSiteConstraint for ZiMinWordLength {
    fn name(&self) -> &'static str {
        "min_word_length"
    }

    fn permits(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> bool {
        sentence
            .span_text(site.start, site.end)
            .map(|text| text.chars().count() >= self.min_length)
            .unwrap_or(false)
    }
}

pub fn max_words_perturbed_factory(config: &Value) -> Result<Box<dyn ZiConstraint>> {
    let obj = config
        .as_object()
        .ok_or_else(|| ZiError::validation("max_words_perturbed config must be object"))?;
    let max_num_words = match obj.get("max_num_words") {
        None => None,
        Some(value) => Some(value.as_u64().ok_or_else(|| {
            ZiError::validation("max_words_perturbed 'max_num_words' must be an unsigned integer")
        })? as usize),
    };
    let max_percent = match obj.get("max_percent") {
        None => None,
        Some(value) => Some(value.as_f64().ok_or_else(|| {
            ZiError::validation("max_words_perturbed 'max_percent' must be a number")
        })?),
    };
    Ok(Box::new(ZiMaxWordsPerturbed::new(max_num_words, max_percent)?))
}

pub fn max_edit_distance_factory(config: &Value) -> Result<Box<dyn ZiConstraint>> {
    let max = config
        .get("max_edit_distance")
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            ZiError::validation("max_edit_distance requires unsigned integer 'max_edit_distance'")
        })?;
    Ok(Box::new(ZiMaxEditDistance::new(max as usize)))
}

pub fn stopword_modification_factory(config: &Value) -> Result<Box<dyn ZiSiteConstraint>> {
    match config.get("stopwords") {
        None => Ok(Box::new(ZiStopwordModification::default())),
        Some(Value::Array(words)) => {
            let words = words
                .iter()
                .map(|word| {
                    word.as_str().ok_or_else(|| {
                        ZiError::validation("stopword_modification 'stopwords' must be strings")
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(ZiStopwordModification::new(words)))
        }
        Some(_) => Err(ZiError::validation(
            "stopword_modification 'stopwords' must be an array",
        )),
    }
}

pub fn min_word_length_factory(config: &Value) -> Result<Box<dyn ZiSiteConstraint>> {
    let min = config
        .get("min_length")
        .and_then(Value::as_u64)
        .ok_or_else(|| ZiError::validation("min_word_length requires unsigned integer 'min_length'"))?;
    Ok(Box::new(ZiMinWordLength::new(min as usize)))
}
