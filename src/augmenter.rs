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

//! # Zi Augmenter Module
//!
//! The augmenter turns one raw input string into a bounded list of distinct
//! perturbed strings by driving a [`ZiTransformation`] under a swap budget and
//! a list of constraints.
//!
//! ## Algorithm
//!
//! 1. Tokenize the input at the transformation's granularity
//! 2. Compute the budget `k = max(1, round(pct_words_to_swap * n))`
//! 3. Collect swappable sites (leftmost first), drop sites refused by a site
//!    constraint, and ask the transformation for candidates at each site
//! 4. Search combinations of at most `k` non-overlapping site edits:
//!    - **exhaustive**: every combination, largest first, in site order and
//!      then candidate order
//!    - **fast**: seeded greedy walks that harvest every full-budget
//!      neighbour and stop as soon as enough outputs exist
//! 5. Keep candidates accepted by every constraint (short-circuit AND)
//! 6. Deduplicate by rendered string, first produced wins, truncate to
//!    `transformations_per_example`
//!
//! ## Policies
//!
//! - The unmodified input is never returned. A sentence without swappable
//!   sites, or whose sites have no candidates, yields an empty list.
//! - When the search space runs out first, fewer outputs are returned.
//! - Transformation errors (an unavailable tagger or language model)
//!   propagate to the caller unchanged.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::{ZiAugmentation, ZiAugmentedSentence, ZiCandidate, ZiSwapSite};
use crate::constraint::{allows_all, ZiConstraint, ZiSiteConstraint};
use crate::errors::{Result, ZiError};
use crate::text::{ZiLexicon, ZiSentence, ZiTokenizer};
use crate::transformation::ZiTransformation;

pub const DEFAULT_SEED: u64 = 0x5eed_a11c;

/// Immutable augmenter configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiAugmenterConfig {
    /// Fraction of words to swap, in (0, 1]. `None` uses the default of the
    /// transformation's granularity.
    pub pct_words_to_swap: Option<f64>,
    /// Maximum number of outputs per input, at least 1.
    pub transformations_per_example: usize,
    /// Trade exhaustiveness for bounded work.
    pub fast_augment: bool,
    /// Seed of the sampling RNG, re-applied on every call.
    pub seed: u64,
}

impl Default for ZiAugmenterConfig {
    fn default() -> Self {
        ZiAugmenterConfig {
            pct_words_to_swap: None,
            transformations_per_example: 1,
            fast_augment: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl ZiAugmenterConfig {
    pub fn with_pct_words_to_swap(mut self, pct: f64) -> Self {
        self.pct_words_to_swap = Some(pct);
        self
    }

    pub fn with_transformations_per_example(mut self, count: usize) -> Self {
        self.transformations_per_example = count;
        self
    }

    pub fn with_fast_augment(mut self, fast: bool) -> Self {
        self.fast_augment = fast;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(pct) = self.pct_words_to_swap {
            if !(pct > 0.0 && pct <= 1.0) {
                return Err(ZiError::validation(
                    "augmenter 'pct_words_to_swap' must be in (0,1]",
                ));
            }
        }
        if self.transformations_per_example == 0 {
            return Err(ZiError::validation(
                "augmenter 'transformations_per_example' must be positive",
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config object. Missing keys keep their defaults.
    pub fn from_value(config: &Value) -> Result<Self> {
        let obj = config
            .as_object()
            .ok_or_else(|| ZiError::validation("augmenter config must be object"))?;
        let mut parsed = ZiAugmenterConfig::default();

        if let Some(value) = obj.get("pct_words_to_swap") {
            parsed.pct_words_to_swap = Some(value.as_f64().ok_or_else(|| {
                ZiError::validation("augmenter 'pct_words_to_swap' must be a number")
            })?);
        }
        if let Some(value) = obj.get("transformations_per_example") {
            parsed.transformations_per_example = value.as_u64().ok_or_else(|| {
                ZiError::validation("augmenter 'transformations_per_example' must be an unsigned integer")
            })? as usize;
        }
        if let Some(value) = obj.get("fast_augment") {
            parsed.fast_augment = value
                .as_bool()
                .ok_or_else(|| ZiError::validation("augmenter 'fast_augment' must be boolean"))?;
        }
        if let Some(value) = obj.get("seed") {
            parsed.seed = value.as_u64().ok_or_else(|| {
                ZiError::validation("augmenter 'seed' must be an unsigned integer")
            })?;
        }

        parsed.validate()?;
        Ok(parsed)
    }

    /// Loads a JSON or YAML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let value = read_document(path.as_ref())?;
        Self::from_value(&value)
    }
}

/// Reads a `.json`, `.yaml` or `.yml` document into a JSON value.
pub(crate) fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "json" => Ok(serde_json::from_str(&content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        other => Err(ZiError::validation(format!(
            "unsupported document format '{other}' for {}",
            path.display()
        ))),
    }
}

/// One input together with the augmentations produced for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiAugmentationReport {
    pub original: String,
    /// Word count under the transformation's granularity.
    pub word_count: usize,
    pub augmentations: Vec<ZiAugmentation>,
}

impl ZiAugmentationReport {
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.augmentations.iter().map(|augmentation| augmentation.text.as_str())
    }
}

/// Candidates available at one site.
#[derive(Clone, Debug)]
struct ZiSiteCandidates {
    site: ZiSwapSite,
    replacements: Vec<String>,
}

/// Outputs of one `augment` call, deduplicated in production order.
struct ZiOutputCollector<'s> {
    original: &'s str,
    limit: usize,
    seen: HashSet<String>,
    outputs: Vec<ZiAugmentation>,
}

impl<'s> ZiOutputCollector<'s> {
    fn new(original: &'s str, limit: usize) -> Self {
        ZiOutputCollector {
            original,
            limit,
            seen: HashSet::new(),
            outputs: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.outputs.len() >= self.limit
    }

    fn is_known(&self, text: &str) -> bool {
        text == self.original || self.seen.contains(text)
    }

    fn push(&mut self, sentence: ZiAugmentedSentence<'_>) -> bool {
        if self.is_full() || sentence.is_unmodified() || self.is_known(sentence.text()) {
            return false;
        }
        self.seen.insert(sentence.text().to_string());
        self.outputs.push(sentence.into());
        true
    }
}

/// Orchestrates one transformation, its constraints and the search.
#[derive(Debug)]
pub struct ZiAugmenter {
    transformation: Box<dyn ZiTransformation>,
    constraints: Vec<Box<dyn ZiConstraint>>,
    site_constraints: Vec<Box<dyn ZiSiteConstraint>>,
    tokenizer: ZiTokenizer,
    config: ZiAugmenterConfig,
}

impl ZiAugmenter {
    /// Validates `config` and builds an augmenter around `transformation`.
    pub fn new<T: ZiTransformation + 'static>(
        transformation: T,
        config: ZiAugmenterConfig,
    ) -> Result<Self> {
        Self::from_boxed(Box::new(transformation), config)
    }

    pub fn from_boxed(
        transformation: Box<dyn ZiTransformation>,
        config: ZiAugmenterConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(ZiAugmenter {
            transformation,
            constraints: Vec::new(),
            site_constraints: Vec::new(),
            tokenizer: ZiTokenizer::new(),
            config,
        })
    }

    /// Augmenter with the default configuration (one output, exhaustive search).
    pub fn with_defaults<T: ZiTransformation + 'static>(transformation: T) -> Self {
        ZiAugmenter {
            transformation: Box::new(transformation),
            constraints: Vec::new(),
            site_constraints: Vec::new(),
            tokenizer: ZiTokenizer::new(),
            config: ZiAugmenterConfig::default(),
        }
    }

    /// Appends a constraint; constraints run in registration order.
    pub fn with_constraint<C: ZiConstraint + 'static>(mut self, constraint: C) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn with_boxed_constraint(mut self, constraint: Box<dyn ZiConstraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_site_constraint<C: ZiSiteConstraint + 'static>(mut self, constraint: C) -> Self {
        self.site_constraints.push(Box::new(constraint));
        self
    }

    pub fn with_boxed_site_constraint(mut self, constraint: Box<dyn ZiSiteConstraint>) -> Self {
        self.site_constraints.push(constraint);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: ZiTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Segments Han text with `lexicon`.
    pub fn with_lexicon(mut self, lexicon: Arc<ZiLexicon>) -> Self {
        self.tokenizer = self.tokenizer.with_lexicon(lexicon);
        self
    }

    pub fn config(&self) -> &ZiAugmenterConfig {
        &self.config
    }

    pub fn transformation(&self) -> &dyn ZiTransformation {
        self.transformation.as_ref()
    }

    pub fn tokenizer(&self) -> &ZiTokenizer {
        &self.tokenizer
    }

    /// Effective swap fraction.
    pub fn pct_words_to_swap(&self) -> f64 {
        self.config
            .pct_words_to_swap
            .unwrap_or_else(|| self.transformation.granularity().default_pct_words_to_swap())
    }

    /// Tokenizes `text` the way `augment` does.
    pub fn tokenize(&self, text: &str) -> ZiSentence {
        self.tokenizer
            .tokenize(text, self.transformation.granularity())
    }

    /// Maximum number of sites changed per output for a sentence of `words` words.
    pub fn swap_budget(&self, words: usize) -> usize {
        let scaled = (self.pct_words_to_swap() * words as f64).round() as usize;
        scaled.max(1)
    }

    /// Produces up to `transformations_per_example` distinct augmentations of `text`.
    pub fn augment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .augment_detailed(text)?
            .into_iter()
            .map(|augmentation| augmentation.text)
            .collect())
    }

    /// Like [`augment`](Self::augment), keeping the edits behind each output.
    pub fn augment_detailed(&self, text: &str) -> Result<Vec<ZiAugmentation>> {
        Ok(self.report(text)?.augmentations)
    }

    /// Runs one augmentation and records the input size next to the outputs.
    pub fn report(&self, text: &str) -> Result<ZiAugmentationReport> {
        let sentence = self.tokenize(text);
        let augmentations = self.search(&sentence)?;
        Ok(ZiAugmentationReport {
            original: text.to_string(),
            word_count: sentence.word_count(),
            augmentations,
        })
    }

    fn search(&self, sentence: &ZiSentence) -> Result<Vec<ZiAugmentation>> {
        if sentence.is_empty() {
            return Err(ZiError::validation("cannot augment an empty sentence"));
        }

        let budget = self.swap_budget(sentence.word_count());
        let table = self.candidate_table(sentence)?;
        if table.is_empty() {
            log::debug!(
                "{}: no candidates for '{}'",
                self.transformation.name(),
                sentence.raw()
            );
            return Ok(Vec::new());
        }

        let mut collector =
            ZiOutputCollector::new(sentence.raw(), self.config.transformations_per_example);
        if self.config.fast_augment {
            self.fast_search(sentence, &table, budget, &mut collector);
        } else {
            self.exhaustive_search(sentence, &table, budget, &mut collector);
        }

        log::debug!(
            "{}: budget={} sites={} outputs={} fast={}",
            self.transformation.name(),
            budget,
            table.len(),
            collector.outputs.len(),
            self.config.fast_augment
        );
        Ok(collector.outputs)
    }

    fn candidate_table(&self, sentence: &ZiSentence) -> Result<Vec<ZiSiteCandidates>> {
        let mut sites = self.transformation.swappable_sites(sentence)?;
        sites.sort();
        sites.dedup();

        let mut table = Vec::with_capacity(sites.len());
        for site in sites {
            let Some(original) = sentence.span_text(site.start, site.end) else {
                log::warn!(
                    "{}: ignoring out-of-range site {site}",
                    self.transformation.name()
                );
                continue;
            };
            if let Some(refused) = self
                .site_constraints
                .iter()
                .find(|constraint| !constraint.permits(sentence, &site))
            {
                log::trace!("site {site} refused by '{}'", refused.name());
                continue;
            }

            let mut seen = HashSet::new();
            let replacements: Vec<String> = self
                .transformation
                .candidates(sentence, &site)?
                .into_iter()
                .filter(|replacement| replacement != original)
                .filter(|replacement| seen.insert(replacement.clone()))
                .collect();
            if !replacements.is_empty() {
                table.push(ZiSiteCandidates { site, replacements });
            }
        }
        Ok(table)
    }

    fn accepts(&self, sentence: &ZiSentence, candidate: &ZiAugmentedSentence<'_>) -> bool {
        allows_all(&self.constraints, sentence, candidate)
    }

    fn exhaustive_search(
        &self,
        sentence: &ZiSentence,
        table: &[ZiSiteCandidates],
        budget: usize,
        collector: &mut ZiOutputCollector<'_>,
    ) {
        let largest = budget.min(table.len());
        let base = ZiAugmentedSentence::new(sentence);
        for size in (1..=largest).rev() {
            if self.enumerate(sentence, table, size, 0, &base, collector) {
                return;
            }
        }
    }

    /// Depth-first walk over combinations of exactly `size` edits starting at
    /// `table[from..]`. Returns `true` once the collector is full.
    fn enumerate<'s>(
        &self,
        sentence: &'s ZiSentence,
        table: &[ZiSiteCandidates],
        size: usize,
        from: usize,
        current: &ZiAugmentedSentence<'s>,
        collector: &mut ZiOutputCollector<'_>,
    ) -> bool {
        let missing = size - current.num_edits();
        for index in from..table.len() {
            if table.len() - index < missing {
                break;
            }
            let entry = &table[index];
            if current.is_modified_at(&entry.site) {
                continue;
            }
            for replacement in &entry.replacements {
                let candidate = ZiCandidate::new(entry.site, replacement.clone());
                let Some(next) = current.with_candidate(candidate) else {
                    continue;
                };
                if next.num_edits() == size {
                    if !collector.is_known(next.text()) && self.accepts(sentence, &next) {
                        collector.push(next);
                        if collector.is_full() {
                            return true;
                        }
                    }
                } else if self.enumerate(sentence, table, size, index + 1, &next, collector) {
                    return true;
                }
            }
        }
        false
    }

    fn fast_search<'s>(
        &self,
        sentence: &'s ZiSentence,
        table: &[ZiSiteCandidates],
        budget: usize,
        collector: &mut ZiOutputCollector<'_>,
    ) {
        let mut rng = SmallRng::seed_from_u64(self.config.seed);

        while !collector.is_full() {
            let mut current = ZiAugmentedSentence::new(sentence);
            let mut produced = false;

            loop {
                let mut neighbours = self.neighbours(sentence, table, &current, collector);
                if neighbours.is_empty() {
                    break;
                }
                if current.num_edits() + 1 >= budget {
                    for neighbour in neighbours {
                        produced |= collector.push(neighbour);
                    }
                    current = ZiAugmentedSentence::new(sentence);
                    break;
                }
                let choice = rng.gen_range(0..neighbours.len());
                current = neighbours.swap_remove(choice);
            }

            if !current.is_unmodified() {
                produced |= collector.push(current);
            }
            if !produced {
                break;
            }
        }
    }

    /// Every constraint-passing sentence one edit away from `current` that
    /// has not been produced yet, in site order then candidate order.
    fn neighbours<'s>(
        &self,
        sentence: &'s ZiSentence,
        table: &[ZiSiteCandidates],
        current: &ZiAugmentedSentence<'s>,
        collector: &ZiOutputCollector<'_>,
    ) -> Vec<ZiAugmentedSentence<'s>> {
        let mut seen = HashSet::new();
        let mut neighbours = Vec::new();
        for entry in table {
            if current.is_modified_at(&entry.site) {
                continue;
            }
            for replacement in &entry.replacements {
                let candidate = ZiCandidate::new(entry.site, replacement.clone());
                let Some(next) = current.with_candidate(candidate) else {
                    continue;
                };
                if collector.is_known(next.text()) || !seen.insert(next.text().to_string()) {
                    continue;
                }
                if self.accepts(sentence, &next) {
                    neighbours.push(next);
                }
            }
        }
        neighbours
    }
}
