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

//! # Entity Swap Module
//!
//! Entity-aware transformations. A tagger locates entity spans, and each span
//! is replaced as one contiguous unit so that the replacement keeps the
//! positional role of the original entity.
//!
//! - **ZiLocationSwap**: replaces `Location` spans with other places
//! - **ZiNameSwap**: replaces `Person` spans, keeping first/last name roles
//!
//! Replacements are drawn from gazetteers with an RNG derived from the
//! configured seed and the span text, so the same span always yields the
//! same candidates.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::ZiSwapSite;
use crate::errors::{Result, ZiError};
use crate::resources::gazetteer;
use crate::resources::{ZiEntityLabel, ZiEntityTagger, ZiGazetteerTagger};
use crate::text::{ZiGranularity, ZiSentence};
use crate::transformation::{distinct_replacements, ZiTransformation};
use crate::transformations::{positive_option, site_rng};

const DEFAULT_ENTITY_CANDIDATES: usize = 3;
const DEFAULT_ENTITY_SEED: u64 = 0x10ca_7104;

/// Word ranges of the tagged spans carrying `label`, leftmost first and
/// without overlaps.
fn entity_sites(
    tagger: &dyn ZiEntityTagger,
    sentence: &ZiSentence,
    label: &ZiEntityLabel,
) -> Result<Vec<ZiSwapSite>> {
    let mut sites: Vec<ZiSwapSite> = tagger
        .tag(sentence.raw())?
        .into_iter()
        .filter(|span| &span.label == label)
        .filter_map(|span| sentence.words_in_byte_range(span.start, span.end))
        .map(|(start, end)| ZiSwapSite::span(start, end))
        .collect();
    sites.sort();
    let mut kept: Vec<ZiSwapSite> = Vec::with_capacity(sites.len());
    for site in sites {
        if kept.last().map(|last| last.overlaps(&site)).unwrap_or(false) {
            continue;
        }
        kept.push(site);
    }
    Ok(kept)
}

fn entity_options(config: &Value, name: &str) -> Result<(Option<usize>, Option<u64>)> {
    if !config.is_object() && !config.is_null() {
        return Err(ZiError::validation(format!("{name} config must be object")));
    }
    let max = positive_option(config, name, "max_candidates")?;
    let seed = match config.get("seed") {
        None => None,
        Some(value) => Some(
            value
                .as_u64()
                .ok_or_else(|| ZiError::validation(format!("{name} 'seed' must be an unsigned integer")))?,
        ),
    };
    Ok((max, seed))
}

/// Swaps location entities for other places.
#[derive(Debug, Clone)]
pub struct ZiLocationSwap {
    tagger: Arc<dyn ZiEntityTagger>,
    locations: Vec<String>,
    max_candidates: usize,
    seed: u64,
}

impl ZiLocationSwap {
    pub fn new(tagger: Arc<dyn ZiEntityTagger>) -> Self {
        ZiLocationSwap {
            tagger,
            locations: gazetteer::LOCATIONS.iter().map(|s| s.to_string()).collect(),
            max_candidates: DEFAULT_ENTITY_CANDIDATES,
            seed: DEFAULT_ENTITY_SEED,
        }
    }

    /// Location swap driven by the bundled dictionary tagger.
    pub fn english() -> Self {
        Self::new(Arc::new(ZiGazetteerTagger::english()))
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl ZiTransformation for ZiLocationSwap {
    fn name(&self) -> &'static str {
        "entity.location"
    }

    fn granularity(&self) -> ZiGranularity {
        ZiGranularity::Entity
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        entity_sites(self.tagger.as_ref(), sentence, &ZiEntityLabel::Location)
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let Some(original) = sentence.span_text(site.start, site.end) else {
            return Ok(Vec::new());
        };
        let pool: Vec<&String> = self
            .locations
            .iter()
            .filter(|location| !location.eq_ignore_ascii_case(original))
            .collect();
        let mut rng = site_rng(self.seed, original);
        let picked = pool
            .choose_multiple(&mut rng, self.max_candidates)
            .map(|location| location.to_string());
        Ok(distinct_replacements(original, picked))
    }
}

/// Which parts of a person name are replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiNameSwapMode {
    #[default]
    Full,
    FirstOnly,
    LastOnly,
}

/// Swaps person names.
///
/// A one-word name is treated as a first name (a last name in
/// [`ZiNameSwapMode::LastOnly`]). For longer names the first word is drawn
/// from the first-name list and the last word from the last-name list; the
/// text in between is kept.
#[derive(Debug, Clone)]
pub struct ZiNameSwap {
    tagger: Arc<dyn ZiEntityTagger>,
    first_names: Vec<String>,
    last_names: Vec<String>,
    mode: ZiNameSwapMode,
    max_candidates: usize,
    seed: u64,
}

impl ZiNameSwap {
    pub fn new(tagger: Arc<dyn ZiEntityTagger>) -> Self {
        ZiNameSwap {
            tagger,
            first_names: gazetteer::FIRST_NAMES.iter().map(|s| s.to_string()).collect(),
            last_names: gazetteer::LAST_NAMES.iter().map(|s| s.to_string()).collect(),
            mode: ZiNameSwapMode::Full,
            max_candidates: DEFAULT_ENTITY_CANDIDATES,
            seed: DEFAULT_ENTITY_SEED,
        }
    }

    pub fn english() -> Self {
        Self::new(Arc::new(ZiGazetteerTagger::english()))
    }

    pub fn with_names<F, L, S, T>(mut self, first_names: F, last_names: L) -> Self
    where
        F: IntoIterator<Item = S>,
        L: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.first_names = first_names.into_iter().map(Into::into).collect();
        self.last_names = last_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: ZiNameSwapMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl ZiTransformation for ZiNameSwap {
    fn name(&self) -> &'static str {
        "entity.name"
    }

    fn granularity(&self) -> ZiGranularity {
        ZiGranularity::Entity
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        entity_sites(self.tagger.as_ref(), sentence, &ZiEntityLabel::Person)
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let (Some(original), Some(first), Some(last)) = (
            sentence.span_text(site.start, site.end),
            sentence.byte_range(site.start, site.start + 1),
            sentence.byte_range(site.end.saturating_sub(1), site.end),
        ) else {
            return Ok(Vec::new());
        };
        let raw = sentence.raw();
        let first_word = &raw[first.clone()];
        let last_word = &raw[last.clone()];
        let single = site.len() == 1;

        let mut rng = site_rng(self.seed, original);
        let mut pick = |names: &[String], current: &str| -> Option<String> {
            let pool: Vec<&String> = names.iter().filter(|name| *name != current).collect();
            pool.choose(&mut rng).map(|name| name.to_string())
        };

        // No more distinct proposals exist than the name pools can combine into.
        let combinations = match (single, self.mode) {
            (true, ZiNameSwapMode::LastOnly) => self.last_names.len(),
            (true, _) => self.first_names.len(),
            (false, ZiNameSwapMode::FirstOnly) => self.first_names.len(),
            (false, ZiNameSwapMode::LastOnly) => self.last_names.len(),
            (false, ZiNameSwapMode::Full) => {
                self.first_names.len().saturating_mul(self.last_names.len())
            }
        };
        let wanted = self.max_candidates.min(combinations);

        let mut proposals = Vec::new();
        let mut seen = HashSet::new();
        for _ in 0..wanted.saturating_mul(4) {
            if proposals.len() >= wanted {
                break;
            }
            let proposal = if single {
                match self.mode {
                    ZiNameSwapMode::LastOnly => pick(&self.last_names, first_word),
                    _ => pick(&self.first_names, first_word),
                }
            } else {
                let head = match self.mode {
                    ZiNameSwapMode::LastOnly => Some(first_word.to_string()),
                    _ => pick(&self.first_names, first_word),
                };
                let tail = match self.mode {
                    ZiNameSwapMode::FirstOnly => Some(last_word.to_string()),
                    _ => pick(&self.last_names, last_word),
                };
                match (head, tail) {
                    (Some(head), Some(tail)) => {
                        Some(format!("{head}{}{tail}", &raw[first.end..last.start]))
                    }
                    _ => None,
                }
            };
            match proposal {
                Some(proposal) if proposal != original && seen.insert(proposal.clone()) => {
                    proposals.push(proposal)
                }
                Some(_) => {}
                None => break,
            }
        }
        Ok(distinct_replacements(original, proposals))
    }
}

/// Builds a location swap around `tagger` from a JSON config.
pub fn location_swap_from_config(
    tagger: Arc<dyn ZiEntityTagger>,
    config: &Value,
) -> Result<ZiLocationSwap> {
    let (max, seed) = entity_options(config, "entity.location")?;
    let mut transformation = ZiLocationSwap::new(tagger);
    if let Some(max) = max {
        transformation = transformation.with_max_candidates(max);
    }
    if let Some(seed) = seed {
        transformation = transformation.with_seed(seed);
    }
    Ok(transformation)
}

/// Builds a name swap around `tagger` from a JSON config.
pub fn name_swap_from_config(tagger: Arc<dyn ZiEntityTagger>, config: &Value) -> Result<ZiNameSwap> {
    let (max, seed) = entity_options(config, "entity.name")?;
    let mut transformation = ZiNameSwap::new(tagger);
    if let Some(max) = max {
        transformation = transformation.with_max_candidates(max);
    }
    if let Some(seed) = seed {
        transformation = transformation.with_seed(seed);
    }
    if let Some(mode) = config.get("mode") {
        let mode: ZiNameSwapMode = serde_json::from_value(mode.clone()).map_err(|_| {
            ZiError::validation("entity.name 'mode' must be 'full', 'first_only' or 'last_only'")
        })?;
        transformation = transformation.with_mode(mode);
    }
    Ok(transformation)
}

pub fn entity_location_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    let tagger: Arc<dyn ZiEntityTagger> = Arc::new(ZiGazetteerTagger::english());
    Ok(Box::new(location_swap_from_config(tagger, config)?))
}

pub fn entity_name_factory(config: &Value) -> Result<Box<dyn ZiTransformation>> {
    let tagger: Arc<dyn ZiEntityTagger> = Arc::new(ZiGazetteerTagger::english());
    Ok(Box::new(name_swap_from_config(tagger, config)?))
}
