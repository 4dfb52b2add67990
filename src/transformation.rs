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

//! # Zi Transformation Module
//!
//! This module defines the transformation contract. A transformation is a
//! pluggable strategy that proposes replacement values at specific positions
//! of a sentence; the [`ZiAugmenter`](crate::augmenter::ZiAugmenter) decides
//! which of those proposals end up in an output.
//!
//! ## Implementing Custom Transformations
//!
//! Any type implementing [`ZiTransformation`] can be plugged into an augmenter.
//! The trait requires three methods:
//!
//! - `name()`: Returns a static string identifier for the transformation
//! - `swappable_sites()`: Lists the sites the transformation can act on
//! - `candidates()`: Lists the replacements for one site
//!
//! ```rust
//! use ziaugment::candidate::ZiSwapSite;
//! use ziaugment::errors::Result;
//! use ziaugment::text::ZiSentence;
//! use ziaugment::transformation::{word_sites, ZiTransformation};
//!
//! #[derive(Debug)]
//! struct Shout;
//!
//! impl ZiTransformation for Shout {
//!     fn name(&self) -> &'static str {
//!         "word_swap.shout"
//!     }
//!
//!     fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
//!         Ok(word_sites(sentence))
//!     }
//!
//!     fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
//!         Ok(sentence
//!             .span_text(site.start, site.end)
//!             .map(|word| vec![word.to_uppercase()])
//!             .unwrap_or_default())
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Transformations return `Result` so that an unavailable collaborator (a
//! tagger that failed to load, a language model that cannot be queried)
//! reaches the caller. A site without any replacement is not an error and is
//! reported as an empty candidate list.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use crate::candidate::ZiSwapSite;
use crate::errors::Result;
use crate::text::{ZiGranularity, ZiSentence};

/// Contract that every transformation must fulfill.
///
/// # Determinism
///
/// For the same sentence and site, repeated calls must return the same
/// candidates within one process. Randomized variants take an explicit seed
/// and derive their sampling from it.
///
/// # Context
///
/// Candidates are always computed against the original sentence. The
/// augmenter never rewrites a site twice and sites never overlap, so the text
/// at a site is the original text at that site even after other sites have
/// been swapped.
pub trait ZiTransformation: Debug + Send + Sync {
    /// Unique, human-readable name for the transformation.
    ///
    /// This name is used for logging, error messages and recipe lookup.
    fn name(&self) -> &'static str;

    /// Level at which sites are addressed. Drives tokenization and the
    /// default swap fraction.
    fn granularity(&self) -> ZiGranularity {
        ZiGranularity::Word
    }

    /// Sites the transformation may act on, leftmost first.
    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>>;

    /// Replacement values for `site`, in the transformation's preferred order.
    ///
    /// Every value must differ from the current text at `site`. An empty list
    /// means no valid replacement exists.
    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>>;
}

impl<T: ZiTransformation + ?Sized> ZiTransformation for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn granularity(&self) -> ZiGranularity {
        (**self).granularity()
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        (**self).swappable_sites(sentence)
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        (**self).candidates(sentence, site)
    }
}

/// One site per word of the sentence.
pub fn word_sites(sentence: &ZiSentence) -> Vec<ZiSwapSite> {
    (0..sentence.word_count()).map(ZiSwapSite::word).collect()
}

/// Drops replacements equal to `original`, empty strings and repeats,
/// keeping first-seen order.
pub fn distinct_replacements<I>(original: &str, replacements: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    replacements
        .into_iter()
        .filter(|value| !value.is_empty() && value != original)
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Union of several transformations behind one call site.
///
/// Sites are reported in ascending order with duplicates removed. Candidates
/// for a site are the concatenation, in registration order, of the
/// candidates of every member that lists the site.
///
/// Member site lists are remembered for the most recent sentence, so asking
/// for candidates at many sites queries each member's sites once.
#[derive(Debug)]
pub struct ZiCompositeTransformation {
    members: Vec<Box<dyn ZiTransformation>>,
    member_sites: Mutex<Option<ZiMemberSites>>,
}

#[derive(Debug)]
struct ZiMemberSites {
    text: String,
    word_count: usize,
    sites: Arc<Vec<Vec<ZiSwapSite>>>,
}

impl ZiCompositeTransformation {
    pub fn new(members: Vec<Box<dyn ZiTransformation>>) -> Self {
        ZiCompositeTransformation {
            members,
            member_sites: Mutex::new(None),
        }
    }

    fn sites_per_member(&self, sentence: &ZiSentence) -> Result<Arc<Vec<Vec<ZiSwapSite>>>> {
        if let Ok(cached) = self.member_sites.lock() {
            if let Some(cached) = cached.as_ref() {
                if cached.text == sentence.raw() && cached.word_count == sentence.word_count() {
                    return Ok(Arc::clone(&cached.sites));
                }
            }
        }

        let sites = Arc::new(
            self.members
                .iter()
                .map(|member| member.swappable_sites(sentence))
                .collect::<Result<Vec<_>>>()?,
        );
        if let Ok(mut cached) = self.member_sites.lock() {
            *cached = Some(ZiMemberSites {
                text: sentence.raw().to_string(),
                word_count: sentence.word_count(),
                sites: Arc::clone(&sites),
            });
        }
        Ok(sites)
    }

    pub fn members(&self) -> &[Box<dyn ZiTransformation>] {
        &self.members
    }
}

impl ZiTransformation for ZiCompositeTransformation {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn granularity(&self) -> ZiGranularity {
        self.members
            .first()
            .map(|member| member.granularity())
            .unwrap_or_default()
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        let mut sites: Vec<ZiSwapSite> =
            self.sites_per_member(sentence)?.iter().flatten().copied().collect();
        sites.sort();
        sites.dedup();
        Ok(sites)
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let original = sentence.span_text(site.start, site.end).unwrap_or_default();
        let member_sites = self.sites_per_member(sentence)?;
        let mut collected = Vec::new();
        for (member, sites) in self.members.iter().zip(member_sites.iter()) {
            if sites.contains(site) {
                collected.extend(member.candidates(sentence, site)?);
            }
        }
        Ok(distinct_replacements(original, collected))
    }
}
