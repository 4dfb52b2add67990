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

//! # Candidate Module
//!
//! Swap sites, single-site candidates and augmented sentences. An augmented
//! sentence is the original [`ZiSentence`] plus the candidates applied to it;
//! it keeps that provenance so the augmenter can enforce the swap budget,
//! refuse to touch a site twice, and report which sites changed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::ZiSentence;

/// Half-open range of word indices `[start, end)` a transformation may rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZiSwapSite {
    pub start: usize,
    pub end: usize,
}

impl ZiSwapSite {
    /// Site covering the single word at `index`.
    pub fn word(index: usize) -> Self {
        ZiSwapSite {
            start: index,
            end: index + 1,
        }
    }

    /// Site covering words `[start, end)`.
    pub fn span(start: usize, end: usize) -> Self {
        ZiSwapSite { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &ZiSwapSite) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

impl fmt::Display for ZiSwapSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

/// One proposed replacement at one site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZiCandidate {
    pub site: ZiSwapSite,
    pub replacement: String,
}

impl ZiCandidate {
    pub fn new(site: ZiSwapSite, replacement: impl Into<String>) -> Self {
        ZiCandidate {
            site,
            replacement: replacement.into(),
        }
    }
}

/// The original sentence with a set of non-overlapping candidates applied.
#[derive(Clone, Debug)]
pub struct ZiAugmentedSentence<'a> {
    original: &'a ZiSentence,
    /// Sorted by site start.
    edits: Vec<ZiCandidate>,
    text: String,
}

impl<'a> ZiAugmentedSentence<'a> {
    /// Unmodified view of `original`.
    pub fn new(original: &'a ZiSentence) -> Self {
        ZiAugmentedSentence {
            original,
            edits: Vec::new(),
            text: original.raw().to_string(),
        }
    }

    /// Applies one more candidate. Returns `None` when the site is invalid,
    /// overlaps an earlier edit, or the replacement equals the current text.
    pub fn with_candidate(&self, candidate: ZiCandidate) -> Option<Self> {
        let current = self
            .original
            .span_text(candidate.site.start, candidate.site.end)?;
        if current == candidate.replacement {
            return None;
        }
        if self.edits.iter().any(|edit| edit.site.overlaps(&candidate.site)) {
            return None;
        }

        let mut edits = self.edits.clone();
        let position = edits
            .iter()
            .position(|edit| edit.site.start > candidate.site.start)
            .unwrap_or(edits.len());
        edits.insert(position, candidate);

        let text = render(self.original, &edits);
        Some(ZiAugmentedSentence {
            original: self.original,
            edits,
            text,
        })
    }

    pub fn original(&self) -> &'a ZiSentence {
        self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn edits(&self) -> &[ZiCandidate] {
        &self.edits
    }

    pub fn num_edits(&self) -> usize {
        self.edits.len()
    }

    pub fn is_unmodified(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn modified_sites(&self) -> impl Iterator<Item = ZiSwapSite> + '_ {
        self.edits.iter().map(|edit| edit.site)
    }

    /// Number of original words covered by the applied edits.
    pub fn words_perturbed(&self) -> usize {
        self.edits.iter().map(|edit| edit.site.len()).sum()
    }

    pub fn is_modified_at(&self, site: &ZiSwapSite) -> bool {
        self.edits.iter().any(|edit| edit.site.overlaps(site))
    }
}

fn render(original: &ZiSentence, edits: &[ZiCandidate]) -> String {
    let raw = original.raw();
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for edit in edits {
        if let Some(range) = original.byte_range(edit.site.start, edit.site.end) {
            out.push_str(&raw[cursor..range.start]);
            out.push_str(&edit.replacement);
            cursor = range.end;
        }
    }
    out.push_str(&raw[cursor..]);
    out
}

/// Owned record of one produced augmentation and the edits behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiAugmentation {
    pub text: String,
    pub edits: Vec<ZiCandidate>,
}

impl From<ZiAugmentedSentence<'_>> for ZiAugmentation {
    fn from(sentence: ZiAugmentedSentence<'_>) -> Self {
        ZiAugmentation {
            text: sentence.text,
            edits: sentence.edits,
        }
    }
}

impl ZiAugmentation {
    pub fn words_perturbed(&self) -> usize {
        self.edits.iter().map(|edit| edit.site.len()).sum()
    }
}
