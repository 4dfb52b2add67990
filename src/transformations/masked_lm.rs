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

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use crate::candidate::ZiSwapSite;
use crate::errors::{Result, ZiError};
use crate::resources::ZiMaskedLanguageModel;
use crate::text::{is_cjk, ZiSentence};
use crate::transformation::{distinct_replacements, word_sites, ZiTransformation};
use crate::transformations::positive_option;

/// Word swap proposed by a masked language model.
///
/// The site is replaced by the model's mask token, the model ranks fillers,
/// and the top `max_candidates` fillers other than the original word are
/// kept. The Chinese flavour only keeps fillers made entirely of CJK
/// characters.
#[derive(Debug, Clone)]
pub struct ZiMaskedLmWordSwap {
    name: &'static str,
    model: Arc<dyn ZiMaskedLanguageModel>,
    max_candidates: usize,
    min_confidence: Option<f32>,
    cjk_only: bool,
}

impl ZiMaskedLmWordSwap {
    pub fn new(model: Arc<dyn ZiMaskedLanguageModel>) -> Self {
        ZiMaskedLmWordSwap {
            name: "word_swap.masked_lm",
            model,
            max_candidates: 50,
            min_confidence: None,
            cjk_only: false,
        }
    }

    pub fn chinese(model: Arc<dyn ZiMaskedLanguageModel>) -> Self {
        ZiMaskedLmWordSwap {
            name: "chinese.masked_lm",
            cjk_only: true,
            ..Self::new(model)
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    /// Applies `max_candidates`, `min_confidence` and `cjk_only` from a JSON config.
    pub fn configure(mut self, config: &Value) -> Result<Self> {
        if let Some(max) = positive_option(config, self.name, "max_candidates")? {
            self.max_candidates = max;
        }
        if let Some(value) = config.get("min_confidence") {
            let confidence = value
                .as_f64()
                .filter(|c| (0.0..=1.0).contains(c))
                .ok_or_else(|| {
                    ZiError::validation(format!("{} 'min_confidence' must be in [0,1]", self.name))
                })?;
            self.min_confidence = Some(confidence as f32);
        }
        if let Some(value) = config.get("cjk_only") {
            self.cjk_only = value.as_bool().ok_or_else(|| {
                ZiError::validation(format!("{} 'cjk_only' must be boolean", self.name))
            })?;
        }
        Ok(self)
    }

    fn accepts(&self, token: &str, score: f32) -> bool {
        if self.cjk_only && !token.chars().all(is_cjk) {
            return false;
        }
        self.min_confidence.map(|min| score >= min).unwrap_or(true)
    }
}

impl ZiTransformation for ZiMaskedLmWordSwap {
    fn name(&self) -> &'static str {
        self.name
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> Result<Vec<ZiSwapSite>> {
        Ok(word_sites(sentence))
    }

    fn candidates(&self, sentence: &ZiSentence, site: &ZiSwapSite) -> Result<Vec<String>> {
        let Some(range) = sentence.byte_range(site.start, site.end) else {
            return Ok(Vec::new());
        };
        let raw = sentence.raw();
        let original = &raw[range.clone()];
        let masked = format!(
            "{}{}{}",
            &raw[..range.start],
            self.model.mask_token(),
            &raw[range.end..]
        );

        let mut fills = self.model.fill_mask(&masked)?;
        fills.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let accepted = fills
            .into_iter()
            .take(self.max_candidates)
            .map(|fill| (fill.token.trim().to_string(), fill.score))
            .filter(|(token, score)| self.accepts(token, *score))
            .map(|(token, _)| token);
        Ok(distinct_replacements(original, accepted))
    }
}
