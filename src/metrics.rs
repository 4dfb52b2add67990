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

use serde::Serialize;
use serde_json::Value;

use crate::augmenter::ZiAugmentationReport;
use crate::constraint::levenshtein;

/// Summary statistics over a set of augmentation reports.
#[derive(Debug, Serialize, Default, PartialEq)]
pub struct ZiAugmentationMetrics {
    pub total_inputs: usize,
    /// Inputs for which no augmentation was produced.
    pub skipped_inputs: usize,
    pub total_augmentations: usize,
    pub average_augmentations_per_input: f64,
    /// Mean share of the input's words changed per augmentation, in percent.
    pub average_words_perturbed_pct: f64,
    pub max_words_perturbed: usize,
    /// Mean character edit distance between an augmentation and its input.
    pub average_edit_distance: f64,
}

impl ZiAugmentationMetrics {
    pub fn compute(reports: &[ZiAugmentationReport]) -> Self {
        let mut metrics = ZiAugmentationMetrics {
            total_inputs: reports.len(),
            ..Default::default()
        };
        if reports.is_empty() {
            return metrics;
        }

        let mut perturbed_pct_total = 0.0f64;
        let mut edit_distance_total = 0usize;

        for report in reports {
            if report.augmentations.is_empty() {
                metrics.skipped_inputs += 1;
                continue;
            }
            for augmentation in &report.augmentations {
                metrics.total_augmentations += 1;
                let perturbed = augmentation.words_perturbed();
                metrics.max_words_perturbed = metrics.max_words_perturbed.max(perturbed);
                if report.word_count > 0 {
                    perturbed_pct_total += perturbed as f64 * 100.0 / report.word_count as f64;
                }
                edit_distance_total += levenshtein(&report.original, &augmentation.text);
            }
        }

        metrics.average_augmentations_per_input =
            metrics.total_augmentations as f64 / reports.len() as f64;
        if metrics.total_augmentations > 0 {
            metrics.average_words_perturbed_pct =
                perturbed_pct_total / metrics.total_augmentations as f64;
            metrics.average_edit_distance =
                edit_distance_total as f64 / metrics.total_augmentations as f64;
        }
        metrics
    }

    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
