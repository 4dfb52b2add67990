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

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use ziaugment::{ZiAugmenter, ZiAugmenterConfig, ZiLookupTable, ZiWordSwapLookup};

const VOCAB: &[&str] = &["alpha", "delta", "zeta", "omega", "kappa", "Alpha", "ZETA"];

fn build(config: ZiAugmenterConfig) -> ZiAugmenter {
    let table = ZiLookupTable::from_entries(
        "greek",
        [
            ("alpha", vec!["beta", "gamma"]),
            ("delta", vec!["epsilon"]),
            ("zeta", vec!["eta", "theta", "iota"]),
        ],
    );
    ZiAugmenter::new(ZiWordSwapLookup::synonym(Arc::new(table)), config).unwrap()
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..10).prop_map(|words| words.join(" "))
}

fn config() -> impl Strategy<Value = ZiAugmenterConfig> {
    (1u32..=20, 1usize..8, any::<bool>(), any::<u64>()).prop_map(|(pct, count, fast, seed)| {
        ZiAugmenterConfig::default()
            .with_pct_words_to_swap(pct as f64 / 20.0)
            .with_transformations_per_example(count)
            .with_fast_augment(fast)
            .with_seed(seed)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outputs_are_distinct_bounded_and_modified(text in sentence(), config in config()) {
        let limit = config.transformations_per_example;
        let augmenter = build(config);
        let outputs = augmenter.augment(&text).unwrap();

        prop_assert!(outputs.len() <= limit);
        let unique: HashSet<&String> = outputs.iter().collect();
        prop_assert_eq!(unique.len(), outputs.len());
        prop_assert!(outputs.iter().all(|output| output != &text));
    }

    #[test]
    fn edits_respect_budget(text in sentence(), config in config()) {
        let pct = config.pct_words_to_swap.unwrap();
        let words = text.split_whitespace().count();
        let budget = ((pct * words as f64).ceil() as usize).max(1);
        let augmenter = build(config);
        let report = augmenter.report(&text).unwrap();
        prop_assert_eq!(report.word_count, words);
        let original = augmenter.tokenize(&text);

        for augmentation in &report.augmentations {
            prop_assert!(!augmentation.edits.is_empty());
            prop_assert!(augmentation.edits.len() <= budget);
            for edit in &augmentation.edits {
                let before = original.span_text(edit.site.start, edit.site.end).unwrap();
                prop_assert_ne!(before, edit.replacement.as_str());
            }
        }
    }

    #[test]
    fn same_seed_same_outputs(text in sentence(), config in config()) {
        let first = build(config.clone()).augment(&text).unwrap();
        let again = build(config).augment(&text).unwrap();
        prop_assert_eq!(first, again);
    }
}
