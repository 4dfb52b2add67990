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

use ziaugment::{
    ZiAugmenter, ZiAugmenterConfig, ZiError, ZiLookupTable, ZiMaxEditDistance,
    ZiMaxWordsPerturbed, ZiMinWordLength, ZiPredicateConstraint, ZiSentence,
    ZiStopwordModification, ZiSwapSite, ZiTransformation, ZiWordSwapLookup,
};

fn synonyms() -> Arc<ZiLookupTable> {
    Arc::new(ZiLookupTable::from_entries(
        "synonyms",
        [
            ("the", vec!["a"]),
            ("quick", vec!["fast", "rapid"]),
            ("brown", vec!["tan"]),
            ("fox", vec!["wolf", "dog"]),
        ],
    ))
}

fn augmenter(config: ZiAugmenterConfig) -> ZiAugmenter {
    ZiAugmenter::new(ZiWordSwapLookup::synonym(synonyms()), config).unwrap()
}

/// Emits fixed candidates for every word, including repeats and the word itself.
#[derive(Debug)]
struct EchoSwap;

impl ZiTransformation for EchoSwap {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn swappable_sites(&self, sentence: &ZiSentence) -> ziaugment::Result<Vec<ZiSwapSite>> {
        Ok((0..sentence.word_count()).map(ZiSwapSite::word).collect())
    }

    fn candidates(
        &self,
        sentence: &ZiSentence,
        site: &ZiSwapSite,
    ) -> ziaugment::Result<Vec<String>> {
        let word = sentence.word(site.start).unwrap_or_default().to_string();
        Ok(vec![word.clone(), "x".to_string(), "x".to_string(), word])
    }
}

/// Transformation whose backing resource is unavailable.
#[derive(Debug)]
struct Unavailable;

impl ZiTransformation for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn swappable_sites(&self, _sentence: &ZiSentence) -> ziaugment::Result<Vec<ZiSwapSite>> {
        Err(ZiError::resource("tagger", "model not loaded"))
    }

    fn candidates(
        &self,
        _sentence: &ZiSentence,
        _site: &ZiSwapSite,
    ) -> ziaugment::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_no_sites_yields_empty_result() {
    let augmenter = augmenter(ZiAugmenterConfig::default());
    assert!(augmenter.augment("nothing matches here").unwrap().is_empty());
    assert!(augmenter.augment("?!").unwrap().is_empty());
}

#[test]
fn test_empty_input_is_rejected() {
    let augmenter = augmenter(ZiAugmenterConfig::default());
    for input in ["", "   "] {
        let err = augmenter.augment(input).unwrap_err();
        assert!(err.is_configuration(), "{err}");
    }
}

#[test]
fn test_default_pct_follows_granularity() {
    let augmenter = augmenter(ZiAugmenterConfig::default());
    assert!((augmenter.pct_words_to_swap() - 0.1).abs() < f64::EPSILON);
    assert_eq!(augmenter.swap_budget(9), 1);
    assert_eq!(augmenter.swap_budget(25), 3);
}

#[test]
fn test_constraint_limits_edits_and_falls_back_to_smaller_combinations() {
    let augmenter = augmenter(
        ZiAugmenterConfig::default()
            .with_pct_words_to_swap(1.0)
            .with_transformations_per_example(10),
    )
    .with_site_constraint(ZiStopwordModification::default())
    .with_constraint(ZiMaxWordsPerturbed::new(Some(1), None).unwrap());

    let out = augmenter.augment("the quick brown fox").unwrap();
    assert_eq!(
        out,
        vec![
            "the fast brown fox",
            "the rapid brown fox",
            "the quick tan fox",
            "the quick brown wolf",
            "the quick brown dog",
        ]
    );
}

#[test]
fn test_site_constraints_remove_sites() {
    let augmenter = augmenter(
        ZiAugmenterConfig::default()
            .with_pct_words_to_swap(0.25)
            .with_transformations_per_example(10),
    )
    .with_site_constraint(ZiMinWordLength::new(4));

    let out = augmenter.augment("the quick brown fox").unwrap();
    assert_eq!(out, vec!["the fast brown fox", "the rapid brown fox", "the quick tan fox"]);
}

#[test]
fn test_constraints_short_circuit() {
    let augmenter = augmenter(ZiAugmenterConfig::default().with_transformations_per_example(5))
        .with_constraint(ZiPredicateConstraint::new("never", |_, _| false))
        .with_constraint(ZiPredicateConstraint::new("unreachable", |_, _| {
            panic!("evaluated after a rejection")
        }));
    assert!(augmenter.augment("the quick brown fox").unwrap().is_empty());
}

#[test]
fn test_edit_distance_constraint_filters_candidates() {
    let augmenter = augmenter(
        ZiAugmenterConfig::default()
            .with_pct_words_to_swap(0.25)
            .with_transformations_per_example(10),
    )
    .with_constraint(ZiMaxEditDistance::new(3));
    let out = augmenter.augment("the quick brown fox").unwrap();
    assert_eq!(
        out,
        vec!["a quick brown fox", "the quick brown wolf", "the quick brown dog"]
    );
}

#[test]
fn test_noop_and_duplicate_candidates_are_dropped() {
    let augmenter = ZiAugmenter::new(
        EchoSwap,
        ZiAugmenterConfig::default().with_transformations_per_example(10),
    )
    .unwrap();
    let out = augmenter.augment("a b").unwrap();
    assert_eq!(out, vec!["x b", "a x"]);
}

#[test]
fn test_transformation_errors_propagate() {
    let augmenter = ZiAugmenter::new(Unavailable, ZiAugmenterConfig::default()).unwrap();
    match augmenter.augment("hello world") {
        Err(ZiError::Resource { resource, .. }) => assert_eq!(resource, "tagger"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_fast_mode_is_deterministic_and_bounded() {
    let config = ZiAugmenterConfig::default()
        .with_pct_words_to_swap(0.5)
        .with_transformations_per_example(4)
        .with_fast_augment(true)
        .with_seed(7);
    let first = augmenter(config.clone());
    let second = augmenter(config);

    let text = "the quick brown fox";
    let a = first.augment(text).unwrap();
    let b = first.augment(text).unwrap();
    let c = second.augment(text).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.len(), 4);
    assert_eq!(a.iter().collect::<HashSet<_>>().len(), a.len());
    assert!(a.iter().all(|out| out != text));
}

#[test]
fn test_fast_mode_exhausts_small_search_space() {
    let augmenter = augmenter(
        ZiAugmenterConfig::default()
            .with_transformations_per_example(50)
            .with_fast_augment(true),
    );
    let mut out = augmenter.augment("quick fox").unwrap();
    out.sort();
    assert_eq!(
        out,
        vec!["fast fox", "quick dog", "quick wolf", "rapid fox"]
    );
}

#[test]
fn test_detailed_report_keeps_edits() {
    let augmenter = augmenter(
        ZiAugmenterConfig::default()
            .with_pct_words_to_swap(0.5)
            .with_transformations_per_example(1),
    );
    let report = augmenter.report("the quick brown fox").unwrap();
    assert_eq!(report.word_count, 4);
    assert_eq!(report.augmentations.len(), 1);
    let augmentation = &report.augmentations[0];
    assert_eq!(augmentation.text, "a fast brown fox");
    let sites: Vec<_> = augmentation.edits.iter().map(|edit| edit.site).collect();
    assert_eq!(sites, vec![ZiSwapSite::word(0), ZiSwapSite::word(1)]);
}

#[test]
fn test_config_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("augmenter.yaml");
    std::fs::write(
        &path,
        "pct_words_to_swap: 0.2\ntransformations_per_example: 3\nfast_augment: true\n",
    )
    .unwrap();
    let config = ZiAugmenterConfig::from_path(&path).unwrap();
    assert_eq!(config.pct_words_to_swap, Some(0.2));
    assert_eq!(config.transformations_per_example, 3);
    assert!(config.fast_augment);
    assert_eq!(config.seed, ziaugment::DEFAULT_SEED);

    std::fs::write(&path, "transformations_per_example: 0\n").unwrap();
    assert!(ZiAugmenterConfig::from_path(&path).unwrap_err().is_configuration());
}
