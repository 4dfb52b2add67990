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

use std::collections::HashMap;
use std::sync::Arc;

use ziaugment::{
    ZiAugmenter, ZiAugmenterConfig, ZiCharacterSwap, ZiError, ZiGranularity, ZiLexicon,
    ZiLookupTable, ZiMaskFill, ZiMaskedLanguageModel, ZiMaskedLmWordSwap, ZiTransformation,
    ZiWordSwapLookup,
};

const SENTENCE: &str = "听见树林的呢喃，发现溪流中的知识。";

fn lexicon() -> Arc<ZiLexicon> {
    Arc::new(ZiLexicon::new(["听见", "树林", "呢喃", "发现", "溪流", "知识"]))
}

fn scenario_config() -> ZiAugmenterConfig {
    ZiAugmenterConfig::default()
        .with_pct_words_to_swap(0.1)
        .with_transformations_per_example(5)
        .with_fast_augment(true)
}

fn scenario<T: ZiTransformation + 'static>(transformation: T) -> ZiAugmenter {
    ZiAugmenter::new(transformation, scenario_config())
        .unwrap()
        .with_lexicon(lexicon())
}

fn homophones() -> Arc<ZiLookupTable> {
    Arc::new(ZiLookupTable::from_readings(
        "homophones",
        [
            ("听", "ting"),
            ("厅", "ting"),
            ("树", "shu"),
            ("书", "shu"),
            ("数", "shu"),
            ("知", "zhi"),
            ("之", "zhi"),
            ("识", "shi"),
            ("十", "shi"),
        ],
    ))
}

#[derive(Debug, Default)]
struct FakeMaskedLm {
    fills: HashMap<String, Vec<ZiMaskFill>>,
}

impl FakeMaskedLm {
    fn with(mut self, masked: &str, fills: &[(&str, f32)]) -> Self {
        self.fills.insert(
            masked.to_string(),
            fills
                .iter()
                .map(|(token, score)| ZiMaskFill::new(*token, *score))
                .collect(),
        );
        self
    }
}

impl ZiMaskedLanguageModel for FakeMaskedLm {
    fn fill_mask(&self, masked_text: &str) -> ziaugment::Result<Vec<ZiMaskFill>> {
        Ok(self.fills.get(masked_text).cloned().unwrap_or_default())
    }
}

#[derive(Debug)]
struct OfflineMaskedLm;

impl ZiMaskedLanguageModel for OfflineMaskedLm {
    fn fill_mask(&self, _masked_text: &str) -> ziaugment::Result<Vec<ZiMaskFill>> {
        Err(ZiError::resource("masked_lm", "model weights not found"))
    }
}

#[test]
fn test_homophone_scenario() {
    let augmenter = scenario(ZiCharacterSwap::homophone(homophones()));
    let outputs = augmenter.augment(SENTENCE).unwrap();
    assert_eq!(
        outputs,
        vec![
            "厅见树林的呢喃，发现溪流中的知识。",
            "听见书林的呢喃，发现溪流中的知识。",
            "听见数林的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，发现溪流中的之识。",
            "听见树林的呢喃，发现溪流中的知十。",
        ]
    );
}

#[test]
fn test_morphonym_scenario() {
    let table = ZiLookupTable::from_entries(
        "morphonyms",
        [
            ("林", vec!["材"]),
            ("现", vec!["见"]),
            ("溪", vec!["奚"]),
            ("识", vec!["只", "枳"]),
        ],
    );
    let augmenter = scenario(ZiCharacterSwap::morphonym(Arc::new(table)));
    let outputs = augmenter.augment(SENTENCE).unwrap();
    assert_eq!(
        outputs,
        vec![
            "听见树材的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，发见溪流中的知识。",
            "听见树林的呢喃，发现奚流中的知识。",
            "听见树林的呢喃，发现溪流中的知只。",
            "听见树林的呢喃，发现溪流中的知枳。",
        ]
    );
}

#[test]
fn test_hownet_scenario() {
    let table = ZiLookupTable::from_groups(
        "hownet",
        [
            vec!["听见", "可见"],
            vec!["树林", "森林"],
            vec!["发现", "察觉", "发觉"],
            vec!["知识", "学问"],
        ],
    );
    let augmenter = scenario(ZiWordSwapLookup::hownet(Arc::new(table)));
    let outputs = augmenter.augment(SENTENCE).unwrap();
    assert_eq!(
        outputs,
        vec![
            "可见树林的呢喃，发现溪流中的知识。",
            "听见森林的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，察觉溪流中的知识。",
            "听见树林的呢喃，发觉溪流中的知识。",
            "听见树林的呢喃，发现溪流中的学问。",
        ]
    );
}

#[test]
fn test_masked_lm_scenario() {
    let model = FakeMaskedLm::default()
        .with(
            "<mask>树林的呢喃，发现溪流中的知识。",
            &[("听见", 0.5), ("听到", 0.3), ("ok", 0.2)],
        )
        .with("听见<mask>的呢喃，发现溪流中的知识。", &[("森林", 0.5)])
        .with(
            "听见树林的呢喃，<mask>溪流中的知识。",
            &[("察觉", 0.2), ("发现", 0.4), ("了解", 0.35)],
        )
        .with("听见树林的呢喃，发现溪流中的<mask>。", &[("秘密", 0.7), ("知识", 0.1)]);
    let augmenter = scenario(ZiMaskedLmWordSwap::chinese(Arc::new(model)));
    let outputs = augmenter.augment(SENTENCE).unwrap();
    assert_eq!(
        outputs,
        vec![
            "听到树林的呢喃，发现溪流中的知识。",
            "听见森林的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，了解溪流中的知识。",
            "听见树林的呢喃，察觉溪流中的知识。",
            "听见树林的呢喃，发现溪流中的秘密。",
        ]
    );
}

#[test]
fn test_masked_lm_confidence_and_cap() {
    let model = FakeMaskedLm::default().with(
        "听见树林的呢喃，<mask>溪流中的知识。",
        &[("察觉", 0.2), ("发现", 0.4), ("了解", 0.35)],
    );
    let swap = ZiMaskedLmWordSwap::chinese(Arc::new(model)).with_min_confidence(0.3);
    let augmenter = scenario(swap);
    assert_eq!(
        augmenter.augment(SENTENCE).unwrap(),
        vec!["听见树林的呢喃，了解溪流中的知识。"]
    );
}

#[test]
fn test_masked_lm_failure_propagates() {
    let augmenter = scenario(ZiMaskedLmWordSwap::chinese(Arc::new(OfflineMaskedLm)));
    match augmenter.augment(SENTENCE) {
        Err(ZiError::Resource { resource, .. }) => assert_eq!(resource, "masked_lm"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_character_granularity_addresses_single_characters() {
    let swap = ZiCharacterSwap::homophone(homophones()).with_granularity(ZiGranularity::Character);
    let augmenter = ZiAugmenter::new(
        swap,
        ZiAugmenterConfig::default().with_transformations_per_example(3),
    )
    .unwrap()
    .with_lexicon(lexicon());

    assert_eq!(augmenter.tokenize(SENTENCE).word_count(), 15);
    assert_eq!(augmenter.swap_budget(15), 1);
    assert_eq!(
        augmenter.augment(SENTENCE).unwrap(),
        vec![
            "厅见树林的呢喃，发现溪流中的知识。",
            "听见书林的呢喃，发现溪流中的知识。",
            "听见数林的呢喃，发现溪流中的知识。",
        ]
    );
}

#[test]
fn test_exhaustive_and_fast_agree_for_single_swaps() {
    let exhaustive = ZiAugmenter::new(
        ZiCharacterSwap::homophone(homophones()),
        scenario_config().with_fast_augment(false),
    )
    .unwrap()
    .with_lexicon(lexicon());
    let fast = scenario(ZiCharacterSwap::homophone(homophones()));
    assert_eq!(
        exhaustive.augment(SENTENCE).unwrap(),
        fast.augment(SENTENCE).unwrap()
    );
}
