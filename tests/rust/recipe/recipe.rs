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

use serde_json::{json, Value};
use ziaugment::{
    ZiEntityLabel, ZiEntityTagger, ZiGazetteerTagger, ZiMaskFill, ZiMaskedLanguageModel,
    ZiRecipeRegistry, ZiTransformation, ZiWordSwapLookup, ZiLookupTable,
};

const SENTENCE: &str = "听见树林的呢喃，发现溪流中的知识。";

#[derive(Debug)]
struct TableModel(HashMap<&'static str, Vec<(&'static str, f32)>>);

impl ZiMaskedLanguageModel for TableModel {
    fn fill_mask(&self, masked_text: &str) -> ziaugment::Result<Vec<ZiMaskFill>> {
        Ok(self
            .0
            .get(masked_text)
            .map(|fills| {
                fills
                    .iter()
                    .map(|(token, score)| ZiMaskFill::new(*token, *score))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[test]
fn test_inline_recipe_builds_homophone_augmenter() {
    let recipe = json!({
        "transformation": {
            "name": "chinese.homophone",
            "config": {"readings": [["树", "shu"], ["书", "shu"], ["知", "zhi"], ["之", "zhi"]]}
        },
        "lexicon": ["听见", "树林", "呢喃", "发现", "溪流", "知识"],
        "augmenter": {"pct_words_to_swap": 0.1, "transformations_per_example": 5, "fast_augment": true}
    });
    let augmenter = ZiRecipeRegistry::with_defaults().build(&recipe).unwrap();
    assert_eq!(augmenter.transformation().name(), "chinese.homophone");
    assert_eq!(
        augmenter.augment(SENTENCE).unwrap(),
        vec![
            "听见书林的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，发现溪流中的之识。",
        ]
    );
}

#[test]
fn test_recipe_file_resolves_relative_resources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("morphonyms.json"),
        r#"{"识": ["枳"], "林": ["材"]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("words.txt"),
        "听见\n树林\n呢喃\n发现\n溪流\n知识\n",
    )
    .unwrap();
    let recipe_path = dir.path().join("recipe.yaml");
    std::fs::write(
        &recipe_path,
        "transformation:\n  name: chinese.morphonym\n  config:\n    table: morphonyms.json\nlexicon: words.txt\naugmenter:\n  pct_words_to_swap: 0.1\n  transformations_per_example: 5\n  fast_augment: true\n",
    )
    .unwrap();

    let augmenter = ZiRecipeRegistry::with_defaults()
        .build_from_path(&recipe_path)
        .unwrap();
    assert_eq!(
        augmenter.augment(SENTENCE).unwrap(),
        vec![
            "听见树材的呢喃，发现溪流中的知识。",
            "听见树林的呢喃，发现溪流中的知枳。",
        ]
    );
}

#[test]
fn test_transformation_list_builds_composite() {
    let recipe = json!({
        "transformations": [
            {"name": "word_swap.synonym", "config": {"entries": {"quick": ["fast"]}}},
            {"name": "word_swap.synonym", "config": {"entries": {"quick": ["fast", "speedy"], "fox": ["dog"]}}}
        ],
        "augmenter": {"pct_words_to_swap": 0.25, "transformations_per_example": 10}
    });
    let augmenter = ZiRecipeRegistry::with_defaults().build(&recipe).unwrap();
    assert_eq!(augmenter.transformation().name(), "composite");
    assert_eq!(
        augmenter.augment("the quick fox").unwrap(),
        vec!["the fast fox", "the speedy fox", "the quick dog"]
    );
}

#[test]
fn test_constraint_steps_apply_in_order() {
    let recipe = json!({
        "transformation": {
            "name": "word_swap.synonym",
            "config": {"entries": {"the": ["a"], "quick": ["fast"], "fox": ["dog"]}}
        },
        "constraints": [{"name": "max_words_perturbed", "config": {"max_num_words": 1}}],
        "site_constraints": ["stopword_modification"],
        "augmenter": {"pct_words_to_swap": 1.0, "transformations_per_example": 10}
    });
    let augmenter = ZiRecipeRegistry::with_defaults().build(&recipe).unwrap();
    assert_eq!(
        augmenter.augment("the quick fox").unwrap(),
        vec!["the fast fox", "the quick dog"]
    );
}

#[test]
fn test_invalid_recipes_are_configuration_errors() {
    let registry = ZiRecipeRegistry::with_defaults();
    let synonym = json!({"name": "word_swap.synonym", "config": {"entries": {"a": ["b"]}}});
    let cases: Vec<Value> = vec![
        json!([]),
        json!({}),
        json!({"transformations": []}),
        json!({"transformation": synonym.clone(), "transformations": [synonym.clone()]}),
        json!({"transformation": {"name": "word_swap.synonym", "config": {}}}),
        json!({"transformation": synonym.clone(), "constraints": [{"name": "max_words_perturbed"}]}),
        json!({"transformation": synonym.clone(), "site_constraints": [{"name": "unknown"}]}),
        json!({"transformation": synonym.clone(), "augmenter": {"pct_words_to_swap": 2.0}}),
        json!({"transformation": synonym.clone(), "lexicon": 7}),
        json!({"transformation": {"name": "entity.name", "config": {"mode": "middle"}}}),
    ];
    for recipe in cases {
        let err = registry.build(&recipe).unwrap_err();
        assert!(err.is_configuration(), "{recipe}: {err}");
    }
}

#[test]
fn test_masked_lm_registration() {
    let mut fills = HashMap::new();
    fills.insert(
        "听见树林的呢喃，<mask>溪流中的知识。",
        vec![("了解", 0.5), ("察觉", 0.4), ("look", 0.3)],
    );
    let model: Arc<dyn ZiMaskedLanguageModel> = Arc::new(TableModel(fills));
    let registry = ZiRecipeRegistry::with_defaults().with_masked_language_model(model);
    assert!(registry.has_transformation("chinese.masked_lm"));
    assert!(registry.has_transformation("word_swap.masked_lm"));

    let recipe = json!({
        "transformation": {"name": "chinese.masked_lm", "config": {"max_candidates": 1}},
        "lexicon": ["听见", "树林", "呢喃", "发现", "溪流", "知识"],
        "augmenter": {"pct_words_to_swap": 0.1, "transformations_per_example": 5, "fast_augment": true}
    });
    let augmenter = registry.build(&recipe).unwrap();
    assert_eq!(
        augmenter.augment(SENTENCE).unwrap(),
        vec!["听见树林的呢喃，了解溪流中的知识。"]
    );
}

#[test]
fn test_entity_tagger_override_and_custom_factory() {
    let tagger: Arc<dyn ZiEntityTagger> = Arc::new(
        ZiGazetteerTagger::new().with_phrases(ZiEntityLabel::Location, ["Gotham"]),
    );
    let mut registry = ZiRecipeRegistry::with_defaults().with_entity_tagger(tagger);
    let augmenter = registry
        .build(&json!({"transformation": {"name": "entity.location", "config": {"max_candidates": 2}}}))
        .unwrap();
    let outputs = augmenter.augment("Gotham at night.").unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(|output| output.ends_with(" at night.")));

    registry.register_transformation("word_swap.shout", |_config: &Value| {
        let table = ZiLookupTable::from_entries("shout", [("hey", ["HEY"])]);
        Ok(Box::new(ZiWordSwapLookup::new("word_swap.shout", Arc::new(table)))
            as Box<dyn ZiTransformation>)
    });
    let augmenter = registry
        .build(&json!({"transformation": "word_swap.shout"}))
        .unwrap();
    assert_eq!(augmenter.augment("hey there").unwrap(), vec!["HEY there"]);
}

#[test]
fn test_unbounded_name_candidates_still_augment() {
    let recipe = json!({
        "transformation": {"name": "entity.name", "config": {"max_candidates": u64::MAX}},
        "augmenter": {"transformations_per_example": 3}
    });
    let augmenter = ZiRecipeRegistry::with_defaults().build(&recipe).unwrap();
    let outputs = augmenter.augment("My name is Anthony Davis.").unwrap();
    assert_eq!(outputs.len(), 3);
    for output in &outputs {
        assert!(output.starts_with("My name is "), "{output}");
        assert_ne!(output, "My name is Anthony Davis.");
    }
}
