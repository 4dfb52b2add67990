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

//! # Recipe Module
//!
//! Builds augmenters from configuration documents. The registry maps names to
//! factory functions, and a recipe names one transformation (or several,
//! combined into a composite), its constraints and the augmenter settings.
//!
//! ## Recipe Document
//!
//! ```json
//! {
//!   "transformation": {"name": "chinese.homophone", "config": {"table": "homophones.json"}},
//!   "constraints": [{"name": "max_words_perturbed", "config": {"max_num_words": 2}}],
//!   "site_constraints": [{"name": "stopword_modification"}],
//!   "lexicon": "words.txt",
//!   "augmenter": {"pct_words_to_swap": 0.1, "transformations_per_example": 5}
//! }
//! ```
//!
//! `"transformations"` may replace `"transformation"` with a list of steps.
//! Recipes read from a file resolve relative `table` and `lexicon` paths
//! against the recipe's directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::augmenter::{read_document, ZiAugmenter, ZiAugmenterConfig};
use crate::constraint::{self, ZiConstraint, ZiSiteConstraint};
use crate::errors::{Result, ZiError};
use crate::resources::{ZiEntityTagger, ZiMaskedLanguageModel};
use crate::text::ZiLexicon;
use crate::transformation::{ZiCompositeTransformation, ZiTransformation};
use crate::transformations::{character_swap, entity, word_swap};
use crate::transformations::ZiMaskedLmWordSwap;

pub type TransformationFactory =
    Arc<dyn Fn(&Value) -> Result<Box<dyn ZiTransformation>> + Send + Sync>;
pub type ConstraintFactory = Arc<dyn Fn(&Value) -> Result<Box<dyn ZiConstraint>> + Send + Sync>;
pub type SiteConstraintFactory =
    Arc<dyn Fn(&Value) -> Result<Box<dyn ZiSiteConstraint>> + Send + Sync>;

/// Registry mapping names to transformation and constraint factories.
#[derive(Default, Clone)]
pub struct ZiRecipeRegistry {
    transformations: HashMap<String, TransformationFactory>,
    constraints: HashMap<String, ConstraintFactory>,
    site_constraints: HashMap<String, SiteConstraintFactory>,
}

impl std::fmt::Debug for ZiRecipeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZiRecipeRegistry")
            .field("transformations", &self.transformation_names())
            .field("constraints", &sorted_keys(&self.constraints))
            .field("site_constraints", &sorted_keys(&self.site_constraints))
            .finish()
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

impl ZiRecipeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the bundled table-backed
    /// transformations, entity swaps and constraints.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register_transformation("word_swap.synonym", word_swap::word_swap_synonym_factory);
        self.register_transformation("chinese.hownet", word_swap::chinese_hownet_factory);
        self.register_transformation(
            "chinese.homophone",
            character_swap::chinese_homophone_factory,
        );
        self.register_transformation(
            "chinese.morphonym",
            character_swap::chinese_morphonym_factory,
        );
        self.register_transformation("entity.location", entity::entity_location_factory);
        self.register_transformation("entity.name", entity::entity_name_factory);

        self.register_constraint("max_words_perturbed", constraint::max_words_perturbed_factory);
        self.register_constraint("max_edit_distance", constraint::max_edit_distance_factory);
        self.register_site_constraint(
            "stopword_modification",
            constraint::stopword_modification_factory,
        );
        self.register_site_constraint("min_word_length", constraint::min_word_length_factory);
    }

    pub fn register_transformation<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn ZiTransformation>> + Send + Sync + 'static,
    {
        self.transformations.insert(name.into(), Arc::new(factory));
    }

    pub fn register_constraint<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn ZiConstraint>> + Send + Sync + 'static,
    {
        self.constraints.insert(name.into(), Arc::new(factory));
    }

    pub fn register_site_constraint<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn ZiSiteConstraint>> + Send + Sync + 'static,
    {
        self.site_constraints.insert(name.into(), Arc::new(factory));
    }

    /// Registers `word_swap.masked_lm` and `chinese.masked_lm` backed by `model`.
    pub fn with_masked_language_model(mut self, model: Arc<dyn ZiMaskedLanguageModel>) -> Self {
        let english = model.clone();
        self.register_transformation("word_swap.masked_lm", move |config: &Value| {
            let swap = ZiMaskedLmWordSwap::new(english.clone()).configure(config)?;
            Ok(Box::new(swap) as Box<dyn ZiTransformation>)
        });
        self.register_transformation("chinese.masked_lm", move |config: &Value| {
            let swap = ZiMaskedLmWordSwap::chinese(model.clone()).configure(config)?;
            Ok(Box::new(swap) as Box<dyn ZiTransformation>)
        });
        self
    }

    /// Re-registers the entity swaps so that they use `tagger`.
    pub fn with_entity_tagger(mut self, tagger: Arc<dyn ZiEntityTagger>) -> Self {
        let location_tagger = tagger.clone();
        self.register_transformation("entity.location", move |config: &Value| {
            let swap = entity::location_swap_from_config(location_tagger.clone(), config)?;
            Ok(Box::new(swap) as Box<dyn ZiTransformation>)
        });
        self.register_transformation("entity.name", move |config: &Value| {
            let swap = entity::name_swap_from_config(tagger.clone(), config)?;
            Ok(Box::new(swap) as Box<dyn ZiTransformation>)
        });
        self
    }

    pub fn transformation_names(&self) -> Vec<&str> {
        sorted_keys(&self.transformations)
    }

    pub fn has_transformation(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }

    /// Instantiates one registered transformation.
    pub fn transformation(&self, name: &str, config: &Value) -> Result<Box<dyn ZiTransformation>> {
        let factory = self.transformations.get(name).ok_or_else(|| {
            ZiError::validation(format!("unknown transformation '{name}'"))
        })?;
        factory(config)
    }

    pub fn constraint(&self, name: &str, config: &Value) -> Result<Box<dyn ZiConstraint>> {
        let factory = self
            .constraints
            .get(name)
            .ok_or_else(|| ZiError::validation(format!("unknown constraint '{name}'")))?;
        factory(config)
    }

    pub fn site_constraint(&self, name: &str, config: &Value) -> Result<Box<dyn ZiSiteConstraint>> {
        let factory = self
            .site_constraints
            .get(name)
            .ok_or_else(|| ZiError::validation(format!("unknown site constraint '{name}'")))?;
        factory(config)
    }

    /// Builds an augmenter from a recipe document.
    pub fn build(&self, recipe: &Value) -> Result<ZiAugmenter> {
        self.build_in(recipe, None)
    }

    /// Loads a JSON or YAML recipe and builds an augmenter from it.
    pub fn build_from_path(&self, path: impl AsRef<Path>) -> Result<ZiAugmenter> {
        let path = path.as_ref();
        let recipe = read_document(path)?;
        self.build_in(&recipe, path.parent())
    }

    fn build_in(&self, recipe: &Value, base: Option<&Path>) -> Result<ZiAugmenter> {
        let object = recipe
            .as_object()
            .ok_or_else(|| ZiError::validation("recipe must be an object"))?;

        let transformation = match (object.get("transformation"), object.get("transformations")) {
            (Some(step), None) => self.transformation_step(step, "transformation", base)?,
            (None, Some(Value::Array(items))) if !items.is_empty() => {
                let mut members = Vec::with_capacity(items.len());
                for (index, step) in items.iter().enumerate() {
                    members.push(self.transformation_step(
                        step,
                        &format!("transformations #{index}"),
                        base,
                    )?);
                }
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    Box::new(ZiCompositeTransformation::new(members))
                }
            }
            (None, Some(_)) => {
                return Err(ZiError::validation(
                    "recipe 'transformations' must be a non-empty array",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ZiError::validation(
                    "recipe must not set both 'transformation' and 'transformations'",
                ))
            }
            (None, None) => {
                return Err(ZiError::validation("recipe missing 'transformation'"));
            }
        };

        let config = match object.get("augmenter") {
            None | Some(Value::Null) => ZiAugmenterConfig::default(),
            Some(value) => ZiAugmenterConfig::from_value(value)?,
        };
        let mut augmenter = ZiAugmenter::from_boxed(transformation, config)?;

        for (index, step) in steps(object.get("constraints"), "constraints")?
            .iter()
            .enumerate()
        {
            let (name, config) = step_parts(step, &format!("constraints #{index}"))?;
            augmenter = augmenter.with_boxed_constraint(self.constraint(name, &config)?);
        }
        for (index, step) in steps(object.get("site_constraints"), "site_constraints")?
            .iter()
            .enumerate()
        {
            let (name, config) = step_parts(step, &format!("site_constraints #{index}"))?;
            augmenter = augmenter.with_boxed_site_constraint(self.site_constraint(name, &config)?);
        }

        if let Some(lexicon) = object.get("lexicon") {
            augmenter = augmenter.with_lexicon(Arc::new(load_lexicon(lexicon, base)?));
        }

        log::info!(
            "built augmenter '{}' with {} constraints",
            augmenter.transformation().name(),
            object
                .get("constraints")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0)
        );
        Ok(augmenter)
    }

    fn transformation_step(
        &self,
        step: &Value,
        label: &str,
        base: Option<&Path>,
    ) -> Result<Box<dyn ZiTransformation>> {
        let (name, mut config) = step_parts(step, label)?;
        if let (Some(base), Some(Value::String(table))) = (base, config.get("table").cloned()) {
            if let Some(object) = config.as_object_mut() {
                object.insert(
                    "table".to_string(),
                    Value::String(resolve(base, &table).to_string_lossy().into_owned()),
                );
            }
        }
        self.transformation(name, &config)
    }
}

fn steps<'v>(value: Option<&'v Value>, key: &str) -> Result<&'v [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ZiError::validation(format!("recipe '{key}' must be an array"))),
    }
}

/// Splits a `{"name": ..., "config": ...}` step. A bare string is a step without config.
fn step_parts<'v>(step: &'v Value, label: &str) -> Result<(&'v str, Value)> {
    match step {
        Value::String(name) => Ok((name.as_str(), Value::Object(Default::default()))),
        Value::Object(object) => {
            let name = object.get("name").and_then(Value::as_str).ok_or_else(|| {
                ZiError::validation(format!("recipe {label} missing string 'name'"))
            })?;
            let config = match object.get("config") {
                None | Some(Value::Null) => Value::Object(Default::default()),
                Some(config) => config.clone(),
            };
            Ok((name, config))
        }
        _ => Err(ZiError::validation(format!(
            "recipe {label} must be an object or a string"
        ))),
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_lexicon(value: &Value, base: Option<&Path>) -> Result<ZiLexicon> {
    match value {
        Value::String(path) => match base {
            Some(base) => ZiLexicon::from_path(resolve(base, path)),
            None => ZiLexicon::from_path(path),
        },
        Value::Array(words) => {
            let words = words
                .iter()
                .map(|word| {
                    word.as_str()
                        .ok_or_else(|| ZiError::validation("recipe 'lexicon' entries must be strings"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ZiLexicon::new(words))
        }
        _ => Err(ZiError::validation(
            "recipe 'lexicon' must be a path or an array of words",
        )),
    }
}
