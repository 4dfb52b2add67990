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

//! # Zi Augment Library
//!
//! Adversarial text augmentation. Given an input sentence, a transformation
//! (word swap, character swap, named-entity substitution) proposes
//! replacements, and the augmenter searches combinations of them under a swap
//! budget and a list of constraints to produce distinct perturbed sentences.
//!
//! ## Module Overview
//!
//! - **errors**: `ZiError` and the crate `Result` alias
//! - **text**: Tokenizer, lexicon-based Han segmentation, sentences with byte offsets
//! - **candidate**: Swap sites, candidates and augmented sentences with provenance
//! - **transformation**: The `ZiTransformation` contract and composition
//! - **transformations**: Word lookup, character, masked-LM and entity swaps
//! - **resources**: Lookup tables, entity taggers and masked language models
//! - **constraint**: Candidate constraints and site constraints
//! - **augmenter**: Budgeted exhaustive and fast search
//! - **recipe**: Registry and JSON/YAML recipe documents
//! - **batch**: Many-input helpers and CSV jobs
//! - **metrics**: Statistics over augmentation reports
//!
//! ## Feature Flags
//!
//! - `csv`: Enables `ZiCsvAugmentJob`
//! - `parallel`: Augments batches on the rayon thread pool
//! - `full`: Enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ziaugment::{ZiAugmenter, ZiAugmenterConfig, ZiLookupTable, ZiWordSwapLookup};
//!
//! let table = ZiLookupTable::from_entries("synonyms", [("quick", ["fast", "rapid"])]);
//! let augmenter = ZiAugmenter::new(
//!     ZiWordSwapLookup::synonym(Arc::new(table)),
//!     ZiAugmenterConfig::default().with_transformations_per_example(2),
//! )
//! .unwrap();
//!
//! let outputs = augmenter.augment("The quick fox.").unwrap();
//! assert_eq!(outputs, vec!["The fast fox.", "The rapid fox."]);
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. Configuration problems
//! are reported when an augmenter is built; failures of external
//! collaborators (taggers, language models) propagate out of `augment`.

pub mod augmenter;
pub mod batch;
pub mod candidate;
pub mod constraint;
pub mod errors;
pub mod metrics;
pub mod recipe;
pub mod resources;
pub mod text;
pub mod transformation;
pub mod transformations;

pub use augmenter::{ZiAugmentationReport, ZiAugmenter, ZiAugmenterConfig, DEFAULT_SEED};
#[cfg(feature = "csv")]
pub use batch::ZiCsvAugmentJob;
pub use candidate::{ZiAugmentation, ZiAugmentedSentence, ZiCandidate, ZiSwapSite};
pub use constraint::{
    ZiConstraint, ZiMaxEditDistance, ZiMaxWordsPerturbed, ZiMinWordLength, ZiPredicateConstraint,
    ZiSiteConstraint, ZiStopwordModification,
};
pub use errors::{Result, ZiError};
pub use metrics::ZiAugmentationMetrics;
pub use recipe::ZiRecipeRegistry;
pub use resources::{
    ZiEntityLabel, ZiEntitySpan, ZiEntityTagger, ZiGazetteerTagger, ZiLookupTable, ZiMaskFill,
    ZiMaskedLanguageModel,
};
pub use text::{ZiGranularity, ZiLexicon, ZiSentence, ZiToken, ZiTokenKind, ZiTokenizer};
pub use transformation::{ZiCompositeTransformation, ZiTransformation};
pub use transformations::{
    ZiCharacterSwap, ZiLocationSwap, ZiMaskedLmWordSwap, ZiNameSwap, ZiNameSwapMode,
    ZiWordSwapLookup,
};
