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

//! # Transformations Module
//!
//! Concrete transformations. Each one is a thin adapter between the
//! [`ZiTransformation`](crate::transformation::ZiTransformation) contract and
//! an external resource.
//!
//! ## Transformation Categories
//!
//! - **word_swap**: Word replacement from a lookup table (synonyms, HowNet)
//! - **character_swap**: Single-character replacement (homophones, morphonyms)
//! - **masked_lm**: Word replacement proposed by a masked language model
//! - **entity**: Location and person-name replacement over tagged spans
//!
//! ## Usage
//!
//! Table-backed transformations can be created through factory functions
//! from JSON configuration, or directly through their constructors.

pub mod character_swap;
pub mod entity;
pub mod masked_lm;
pub mod word_swap;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use crate::errors::{Result, ZiError};

pub use character_swap::ZiCharacterSwap;
pub use entity::{ZiLocationSwap, ZiNameSwap, ZiNameSwapMode};
pub use masked_lm::ZiMaskedLmWordSwap;
pub use word_swap::ZiWordSwapLookup;

/// Per-site RNG so that repeated queries for the same text agree.
pub(crate) fn site_rng(seed: u64, text: &str) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ xxh3_64(text.as_bytes()))
}

/// Reads an optional positive integer option from a factory config.
pub(crate) fn positive_option(config: &Value, name: &str, key: &str) -> Result<Option<usize>> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .filter(|n| *n > 0)
            .map(|n| Some(n as usize))
            .ok_or_else(|| ZiError::validation(format!("{name} '{key}' must be a positive integer"))),
    }
}
