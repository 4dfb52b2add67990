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

//! # Resources Module
//!
//! External collaborators consumed by the transformations. Each is loaded
//! once by the caller and handed to transformations by reference
//! (`Arc<...>`); transformations never own global singletons.
//!
//! - **table**: Keyed substitution tables (homophones, morphonyms, synonyms)
//! - **tagger**: Named-entity tagger contract and a dictionary tagger
//! - **language_model**: Masked-language-model contract
//! - **gazetteer**: Bundled English person and location lists

pub mod gazetteer;
pub mod language_model;
pub mod table;
pub mod tagger;

pub use language_model::{ZiMaskFill, ZiMaskedLanguageModel};
pub use table::ZiLookupTable;
pub use tagger::{ZiEntityLabel, ZiEntitySpan, ZiEntityTagger, ZiGazetteerTagger};
