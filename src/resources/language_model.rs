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

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One filler proposed by a masked language model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiMaskFill {
    pub token: String,
    pub score: f32,
}

impl ZiMaskFill {
    pub fn new(token: impl Into<String>, score: f32) -> Self {
        ZiMaskFill {
            token: token.into(),
            score,
        }
    }
}

/// Masked-language-model scorer.
///
/// Receives a sentence in which exactly one position has been replaced by
/// [`mask_token`](Self::mask_token) and returns ranked fillers, best first.
/// The model is owned by the caller and shared by handle.
pub trait ZiMaskedLanguageModel: Debug + Send + Sync {
    fn mask_token(&self) -> &str {
        "<mask>"
    }

    fn fill_mask(&self, masked_text: &str) -> Result<Vec<ZiMaskFill>>;
}
