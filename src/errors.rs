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

//! # Zi Augment Error Module
//!
//! This module defines the error types used throughout the augmentation
//! engine for consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while loading resources or batch files
//! - **Validation**: Invalid configuration or input (fails fast)
//! - **Transformation**: Failures raised by a transformation implementation
//! - **Resource**: An external collaborator (tagger, language model, lookup
//!   table) is unavailable or failed to answer a query
//! - **Serde**: Serialization/deserialization errors
//! - **Csv**: CSV batch job errors
//!
//! "No candidate" and "constraint rejected" are not errors. They are absorbed
//! into normal control flow and show up as shorter (possibly empty) results.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Zi Augment.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zi Augment.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Any failure raised by a transformation implementation.
    #[error("transformation '{transformation}' failed: {message}")]
    Transformation {
        transformation: String,
        message: String,
    },

    /// An external resource could not be loaded or queried.
    #[error("resource '{resource}' unavailable: {message}")]
    Resource { resource: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors originating from CSV reading or writing.
    #[error("csv error: {0}")]
    Csv(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Csv(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct transformation errors.
    pub fn transformation(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Transformation {
            transformation: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct resource errors.
    pub fn resource(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Resource {
            resource: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error is a configuration problem rather than a runtime failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ZiError::Validation { .. })
    }
}
