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

//! # Lookup Table Module
//!
//! Keyed substitution tables backing the lookup transformations: homophone
//! and morphonym character maps, synonym tables and HowNet-style sense
//! graphs. A table maps a key (a character or a word) to an ordered list of
//! substitutes.
//!
//! ## Sources
//!
//! - **Map**: `{"树": ["书", "数"]}`
//! - **Groups**: `{"groups": [["听见", "可见"]]}`, every member maps to the
//!   other members of each group it belongs to (sense groups, homophone sets)
//! - **Readings**: `{"readings": [["树", "shu"], ["书", "shu"]]}`, characters
//!   sharing a reading are grouped together
//! - **TSV**: one `key<TAB>substitute substitute ...` line per key
//!
//! JSON and YAML documents accept all three shapes.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZiTableDocument {
    Groups { groups: Vec<Vec<String>> },
    Readings { readings: Vec<(String, String)> },
    Map(BTreeMap<String, Vec<String>>),
}

/// Key to ordered substitutes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiLookupTable {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl ZiLookupTable {
    pub fn new(name: impl Into<String>) -> Self {
        ZiLookupTable {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Builds a table from explicit key/substitutes pairs.
    pub fn from_entries<I, K, V, S>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(name);
        for (key, values) in entries {
            table.insert(key, values);
        }
        table
    }

    /// Builds a table where each member of a group maps to the others.
    pub fn from_groups<I, G, S>(name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(name);
        for group in groups {
            let members: Vec<String> = group.into_iter().map(Into::into).collect();
            for member in &members {
                let others = members.iter().filter(|other| *other != member).cloned();
                table.insert(member.clone(), others);
            }
        }
        table
    }

    /// Groups keys that share a reading (for example pinyin without tones).
    pub fn from_readings<I, K, R>(name: impl Into<String>, readings: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for (key, reading) in readings {
            let reading = reading.into();
            if !grouped.contains_key(&reading) {
                order.push(reading.clone());
            }
            grouped.entry(reading).or_default().push(key.into());
        }
        let groups = order
            .into_iter()
            .filter_map(|reading| grouped.remove(&reading));
        Self::from_groups(name, groups)
    }

    /// Loads a table from a `.json`, `.yaml`/`.yml` or `.tsv`/`.txt` file.
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| ZiError::resource(&name, format!("{}: {err}", path.display())))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::from_document(name, serde_json::from_str(&content)?)),
            "yaml" | "yml" => Ok(Self::from_document(name, serde_yaml::from_str(&content)?)),
            "tsv" | "txt" => Ok(Self::from_tsv(name, &content)),
            other => Err(ZiError::validation(format!(
                "unsupported lookup table format '{other}' for {}",
                path.display()
            ))),
        }
    }

    /// Builds a table from an inline JSON document.
    pub fn from_json(name: impl Into<String>, value: &Value) -> Result<Self> {
        let document: ZiTableDocument = serde_json::from_value(value.clone())?;
        Ok(Self::from_document(name.into(), document))
    }

    /// Builds a table from a factory config holding `table` (a path),
    /// `entries`, `groups` or `readings`.
    pub fn from_config(name: &str, config: &Value) -> Result<Self> {
        let obj = config
            .as_object()
            .ok_or_else(|| ZiError::validation(format!("{name} config must be object")))?;

        if let Some(path) = obj.get("table") {
            let path = path
                .as_str()
                .ok_or_else(|| ZiError::validation(format!("{name} 'table' must be a path")))?;
            return Self::load(name, path);
        }
        if let Some(entries) = obj.get("entries") {
            return Self::from_json(name, entries);
        }
        for key in ["groups", "readings"] {
            if let Some(value) = obj.get(key) {
                let mut document = serde_json::Map::new();
                document.insert(key.to_string(), value.clone());
                return Self::from_json(name, &Value::Object(document));
            }
        }
        Err(ZiError::validation(format!(
            "{name} requires one of 'table', 'entries', 'groups' or 'readings'"
        )))
    }

    fn from_document(name: String, document: ZiTableDocument) -> Self {
        match document {
            ZiTableDocument::Groups { groups } => Self::from_groups(name, groups),
            ZiTableDocument::Readings { readings } => Self::from_readings(name, readings),
            ZiTableDocument::Map(map) => Self::from_entries(name, map),
        }
    }

    fn from_tsv(name: String, content: &str) -> Self {
        let mut table = Self::new(name);
        for line in content.lines() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, values)) = line.split_once('\t') {
                table.insert(key.trim(), values.split_whitespace());
            }
        }
        table
    }

    /// Appends substitutes for `key`, skipping repeats and the key itself.
    pub fn insert<K, V, S>(&mut self, key: K, values: V)
    where
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        let slot = self.entries.entry(key.clone()).or_default();
        for value in values {
            let value = value.into();
            if value != key && !slot.contains(&value) {
                slot.push(value);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitutes for `key`; empty when the key is unknown.
    pub fn lookup(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|values| !values.is_empty())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
