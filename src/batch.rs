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

//! # Batch Module
//!
//! Augmentation over many inputs. Every input is augmented independently with
//! the augmenter's seed, so results do not depend on input order or on
//! whether the `parallel` feature is enabled.

#[cfg(feature = "csv")]
use std::fs::File;
#[cfg(feature = "csv")]
use std::io::{Read, Write};
#[cfg(feature = "csv")]
use std::path::Path;

#[cfg(feature = "csv")]
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::augmenter::{ZiAugmentationReport, ZiAugmenter};
use crate::errors::{Result, ZiError};

impl ZiAugmenter {
    /// Augments every input, keeping input order.
    pub fn augment_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<Vec<String>>> {
        #[cfg(feature = "parallel")]
        {
            texts
                .par_iter()
                .map(|text| self.augment(text.as_ref()))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            texts.iter().map(|text| self.augment(text.as_ref())).collect()
        }
    }

    /// Runs [`report`](ZiAugmenter::report) over every input.
    pub fn report_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<ZiAugmentationReport>> {
        #[cfg(feature = "parallel")]
        {
            texts.par_iter().map(|text| self.report(text.as_ref())).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            texts.iter().map(|text| self.report(text.as_ref())).collect()
        }
    }

    /// Flattens augmentations of `texts` into parallel text and id lists.
    ///
    /// Each input contributes its original text first (unless
    /// `exclude_original`) followed by its augmentations, all carrying the
    /// input's id.
    pub fn augment_text_with_ids<S, I>(
        &self,
        texts: &[S],
        ids: &[I],
        exclude_original: bool,
    ) -> Result<(Vec<String>, Vec<I>)>
    where
        S: AsRef<str> + Sync,
        I: Clone,
    {
        if texts.len() != ids.len() {
            return Err(ZiError::validation(format!(
                "augment_text_with_ids expects as many ids as texts ({} texts, {} ids)",
                texts.len(),
                ids.len()
            )));
        }

        let augmented = self.augment_many(texts)?;
        let mut all_texts = Vec::new();
        let mut all_ids = Vec::new();
        for ((text, id), outputs) in texts.iter().zip(ids).zip(augmented) {
            if !exclude_original {
                all_texts.push(text.as_ref().to_string());
                all_ids.push(id.clone());
            }
            for output in outputs {
                all_texts.push(output);
                all_ids.push(id.clone());
            }
        }
        Ok((all_texts, all_ids))
    }
}

/// Augments one column of a CSV file, copying the other columns.
#[cfg(feature = "csv")]
#[derive(Clone, Debug)]
pub struct ZiCsvAugmentJob {
    pub input_column: String,
    pub exclude_original: bool,
    pub delimiter: u8,
}

#[cfg(feature = "csv")]
impl ZiCsvAugmentJob {
    pub fn new(input_column: impl Into<String>) -> Self {
        ZiCsvAugmentJob {
            input_column: input_column.into(),
            exclude_original: false,
            delimiter: b',',
        }
    }

    pub fn with_exclude_original(mut self, exclude_original: bool) -> Self {
        self.exclude_original = exclude_original;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads rows from `reader`, writes originals and augmentations to
    /// `writer`, and returns the number of rows written (header excluded).
    pub fn run<R: Read, W: Write>(
        &self,
        augmenter: &ZiAugmenter,
        reader: R,
        writer: W,
    ) -> Result<usize> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let column = headers
            .iter()
            .position(|name| name == self.input_column)
            .ok_or_else(|| {
                ZiError::validation(format!(
                    "input column '{}' not found in csv header",
                    self.input_column
                ))
            })?;

        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;
        // Blank cells are copied through without augmentation.
        let texts: Vec<&str> = rows.iter().map(|row| row.get(column).unwrap_or("")).collect();
        let filled: Vec<usize> = (0..texts.len())
            .filter(|&index| !texts[index].trim().is_empty())
            .collect();
        let inputs: Vec<&str> = filled.iter().map(|&index| texts[index]).collect();
        let mut augmented = vec![Vec::new(); rows.len()];
        for (index, outputs) in filled.into_iter().zip(augmenter.augment_many(&inputs)?) {
            augmented[index] = outputs;
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);
        writer.write_record(&headers)?;

        let mut written = 0usize;
        for (row, outputs) in rows.iter().zip(augmented) {
            if !self.exclude_original {
                writer.write_record(row)?;
                written += 1;
            }
            for output in outputs {
                let fields = row
                    .iter()
                    .enumerate()
                    .map(|(index, field)| if index == column { output.as_str() } else { field });
                writer.write_record(fields)?;
                written += 1;
            }
        }
        writer.flush()?;

        log::info!(
            "augmented {} csv rows into {} rows (column '{}')",
            rows.len(),
            written,
            self.input_column
        );
        Ok(written)
    }

    pub fn run_paths(
        &self,
        augmenter: &ZiAugmenter,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize> {
        let input = File::open(input)?;
        let output = File::create(output)?;
        self.run(augmenter, input, output)
    }
}
