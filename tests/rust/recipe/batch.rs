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

use std::sync::Arc;

use ziaugment::{
    ZiAugmentationMetrics, ZiAugmenter, ZiAugmenterConfig, ZiCsvAugmentJob, ZiLookupTable,
    ZiWordSwapLookup,
};

fn augmenter(count: usize) -> ZiAugmenter {
    let table = ZiLookupTable::from_entries(
        "synonyms",
        [("quick", vec!["fast", "rapid"]), ("fox", vec!["dog"])],
    );
    ZiAugmenter::new(
        ZiWordSwapLookup::synonym(Arc::new(table)),
        ZiAugmenterConfig::default().with_transformations_per_example(count),
    )
    .unwrap()
}

#[test]
fn test_augment_many_keeps_input_order() {
    let outputs = augmenter(2)
        .augment_many(&["a quick one", "nothing", "the fox"])
        .unwrap();
    assert_eq!(
        outputs,
        vec![
            vec!["a fast one".to_string(), "a rapid one".to_string()],
            Vec::new(),
            vec!["the dog".to_string()],
        ]
    );
}

#[test]
fn test_augment_many_matches_single_calls() {
    let augmenter = augmenter(3);
    let texts = vec!["quick fox".to_string(), "fox quick".to_string()];
    let batched = augmenter.augment_many(&texts).unwrap();
    for (text, outputs) in texts.iter().zip(&batched) {
        assert_eq!(&augmenter.augment(text).unwrap(), outputs);
    }
}

#[test]
fn test_augment_text_with_ids() {
    let augmenter = augmenter(1);
    let (texts, ids) = augmenter
        .augment_text_with_ids(&["quick", "slow"], &[10, 20], false)
        .unwrap();
    assert_eq!(texts, vec!["quick", "fast", "slow"]);
    assert_eq!(ids, vec![10, 10, 20]);

    let (texts, ids) = augmenter
        .augment_text_with_ids(&["quick", "slow"], &["a", "b"], true)
        .unwrap();
    assert_eq!(texts, vec!["fast"]);
    assert_eq!(ids, vec!["a"]);

    let err = augmenter
        .augment_text_with_ids(&["quick"], &[1, 2], false)
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_csv_job_copies_other_columns() {
    let input = "id,text,label\n1,the quick fox,pos\n2,,neg\n3,plain words,neg\n";
    let mut output = Vec::new();
    let written = ZiCsvAugmentJob::new("text")
        .run(&augmenter(2), input.as_bytes(), &mut output)
        .unwrap();
    assert_eq!(written, 5);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "id,text,label\n1,the quick fox,pos\n1,the fast fox,pos\n1,the rapid fox,pos\n2,,neg\n3,plain words,neg\n"
    );
}

#[test]
fn test_csv_job_excludes_originals_and_checks_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "sentence\nquick fox\n").unwrap();

    let job = ZiCsvAugmentJob::new("sentence").with_exclude_original(true);
    assert_eq!(job.run_paths(&augmenter(5), &input, &output).unwrap(), 3);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "sentence\nfast fox\nrapid fox\nquick dog\n"
    );

    let err = ZiCsvAugmentJob::new("missing")
        .run_paths(&augmenter(1), &input, &output)
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_metrics_over_reports() {
    let reports = augmenter(2)
        .report_many(&["the quick fox", "nothing here"])
        .unwrap();
    let metrics = ZiAugmentationMetrics::compute(&reports);
    assert_eq!(metrics.total_inputs, 2);
    assert_eq!(metrics.skipped_inputs, 1);
    assert_eq!(metrics.total_augmentations, 2);
    assert_eq!(metrics.max_words_perturbed, 1);
    assert!(metrics.average_edit_distance > 0.0);
}
