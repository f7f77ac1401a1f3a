// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use chart_advisor::archetypes::builtin_archetypes;
use chart_advisor::field_classifier::field_names;
use chart_advisor::{
    advise_classified, build_catalog, AssignmentMode, CatalogFilter, ClassifierConfig, Datum,
    FieldAssignment, FieldClassifier, PostProcessor, RecommendationMerger,
};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

const HINT_VOCABULARY: [&str; 5] = [
    "multi-line",
    "multi-measure-column",
    "multi-measure-line",
    "pie_chart",
    "Multi-Line",
];

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (0i64..6).prop_map(Value::from),
        (-1000.0f64..1000.0).prop_map(Value::from),
        "[a-d]{1,2}".prop_map(Value::String),
        (1u32..29).prop_map(|d| Value::String(format!("2024-02-{d:02}"))),
    ]
}

/// Rows over a small column vocabulary. Each column has a dominant kind so that
/// every measurement level shows up, with occasional noise and missing cells.
fn dataset() -> impl Strategy<Value = Vec<Datum>> {
    let row = (
        1u32..29,
        0i64..4,
        -500.0f64..500.0,
        "[a-c]",
        proptest::option::of(cell()),
        any::<bool>(),
    );
    prop::collection::vec(row, 0..16).prop_map(|rows| {
        rows.into_iter()
            .map(|(day, level, amount, label, noise, sparse)| {
                let mut datum = Datum::new();
                datum.insert("day".to_string(), Value::String(format!("2024-01-{day:02}")));
                datum.insert("level".to_string(), Value::from(level));
                datum.insert("amount".to_string(), Value::from(amount));
                if !sparse {
                    datum.insert("label".to_string(), Value::String(label));
                }
                if let Some(noise) = noise {
                    datum.insert("noise".to_string(), noise);
                }
                datum
            })
            .collect()
    })
}

fn hints() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(HINT_VOCABULARY.to_vec()), 0..4)
        .prop_map(|h| h.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn classification_is_total(data in dataset()) {
        let fields = FieldClassifier::new().classify(&data);
        let names: HashSet<_> = fields.iter().map(|f| f.name.clone()).collect();
        prop_assert_eq!(fields.len(), names.len());
        prop_assert_eq!(names.len(), field_names(&data).len());
        for f in &fields {
            prop_assert_eq!(f.null_count + f.non_null_count, data.len());
            prop_assert_eq!(f.is_classified(), f.non_null_count > 0);
        }
    }

    #[test]
    fn assignment_never_overlaps(data in dataset()) {
        let fields = FieldClassifier::new().classify(&data);
        for archetype in builtin_archetypes() {
            for mode in [AssignmentMode::Strict, AssignmentMode::BestEffort] {
                if let Some(assignment) = FieldAssignment::assign(&archetype.preconditions, &fields, mode) {
                    let names = assignment.assigned_names();
                    let unique: HashSet<_> = names.iter().collect();
                    prop_assert_eq!(unique.len(), names.len());
                    for (slot, precondition) in assignment.slots.iter().zip(&archetype.preconditions) {
                        prop_assert!(slot.len() <= precondition.max_count.unwrap_or(usize::MAX));
                        if mode == AssignmentMode::Strict {
                            prop_assert!(slot.len() >= precondition.min_count);
                        }
                        prop_assert!(slot.iter().all(|f| precondition.accepts(f)));
                    }
                }
            }
        }
    }

    #[test]
    fn candidates_are_renderable(data in dataset()) {
        let fields = FieldClassifier::new().classify(&data);
        let catalog = build_catalog(builtin_archetypes(), Vec::new(), &CatalogFilter::default()).unwrap();
        for candidate in advise_classified(&data, &fields, &catalog) {
            let rows = candidate.specification.data.as_ref().unwrap();
            prop_assert!(!rows.is_empty());
            prop_assert!(candidate.specification.dangling_references().is_empty());
        }
    }

    #[test]
    fn merge_is_idempotent(data in dataset(), hint in hints()) {
        let fields = FieldClassifier::new().classify(&data);
        let catalog = build_catalog(builtin_archetypes(), Vec::new(), &CatalogFilter::default()).unwrap();
        let candidates = advise_classified(&data, &fields, &catalog);
        let merger = RecommendationMerger::new(&data, &fields, &catalog);
        let once = merger.merge(&candidates, &hint);
        let twice = merger.merge(&once, &hint);
        prop_assert_eq!(&once, &twice);

        let ids: HashSet<_> = once.iter().map(|c| c.chart_type.as_str()).collect();
        prop_assert_eq!(ids.len(), once.len());
        prop_assert!(once.iter().all(|c| catalog.contains(&c.chart_type)));
    }

    #[test]
    fn post_processing_is_idempotent(data in dataset(), hint in hints()) {
        let fields = FieldClassifier::new().classify(&data);
        let catalog = build_catalog(builtin_archetypes(), Vec::new(), &CatalogFilter::default()).unwrap();
        let candidates = advise_classified(&data, &fields, &catalog);
        let merged = RecommendationMerger::new(&data, &fields, &catalog).merge(&candidates, &hint);
        let config = ClassifierConfig::default();
        let processor = PostProcessor::new(&fields, &config);
        for candidate in merged {
            let once = processor.process(candidate.specification, &candidate.chart_type);
            let twice = processor.process(once.clone(), &candidate.chart_type);
            prop_assert_eq!(once, twice);
        }
    }
}
