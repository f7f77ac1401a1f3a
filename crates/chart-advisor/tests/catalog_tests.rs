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

mod common;

use chart_advisor::archetypes::{builtin_archetypes, multi_line, multi_measure_column};
use chart_advisor::{
    build_catalog, build_catalog_from_config, Advisor, ArchetypeDecl, AssignmentMode,
    CatalogConfig, CatalogError, CatalogFilter, ChartArchetype, DataPrecondition,
    FieldAssignment, FieldClassifier, MeasurementLevel, PreconditionDecl,
};
use common::rows;
use serde_json::json;

fn never(id: &str) -> ChartArchetype {
    ChartArchetype::new(
        id,
        vec![DataPrecondition::at_least(1, &[MeasurementLevel::Interval])],
        |_, _| None,
    )
}

#[test]
fn test_builtin_catalog_order() {
    let catalog = build_catalog(builtin_archetypes(), Vec::new(), &CatalogFilter::default()).unwrap();
    assert_eq!(
        catalog.ids(),
        vec!["multi-line", "multi-measure-column", "multi-measure-line"]
    );
}

#[test]
fn test_custom_archetype_replaces_base_in_place() {
    let catalog = build_catalog(
        builtin_archetypes(),
        vec![never(multi_line::ID), never("scatter")],
        &CatalogFilter::default(),
    )
    .unwrap();
    assert_eq!(
        catalog.ids(),
        vec!["multi-line", "multi-measure-column", "multi-measure-line", "scatter"]
    );

    let data = rows(json!([
        {"date": "2024-01-01", "revenue": 100, "cost": 50},
        {"date": "2024-01-02", "revenue": 120, "cost": 65}
    ]));
    let candidates = Advisor::new().advise(&data, &catalog);
    assert!(candidates.iter().all(|c| c.chart_type != multi_line::ID));
}

#[test]
fn test_later_custom_archetype_wins() {
    let first = never("custom");
    let second = multi_measure_column::archetype().derive("custom", multi_measure_column::archetype().preconditions);
    let catalog = build_catalog(Vec::new(), vec![first, second], &CatalogFilter::default()).unwrap();

    let data = rows(json!([{"month": "Jan", "sales": 10}, {"month": "Feb", "sales": 20}]));
    let candidates = Advisor::new().advise(&data, &catalog);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].chart_type, "custom");
}

#[test]
fn test_empty_include_is_no_restriction() {
    let filter = CatalogFilter {
        include: Vec::new(),
        exclude: vec!["multi-measure-column".to_string()],
    };
    let catalog = build_catalog(builtin_archetypes(), Vec::new(), &filter).unwrap();
    assert_eq!(catalog.ids(), vec!["multi-line", "multi-measure-line"]);
}

#[test]
fn test_exclude_runs_before_include() {
    let filter = CatalogFilter {
        include: vec!["multi-line".to_string(), "multi-measure-line".to_string()],
        exclude: vec!["multi-line".to_string()],
    };
    let catalog = build_catalog(builtin_archetypes(), Vec::new(), &filter).unwrap();
    assert_eq!(catalog.ids(), vec!["multi-measure-line"]);

    let only = build_catalog(
        builtin_archetypes(),
        Vec::new(),
        &CatalogFilter::include(&["multi-measure-column", "not-registered"]),
    )
    .unwrap();
    assert_eq!(only.ids(), vec!["multi-measure-column"]);
}

#[test]
fn test_invalid_archetypes_rejected_at_build_time() {
    let empty_id = never(" ");
    assert_eq!(
        build_catalog(Vec::new(), vec![empty_id], &CatalogFilter::default()).unwrap_err(),
        CatalogError::EmptyArchetypeId
    );

    let no_preconditions = ChartArchetype::new("bare", Vec::new(), |_, _| None);
    assert!(matches!(
        build_catalog(Vec::new(), vec![no_preconditions], &CatalogFilter::default()),
        Err(CatalogError::EmptyPreconditions { .. })
    ));

    let no_levels = ChartArchetype::new("levels", vec![DataPrecondition::at_least(1, &[])], |_, _| None);
    assert!(matches!(
        build_catalog(Vec::new(), vec![no_levels], &CatalogFilter::default()),
        Err(CatalogError::EmptyAllowedLevels { index: 0, .. })
    ));

    let inverted = ChartArchetype::new(
        "inverted",
        vec![
            DataPrecondition::exactly_one(&[MeasurementLevel::Nominal]),
            DataPrecondition::new(3, Some(2), &[MeasurementLevel::Interval]),
        ],
        |_, _| None,
    );
    assert_eq!(
        build_catalog(Vec::new(), vec![inverted], &CatalogFilter::default()).unwrap_err(),
        CatalogError::InvalidCardinality {
            archetype: "inverted".to_string(),
            index: 1,
            min: 3,
            max: 2,
        }
    );

    let zero_max = ChartArchetype::new(
        "zero",
        vec![DataPrecondition::new(0, Some(0), &[MeasurementLevel::Nominal])],
        |_, _| None,
    );
    assert!(build_catalog(Vec::new(), vec![zero_max], &CatalogFilter::default()).is_err());
}

fn decl(id: &str, synthesizer: &str, levels: &[&[&str]]) -> ArchetypeDecl {
    ArchetypeDecl {
        id: id.to_string(),
        synthesizer: synthesizer.to_string(),
        description: Some("declared".to_string()),
        preconditions: levels
            .iter()
            .map(|names| PreconditionDecl {
                min_count: 1,
                max_count: None,
                levels: names.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
    }
}

#[test]
fn test_declared_archetype_reuses_builtin_synthesis() {
    let config = CatalogConfig {
        include: Vec::new(),
        exclude: vec!["multi-measure-column".to_string()],
        custom_archetypes: vec![decl(
            "category-bars",
            "multi-measure-column",
            &[&["interval"], &["nominal"]],
        )],
    };
    let catalog = build_catalog_from_config(builtin_archetypes(), Vec::new(), &config).unwrap();
    assert_eq!(
        catalog.ids(),
        vec!["multi-line", "multi-measure-line", "category-bars"]
    );
    assert_eq!(catalog.get("category-bars").unwrap().description, "declared");

    let data = rows(json!([{"month": "Jan", "sales": 10}, {"month": "Feb", "sales": 20}]));
    let candidates = Advisor::new().advise(&data, &catalog);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].chart_type, "category-bars");
    assert_eq!(candidates[0].specification.children.len(), 1);
}

#[test]
fn test_declared_archetype_with_unknown_level_fails() {
    let config = CatalogConfig {
        custom_archetypes: vec![decl("odd", "multi-line", &[&["continuous"]])],
        ..CatalogConfig::default()
    };
    let err = build_catalog_from_config(builtin_archetypes(), Vec::new(), &config).unwrap_err();
    assert_eq!(
        err,
        CatalogError::UnknownMeasurementLevel {
            archetype: "odd".to_string(),
            level: "continuous".to_string(),
        }
    );
}

#[test]
fn test_declared_archetype_with_unknown_synthesizer_fails() {
    let config = CatalogConfig {
        custom_archetypes: vec![decl("pie", "pie_chart", &[&["nominal"], &["interval"]])],
        ..CatalogConfig::default()
    };
    assert!(matches!(
        build_catalog_from_config(builtin_archetypes(), Vec::new(), &config),
        Err(CatalogError::UnknownSynthesizer { .. })
    ));
}

#[test]
fn test_assignment_consumes_all_fields_for_unbounded_precondition() {
    let data = rows(json!([
        {"a": 1.5, "label": "x", "b": 10, "c": 7},
        {"a": 2.5, "label": "y", "b": 20, "c": 8}
    ]));
    let fields = FieldClassifier::new().classify(&data);
    let preconditions = vec![
        DataPrecondition::at_least(1, &[MeasurementLevel::Interval]),
        DataPrecondition::exactly_one(&[MeasurementLevel::Nominal]),
    ];
    let assignment = FieldAssignment::assign(&preconditions, &fields, AssignmentMode::Strict).unwrap();
    let measures: Vec<_> = assignment.slot(0).iter().map(|f| f.name.as_str()).collect();

    assert_eq!(measures, vec!["a", "b", "c"]);
    assert_eq!(assignment.first(1).unwrap().name, "label");
}

#[test]
fn test_assignment_never_reuses_a_field() {
    let data = rows(json!([{"only": 1}, {"only": 2}]));
    let fields = FieldClassifier::new().classify(&data);
    let preconditions = vec![
        DataPrecondition::exactly_one(&[MeasurementLevel::Interval]),
        DataPrecondition::exactly_one(&[MeasurementLevel::Interval]),
    ];
    assert!(FieldAssignment::assign(&preconditions, &fields, AssignmentMode::Strict).is_none());

    let partial = FieldAssignment::assign(&preconditions, &fields, AssignmentMode::BestEffort).unwrap();
    assert_eq!(partial.slot(0).len(), 1);
    assert!(partial.slot(1).is_empty());
}

#[test]
fn test_assignment_prefers_earlier_levels() {
    let data = rows(json!([
        {"rank": 1, "team": "red", "v": 3.5},
        {"rank": 1, "team": "blue", "v": 4.5},
        {"rank": 2, "team": "red", "v": 5.5},
        {"rank": 2, "team": "blue", "v": 6.5}
    ]));
    let fields = FieldClassifier::new().classify(&data);
    let nominal_first = vec![DataPrecondition::exactly_one(&[
        MeasurementLevel::Nominal,
        MeasurementLevel::Ordinal,
    ])];
    let assignment = FieldAssignment::assign(&nominal_first, &fields, AssignmentMode::Strict).unwrap();
    assert_eq!(assignment.first(0).unwrap().name, "team");

    let ordinal_first = vec![DataPrecondition::exactly_one(&[
        MeasurementLevel::Ordinal,
        MeasurementLevel::Nominal,
    ])];
    let assignment = FieldAssignment::assign(&ordinal_first, &fields, AssignmentMode::Strict).unwrap();
    assert_eq!(assignment.first(0).unwrap().name, "rank");
}
