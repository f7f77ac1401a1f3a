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

use super::axis_encoding;
use crate::catalog::{ChartArchetype, DataPrecondition, FieldAssignment};
use crate::field_classifier::{field_names, value_key, Datum, FieldDescriptor, MeasurementLevel};
use crate::specification::{Encode, Encoding, MarkKind, Specification};
use serde_json::Value;
use std::collections::HashMap;

pub const ID: &str = "multi-measure-line";
pub const EMPHASIS_FIELD: &str = "__emphasis";
pub const MAX_POINT_SIZE: f64 = 4.0;
pub const MIN_POINT_SIZE: f64 = 1.0;
pub const SPARSE_ROW_COUNT: usize = 50;

pub fn archetype() -> ChartArchetype {
    ChartArchetype::new(
        ID,
        vec![
            DataPrecondition::exactly_one(&[MeasurementLevel::Nominal, MeasurementLevel::Ordinal]),
            DataPrecondition::at_least(2, &[MeasurementLevel::Interval]),
        ],
        synthesize,
    )
    .with_description("Several measures as lines with emphasised points over categories")
}
pub fn synthesize(data: &[Datum], assignment: &FieldAssignment<'_>) -> Option<Specification> {
    if data.is_empty() {
        return None;
    }
    let anchor = assignment.first(0)?;
    let measures = assignment.slot(1);
    if measures.is_empty() {
        return None;
    }
    let emphasis = emphasis_field(data);
    let sizes = point_emphasis(data, anchor);
    let rows: Vec<Datum> = data
        .iter()
        .zip(sizes)
        .map(|(row, size)| {
            let mut row = row.clone();
            row.insert(emphasis.clone(), Value::from(size));
            row
        })
        .collect();
    let x_encoding = axis_encoding(anchor);
    let mut children = Vec::with_capacity(measures.len() * 2);
    for measure in measures {
        let encode = Encode::xy(x_encoding.clone(), Encoding::field(&measure.name))
            .with_color(Encoding::key(&measure.name));
        children.push(Specification::mark(MarkKind::Line, encode.clone()));
        children.push(Specification::mark(
            MarkKind::Point,
            encode.with_size(Encoding::field(&emphasis)),
        ));
    }
    Some(Specification::view(rows, children))
}
/// `EMPHASIS_FIELD`, suffixed with `_1`, `_2`, ... while it names an input field.
pub fn emphasis_field(data: &[Datum]) -> String {
    let existing = field_names(data);
    let mut name = EMPHASIS_FIELD.to_string();
    let mut suffix = 1;
    while existing.contains(&name) {
        name = format!("{EMPHASIS_FIELD}_{suffix}");
        suffix += 1;
    }
    name
}
/// Point size per row. Shrinks with overall row count beyond `SPARSE_ROW_COUNT`
/// and with the number of rows sharing the same anchor value.
pub fn point_emphasis(data: &[Datum], anchor: &FieldDescriptor) -> Vec<f64> {
    let row_count = data.len().max(SPARSE_ROW_COUNT) as f64;
    let base = MAX_POINT_SIZE * (SPARSE_ROW_COUNT as f64 / row_count).sqrt();
    let keys: Vec<String> = data
        .iter()
        .map(|row| row.get(&anchor.name).map_or_else(String::new, value_key))
        .collect();
    let mut crowding: HashMap<&str, usize> = HashMap::new();
    for key in &keys {
        *crowding.entry(key.as_str()).or_insert(0) += 1;
    }
    keys.iter()
        .map(|key| {
            let overlap = crowding.get(key.as_str()).copied().unwrap_or(1) as f64;
            let size = (base / overlap.sqrt()).clamp(MIN_POINT_SIZE, MAX_POINT_SIZE);
            (size * 100.0).round() / 100.0
        })
        .collect()
}
