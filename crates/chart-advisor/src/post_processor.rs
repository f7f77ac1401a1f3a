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

use crate::archetypes::is_line_family;
use crate::config::ClassifierConfig;
use crate::field_classifier::{
    as_number, parse_temporal_value, value_key, Datum, FieldDescriptor, MeasurementLevel,
};
use crate::specification::{Encoding, MarkKind, Specification};
use serde_json::Value;
use std::cmp::Ordering;

static NULL: Value = Value::Null;

pub struct PostProcessor<'a> {
    fields: &'a [FieldDescriptor],
    temporal_formats: &'a [String],
}
impl<'a> PostProcessor<'a> {
    pub fn new(fields: &'a [FieldDescriptor], config: &'a ClassifierConfig) -> Self {
        Self {
            fields,
            temporal_formats: &config.temporal_formats,
        }
    }
    pub fn process(&self, mut spec: Specification, chart_type: &str) -> Specification {
        let draws_lines = spec.leaves().iter().any(|leaf| leaf.kind == MarkKind::Line);
        if !is_line_family(chart_type) && !draws_lines {
            return spec;
        }
        let Some(x_field) = spec.x_encoding().map(|e| e.referenced_field().to_string()) else {
            return spec;
        };
        let Some(descriptor) = self.fields.iter().find(|f| f.name == x_field) else {
            return spec;
        };
        let is_time = descriptor.has_level(MeasurementLevel::Time);
        if !is_time && !descriptor.has_level(MeasurementLevel::Ordinal) {
            return spec;
        }
        if descriptor.projects_as_date() {
            for leaf in spec.leaves_mut() {
                if leaf.encode.x == Some(Encoding::Field(x_field.clone())) {
                    leaf.encode.x = Some(Encoding::parse_date(&x_field, &descriptor.temporal_formats));
                }
            }
        }
        if let Some(rows) = spec.data_mut() {
            rows.sort_by(|a, b| self.compare_rows(a, b, &x_field, is_time));
        }
        spec
    }
    fn compare_rows(&self, a: &Datum, b: &Datum, field: &str, is_time: bool) -> Ordering {
        let a = a.get(field).unwrap_or(&NULL);
        let b = b.get(field).unwrap_or(&NULL);
        if is_time {
            let parsed = (
                parse_temporal_value(a, self.temporal_formats),
                parse_temporal_value(b, self.temporal_formats),
            );
            match parsed {
                (Some(x), Some(y)) => return x.cmp(&y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => {}
            }
        }
        compare_ordinal(a, b)
    }
}
fn compare_ordinal(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => value_key(a).cmp(&value_key(b)),
    }
}
