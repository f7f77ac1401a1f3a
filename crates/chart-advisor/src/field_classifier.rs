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

use crate::config::ClassifierConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

pub type Datum = IndexMap<String, Value>;

pub const DISTINCT_RATIO_THRESHOLD: f64 = 0.5;
pub const MAX_ORDINAL_CARDINALITY: usize = 20;
pub const DATE_CONFIDENCE_THRESHOLD: f64 = 0.9;
pub const DEFAULT_TEMPORAL_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementLevel {
    Nominal,
    Ordinal,
    Interval,
    Time,
}
impl MeasurementLevel {
    pub const ALL: [MeasurementLevel; 4] = [
        MeasurementLevel::Nominal,
        MeasurementLevel::Ordinal,
        MeasurementLevel::Interval,
        MeasurementLevel::Time,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementLevel::Nominal => "nominal",
            MeasurementLevel::Ordinal => "ordinal",
            MeasurementLevel::Interval => "interval",
            MeasurementLevel::Time => "time",
        }
    }
    pub fn is_ordered_axis(&self) -> bool {
        matches!(self, MeasurementLevel::Ordinal | MeasurementLevel::Time)
    }
}
impl fmt::Display for MeasurementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for MeasurementLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        MeasurementLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == lowered)
            .ok_or_else(|| s.to_string())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRecommendation {
    Date,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Empty,
    Temporal,
    Numeric,
    Text,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub levels: BTreeSet<MeasurementLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<FieldRecommendation>,
    pub value_kind: ValueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temporal_formats: Vec<String>,
    pub distinct_count: usize,
    pub non_null_count: usize,
    pub null_count: usize,
}
impl FieldDescriptor {
    pub fn has_level(&self, level: MeasurementLevel) -> bool {
        self.levels.contains(&level)
    }
    pub fn has_any_level(&self, levels: &[MeasurementLevel]) -> bool {
        levels.iter().any(|level| self.levels.contains(level))
    }
    pub fn is_classified(&self) -> bool {
        !self.levels.is_empty()
    }
    pub fn is_date_like(&self) -> bool {
        self.recommendation == Some(FieldRecommendation::Date)
    }
    /// Only values that were detected as dates are projected; a time hint on
    /// other values keeps them raw.
    pub fn projects_as_date(&self) -> bool {
        self.value_kind == ValueKind::Temporal
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldHint {
    pub name: String,
    #[serde(default)]
    pub measurement_level: Option<MeasurementLevel>,
}
impl FieldHint {
    pub fn new(name: impl Into<String>, level: MeasurementLevel) -> Self {
        Self {
            name: name.into(),
            measurement_level: Some(level),
        }
    }
}
#[derive(Debug, Clone, Default)]
pub struct FieldClassifier {
    config: ClassifierConfig,
}
impl FieldClassifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
    pub fn classify(&self, data: &[Datum]) -> Vec<FieldDescriptor> {
        self.classify_with_hints(data, &[])
    }
    pub fn classify_with_hints(&self, data: &[Datum], hints: &[FieldHint]) -> Vec<FieldDescriptor> {
        field_names(data)
            .iter()
            .map(|name| {
                let hint = hints.iter().find(|h| &h.name == name);
                self.classify_field(name, data, hint)
            })
            .collect()
    }
    fn classify_field(&self, name: &str, data: &[Datum], hint: Option<&FieldHint>) -> FieldDescriptor {
        let non_null: Vec<&Value> = data
            .iter()
            .filter_map(|row| row.get(name))
            .filter(|v| !v.is_null())
            .collect();
        let null_count = data.len() - non_null.len();
        let mut descriptor = FieldDescriptor {
            name: name.to_string(),
            levels: BTreeSet::new(),
            recommendation: None,
            value_kind: ValueKind::Empty,
            temporal_formats: Vec::new(),
            distinct_count: 0,
            non_null_count: non_null.len(),
            null_count,
        };
        if non_null.is_empty() {
            tracing::trace!(field = name, "field has no values, left unclassified");
            return descriptor;
        }
        descriptor.distinct_count = non_null
            .iter()
            .map(|v| value_key(*v))
            .collect::<HashSet<_>>()
            .len();
        let formats = self.config.temporal_formats.as_slice();
        let matched: Vec<Option<usize>> = non_null
            .iter()
            .filter_map(|v| v.as_str().and_then(|s| parse_temporal_match(s, formats)))
            .map(|(_, format)| format)
            .collect();
        if matched.len() as f64 / non_null.len() as f64 >= self.config.date_confidence_threshold {
            descriptor.value_kind = ValueKind::Temporal;
            descriptor.temporal_formats = matched
                .iter()
                .flatten()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|i| formats[i].clone())
                .collect();
            descriptor.levels.insert(MeasurementLevel::Time);
            descriptor.recommendation = Some(FieldRecommendation::Date);
        } else if non_null.iter().all(|v| as_number(v).is_some()) {
            descriptor.value_kind = ValueKind::Numeric;
            descriptor.levels.insert(MeasurementLevel::Interval);
            if self
                .config
                .is_low_cardinality(descriptor.distinct_count, descriptor.non_null_count)
            {
                descriptor.levels.insert(MeasurementLevel::Ordinal);
            }
        } else {
            descriptor.value_kind = ValueKind::Text;
            descriptor.levels.insert(MeasurementLevel::Nominal);
        }
        if let Some(level) = hint.and_then(|h| h.measurement_level) {
            descriptor.levels.insert(level);
            if level == MeasurementLevel::Time {
                descriptor.recommendation = Some(FieldRecommendation::Date);
            }
        }
        tracing::trace!(
            field = name,
            levels = ?descriptor.levels,
            distinct = descriptor.distinct_count,
            "classified field"
        );
        descriptor
    }
}
pub fn field_names(data: &[Datum]) -> IndexSet<String> {
    data.iter().flat_map(|row| row.keys().cloned()).collect()
}
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
pub fn parse_temporal<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDateTime> {
    parse_temporal_match(value, formats).map(|(dt, _)| dt)
}
/// Parsed value plus the index of the first format that accepted it; `None`
/// for RFC 3339.
pub fn parse_temporal_match<S: AsRef<str>>(
    value: &str,
    formats: &[S],
) -> Option<(NaiveDateTime, Option<usize>)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some((dt.naive_utc(), None));
    }
    formats.iter().enumerate().find_map(|(i, format)| {
        let format = format.as_ref();
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(|dt| (dt, Some(i)))
    })
}
pub fn parse_temporal_value<S: AsRef<str>>(value: &Value, formats: &[S]) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_temporal(s, formats),
        _ => None,
    }
}
pub(crate) fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
