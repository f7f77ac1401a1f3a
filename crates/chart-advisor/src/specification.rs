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

use crate::field_classifier::{parse_temporal, Datum};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    View,
    Line,
    Interval,
    Point,
}
impl MarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkKind::View => "view",
            MarkKind::Line => "line",
            MarkKind::Interval => "interval",
            MarkKind::Point => "point",
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Encoding {
    Field(String),
    Key(String),
    Project(Projection),
}
impl Encoding {
    pub fn field(name: impl Into<String>) -> Self {
        Encoding::Field(name.into())
    }
    pub fn key(name: impl Into<String>) -> Self {
        Encoding::Key(name.into())
    }
    pub fn parse_date<S: AsRef<str>>(field: impl Into<String>, formats: &[S]) -> Self {
        Encoding::Project(Projection::ParseDate {
            field: field.into(),
            formats: formats.iter().map(|f| f.as_ref().to_string()).collect(),
        })
    }
    pub fn referenced_field(&self) -> &str {
        match self {
            Encoding::Field(name) | Encoding::Key(name) => name,
            Encoding::Project(projection) => projection.field(),
        }
    }
    pub fn resolve(&self, row: &Datum) -> Value {
        match self {
            Encoding::Field(name) => row.get(name).cloned().unwrap_or(Value::Null),
            Encoding::Key(name) => Value::String(name.clone()),
            Encoding::Project(projection) => projection.apply(row),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fn", rename_all = "camelCase")]
pub enum Projection {
    /// Parses the field as a date and yields epoch milliseconds, or null.
    /// RFC 3339 is always accepted; `formats` are tried after it, in order.
    ParseDate {
        field: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        formats: Vec<String>,
    },
}
impl Projection {
    pub fn field(&self) -> &str {
        match self {
            Projection::ParseDate { field, .. } => field,
        }
    }
    pub fn apply(&self, row: &Datum) -> Value {
        match self {
            Projection::ParseDate { field, formats } => row
                .get(field)
                .and_then(Value::as_str)
                .and_then(|s| parse_temporal(s, formats))
                .map(|dt| Value::from(dt.and_utc().timestamp_millis()))
                .unwrap_or(Value::Null),
        }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Encoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Encoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Encoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Encoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Encoding>,
}
impl Encode {
    pub fn xy(x: Encoding, y: Encoding) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
    pub fn with_color(mut self, color: Encoding) -> Self {
        self.color = Some(color);
        self
    }
    pub fn with_size(mut self, size: Encoding) -> Self {
        self.size = Some(size);
        self
    }
    pub fn with_series(mut self, series: Encoding) -> Self {
        self.series = Some(series);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.channels().next().is_none()
    }
    pub fn channels(&self) -> impl Iterator<Item = (&'static str, &Encoding)> {
        [
            ("x", &self.x),
            ("y", &self.y),
            ("color", &self.color),
            ("size", &self.size),
            ("series", &self.series),
        ]
        .into_iter()
        .filter_map(|(channel, encoding)| encoding.as_ref().map(|e| (channel, e)))
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Datum>>,
    #[serde(default, skip_serializing_if = "Encode::is_empty")]
    pub encode: Encode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Specification>,
}
impl Specification {
    pub fn view(data: Vec<Datum>, children: Vec<Specification>) -> Self {
        Self {
            kind: MarkKind::View,
            data: Some(data),
            encode: Encode::default(),
            children,
        }
    }
    pub fn mark(kind: MarkKind, encode: Encode) -> Self {
        Self {
            kind,
            data: None,
            encode,
            children: Vec::new(),
        }
    }
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
    pub fn leaves(&self) -> Vec<&Specification> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
    pub fn leaves_mut(&mut self) -> Vec<&mut Specification> {
        if self.children.is_empty() {
            return vec![self];
        }
        self.children
            .iter_mut()
            .flat_map(|c| c.leaves_mut())
            .collect()
    }
    pub fn x_encoding(&self) -> Option<&Encoding> {
        self.leaves().into_iter().find_map(|leaf| leaf.encode.x.as_ref())
    }
    pub fn data_mut(&mut self) -> Option<&mut Vec<Datum>> {
        if self.data.is_some() {
            return self.data.as_mut();
        }
        self.children.iter_mut().find_map(|c| c.data_mut())
    }
    /// Encode references that do not resolve against the rows visible at their node.
    /// Empty for a renderable specification.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut dangling = Vec::new();
        self.collect_dangling(None, &mut dangling);
        dangling
    }
    fn collect_dangling(&self, inherited: Option<&[Datum]>, out: &mut Vec<String>) {
        let visible = self.data.as_deref().or(inherited);
        let keys: HashSet<&str> = visible
            .unwrap_or_default()
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        for (channel, encoding) in self.encode.channels() {
            let field = encoding.referenced_field();
            if !keys.contains(field) {
                out.push(format!("{}.{}={}", self.kind.as_str(), channel, field));
            }
        }
        for child in &self.children {
            child.collect_dangling(visible, out);
        }
    }
}
