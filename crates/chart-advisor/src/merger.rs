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

use crate::advisor::{evaluate, Candidate};
use crate::catalog::{AssignmentMode, Catalog};
use crate::field_classifier::{Datum, FieldDescriptor};
use crate::specification::Specification;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub struct RecommendationMerger<'a> {
    data: &'a [Datum],
    fields: &'a [FieldDescriptor],
    catalog: &'a Catalog,
}
impl<'a> RecommendationMerger<'a> {
    pub fn new(data: &'a [Datum], fields: &'a [FieldDescriptor], catalog: &'a Catalog) -> Self {
        Self {
            data,
            fields,
            catalog,
        }
    }
    /// Hinted types first, in hint order, then the remaining candidates in their
    /// own order. Ids are unique and compared case-sensitively. A hinted type the
    /// candidates lack is synthesized from a best-effort assignment; hints that
    /// are unknown to the catalog or cannot be synthesized are dropped.
    pub fn merge<S: AsRef<str>>(&self, candidates: &[Candidate], external_hint: &[S]) -> Vec<Candidate> {
        let mut merged: Vec<(String, Specification)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for hint in external_hint.iter().map(AsRef::as_ref) {
            if seen.contains(hint) {
                continue;
            }
            if let Some(candidate) = candidates.iter().find(|c| c.chart_type == hint) {
                seen.insert(hint.to_string());
                merged.push((hint.to_string(), candidate.specification.clone()));
                continue;
            }
            let Some(archetype) = self.catalog.get(hint) else {
                tracing::debug!(chart_type = hint, "dropping hint for unknown chart type");
                continue;
            };
            match evaluate(archetype, self.data, self.fields, AssignmentMode::BestEffort) {
                Some(spec) => {
                    seen.insert(hint.to_string());
                    merged.push((hint.to_string(), spec));
                }
                None => {
                    tracing::debug!(chart_type = hint, "dropping hint that cannot be synthesized");
                }
            }
        }
        for candidate in candidates {
            if seen.insert(candidate.chart_type.clone()) {
                merged.push((candidate.chart_type.clone(), candidate.specification.clone()));
            }
        }
        merged
            .into_iter()
            .enumerate()
            .map(|(rank, (chart_type, specification))| Candidate {
                chart_type,
                rank,
                specification,
            })
            .collect()
    }
}
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub candidates: Vec<Candidate>,
    pub selected: Option<usize>,
}
impl RecommendationResult {
    pub fn new(candidates: Vec<Candidate>, previous: Option<&str>) -> Self {
        let selected = previous
            .and_then(|p| candidates.iter().position(|c| c.chart_type == p))
            .or(if candidates.is_empty() { None } else { Some(0) });
        Self {
            candidates,
            selected,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.and_then(|i| self.candidates.get(i))
    }
    pub fn selected_chart_type(&self) -> Option<&str> {
        self.selected().map(|c| c.chart_type.as_str())
    }
    pub fn get(&self, chart_type: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.chart_type == chart_type)
    }
    pub fn chart_types(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.chart_type.as_str()).collect()
    }
    pub fn select(&mut self, chart_type: &str) -> Option<&Candidate> {
        let index = self.candidates.iter().position(|c| c.chart_type == chart_type)?;
        self.selected = Some(index);
        self.candidates.get(index)
    }
}
