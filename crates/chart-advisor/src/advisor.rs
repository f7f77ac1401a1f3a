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

use crate::catalog::{AssignmentMode, Catalog, ChartArchetype, FieldAssignment};
use crate::field_classifier::{Datum, FieldClassifier, FieldDescriptor, FieldHint};
use crate::specification::Specification;
use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub chart_type: String,
    pub rank: usize,
    pub specification: Specification,
}
#[derive(Debug, Clone, Default)]
pub struct Advisor {
    classifier: FieldClassifier,
}
impl Advisor {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_classifier(classifier: FieldClassifier) -> Self {
        Self { classifier }
    }
    pub fn classifier(&self) -> &FieldClassifier {
        &self.classifier
    }
    pub fn advise(&self, data: &[Datum], catalog: &Catalog) -> Vec<Candidate> {
        self.advise_with_hints(data, &[], catalog)
    }
    pub fn advise_with_hints(
        &self,
        data: &[Datum],
        hints: &[FieldHint],
        catalog: &Catalog,
    ) -> Vec<Candidate> {
        let fields = self.classifier.classify_with_hints(data, hints);
        advise_classified(data, &fields, catalog)
    }
}
pub fn advise_classified(
    data: &[Datum],
    fields: &[FieldDescriptor],
    catalog: &Catalog,
) -> Vec<Candidate> {
    catalog
        .archetypes()
        .into_iter()
        .filter_map(|archetype| {
            evaluate(archetype, data, fields, AssignmentMode::Strict)
                .map(|spec| (archetype.id.clone(), spec))
        })
        .enumerate()
        .map(|(rank, (chart_type, specification))| Candidate {
            chart_type,
            rank,
            specification,
        })
        .collect()
}
pub(crate) fn evaluate(
    archetype: &ChartArchetype,
    data: &[Datum],
    fields: &[FieldDescriptor],
    mode: AssignmentMode,
) -> Option<Specification> {
    let Some(assignment) = FieldAssignment::assign(&archetype.preconditions, fields, mode) else {
        tracing::debug!(archetype = %archetype.id, "preconditions not satisfied");
        return None;
    };
    let spec = archetype.synthesize(data, &assignment);
    if spec.is_none() {
        tracing::debug!(
            archetype = %archetype.id,
            fields = ?assignment.assigned_names(),
            "synthesis declined"
        );
    }
    spec
}
