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

use crate::catalog::{ChartArchetype, DataPrecondition, FieldAssignment};
use crate::field_classifier::{Datum, MeasurementLevel};
use crate::specification::{Encode, Encoding, MarkKind, Specification};

pub const ID: &str = "multi-measure-column";

pub fn archetype() -> ChartArchetype {
    ChartArchetype::new(
        ID,
        vec![
            DataPrecondition::at_least(1, &[MeasurementLevel::Interval]),
            DataPrecondition::exactly_one(&[MeasurementLevel::Nominal]),
        ],
        synthesize,
    )
    .with_description("Grouped bars, one bar series per measure, across categories")
}
pub fn synthesize(data: &[Datum], assignment: &FieldAssignment<'_>) -> Option<Specification> {
    if data.is_empty() {
        return None;
    }
    let measures = assignment.slot(0);
    let category = assignment.first(1)?;
    if measures.is_empty() {
        return None;
    }
    let children = measures
        .iter()
        .map(|measure| {
            let encode = Encode::xy(
                Encoding::field(&category.name),
                Encoding::field(&measure.name),
            )
            .with_color(Encoding::key(&measure.name))
            .with_series(Encoding::key(&measure.name));
            Specification::mark(MarkKind::Interval, encode)
        })
        .collect();
    Some(Specification::view(data.to_vec(), children))
}
