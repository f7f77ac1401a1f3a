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
use crate::field_classifier::{Datum, MeasurementLevel};
use crate::specification::{Encode, Encoding, MarkKind, Specification};

pub const ID: &str = "multi-line";

pub fn archetype() -> ChartArchetype {
    ChartArchetype::new(
        ID,
        vec![
            DataPrecondition::exactly_one(&[MeasurementLevel::Time, MeasurementLevel::Ordinal]),
            DataPrecondition::at_least(1, &[MeasurementLevel::Interval]),
            DataPrecondition::optional_one(&[MeasurementLevel::Nominal]),
        ],
        synthesize,
    )
    .with_description("One line per measure along a temporal or ordered axis")
}
pub fn synthesize(data: &[Datum], assignment: &FieldAssignment<'_>) -> Option<Specification> {
    if data.is_empty() {
        return None;
    }
    let x = assignment.first(0)?;
    let measures = assignment.slot(1);
    if measures.is_empty() {
        return None;
    }
    let split = assignment.first(2);
    let x_encoding = axis_encoding(x);
    let children = measures
        .iter()
        .map(|measure| {
            let encode = Encode::xy(x_encoding.clone(), Encoding::field(&measure.name));
            let encode = match split {
                Some(split) => encode
                    .with_color(Encoding::field(&split.name))
                    .with_series(Encoding::field(&split.name)),
                None => encode.with_color(Encoding::key(&measure.name)),
            };
            Specification::mark(MarkKind::Line, encode)
        })
        .collect();
    Some(Specification::view(data.to_vec(), children))
}
