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

//! Built-in chart archetypes.

pub mod multi_line;
pub mod multi_measure_column;
pub mod multi_measure_line;

use crate::catalog::ChartArchetype;
use crate::field_classifier::FieldDescriptor;
use crate::specification::Encoding;

pub fn builtin_archetypes() -> Vec<ChartArchetype> {
    vec![
        multi_line::archetype(),
        multi_measure_column::archetype(),
        multi_measure_line::archetype(),
    ]
}
pub fn is_line_family(chart_type: &str) -> bool {
    chart_type.ends_with("line")
}
pub(crate) fn axis_encoding(field: &FieldDescriptor) -> Encoding {
    if field.projects_as_date() {
        Encoding::parse_date(&field.name, &field.temporal_formats)
    } else {
        Encoding::field(&field.name)
    }
}
