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

#![allow(dead_code)]

use chart_advisor::{Datum, FieldDescriptor};
use serde_json::Value;

pub fn rows(value: Value) -> Vec<Datum> {
    serde_json::from_value(value).unwrap()
}

pub fn field<'a>(fields: &'a [FieldDescriptor], name: &str) -> &'a FieldDescriptor {
    fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("field '{name}' was not classified"))
}

pub fn column<'a>(rows: &'a [Datum], name: &str) -> Vec<&'a Value> {
    rows.iter().map(|row| &row[name]).collect()
}
