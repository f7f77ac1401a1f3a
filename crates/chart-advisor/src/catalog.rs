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

use crate::config::{ArchetypeDecl, CatalogConfig};
use crate::error::{CatalogError, CatalogResult};
use crate::field_classifier::{Datum, FieldDescriptor, MeasurementLevel};
use crate::specification::Specification;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Synthesis function shared by every archetype: given the rows and the fields
/// assigned to each precondition, build a specification or decline with `None`.
pub type Synthesizer =
    Arc<dyn Fn(&[Datum], &FieldAssignment<'_>) -> Option<Specification> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPrecondition {
    pub min_count: usize,
    pub max_count: Option<usize>,
    pub allowed_levels: Vec<MeasurementLevel>,
}
impl DataPrecondition {
    pub fn new(min_count: usize, max_count: Option<usize>, allowed_levels: &[MeasurementLevel]) -> Self {
        Self {
            min_count,
            max_count,
            allowed_levels: allowed_levels.to_vec(),
        }
    }
    pub fn exactly_one(allowed_levels: &[MeasurementLevel]) -> Self {
        Self::new(1, Some(1), allowed_levels)
    }
    pub fn optional_one(allowed_levels: &[MeasurementLevel]) -> Self {
        Self::new(0, Some(1), allowed_levels)
    }
    pub fn at_least(min_count: usize, allowed_levels: &[MeasurementLevel]) -> Self {
        Self::new(min_count, None, allowed_levels)
    }
    pub fn accepts(&self, field: &FieldDescriptor) -> bool {
        field.has_any_level(&self.allowed_levels)
    }
    fn preference_rank(&self, field: &FieldDescriptor) -> Option<usize> {
        self.allowed_levels
            .iter()
            .position(|level| field.has_level(*level))
    }
    fn validate(&self, archetype: &str, index: usize) -> CatalogResult<()> {
        if self.allowed_levels.is_empty() {
            return Err(CatalogError::EmptyAllowedLevels {
                archetype: archetype.to_string(),
                index,
            });
        }
        if let Some(max) = self.max_count {
            if max == 0 || self.min_count > max {
                return Err(CatalogError::InvalidCardinality {
                    archetype: archetype.to_string(),
                    index,
                    min: self.min_count,
                    max,
                });
            }
        }
        Ok(())
    }
}
#[derive(Debug, Clone)]
pub struct FieldAssignment<'a> {
    pub slots: Vec<Vec<&'a FieldDescriptor>>,
    pub fields: &'a [FieldDescriptor],
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    Strict,
    BestEffort,
}
impl<'a> FieldAssignment<'a> {
    /// Greedy, non-backtracking assignment. Preconditions are processed in order;
    /// each takes up to `max_count` unassigned, classified fields that carry an
    /// allowed level, preferring earlier allowed levels and then field order.
    pub fn assign(
        preconditions: &[DataPrecondition],
        fields: &'a [FieldDescriptor],
        mode: AssignmentMode,
    ) -> Option<Self> {
        let mut used = vec![false; fields.len()];
        let mut slots = Vec::with_capacity(preconditions.len());
        for (index, precondition) in preconditions.iter().enumerate() {
            let mut available: Vec<(usize, usize)> = fields
                .iter()
                .enumerate()
                .filter(|(i, field)| !used[*i] && field.is_classified())
                .filter_map(|(i, field)| precondition.preference_rank(field).map(|rank| (rank, i)))
                .collect();
            available.sort_by_key(|(rank, _)| *rank);
            if available.len() < precondition.min_count && mode == AssignmentMode::Strict {
                tracing::debug!(
                    precondition = index,
                    available = available.len(),
                    required = precondition.min_count,
                    "not enough matching fields"
                );
                return None;
            }
            let take = precondition.max_count.unwrap_or(usize::MAX);
            let mut slot = Vec::new();
            for (_, i) in available.into_iter().take(take) {
                used[i] = true;
                slot.push(&fields[i]);
            }
            slots.push(slot);
        }
        Some(Self { slots, fields })
    }
    pub fn slot(&self, index: usize) -> &[&'a FieldDescriptor] {
        self.slots.get(index).map_or(&[][..], |s| s.as_slice())
    }
    pub fn first(&self, index: usize) -> Option<&'a FieldDescriptor> {
        self.slot(index).first().copied()
    }
    pub fn assigned_names(&self) -> Vec<&'a str> {
        self.slots
            .iter()
            .flatten()
            .map(|f| f.name.as_str())
            .collect()
    }
}
#[derive(Clone)]
pub struct ChartArchetype {
    pub id: String,
    pub description: String,
    pub preconditions: Vec<DataPrecondition>,
    synthesizer: Synthesizer,
}
impl ChartArchetype {
    pub fn new<F>(id: impl Into<String>, preconditions: Vec<DataPrecondition>, synthesize: F) -> Self
    where
        F: Fn(&[Datum], &FieldAssignment<'_>) -> Option<Specification> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            description: String::new(),
            preconditions,
            synthesizer: Arc::new(synthesize),
        }
    }
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
    pub fn derive(&self, id: impl Into<String>, preconditions: Vec<DataPrecondition>) -> Self {
        Self {
            id: id.into(),
            description: self.description.clone(),
            preconditions,
            synthesizer: Arc::clone(&self.synthesizer),
        }
    }
    pub fn synthesize(&self, data: &[Datum], assignment: &FieldAssignment<'_>) -> Option<Specification> {
        (self.synthesizer)(data, assignment)
    }
    pub fn validate(&self) -> CatalogResult<()> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::EmptyArchetypeId);
        }
        if self.preconditions.is_empty() {
            return Err(CatalogError::EmptyPreconditions {
                archetype: self.id.clone(),
            });
        }
        for (index, precondition) in self.preconditions.iter().enumerate() {
            precondition.validate(&self.id, index)?;
        }
        Ok(())
    }
}
impl fmt::Debug for ChartArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartArchetype")
            .field("id", &self.id)
            .field("preconditions", &self.preconditions)
            .finish_non_exhaustive()
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}
impl CatalogFilter {
    pub fn include(ids: &[&str]) -> Self {
        Self {
            include: ids.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
    pub fn exclude(ids: &[&str]) -> Self {
        Self {
            include: Vec::new(),
            exclude: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    archetypes: IndexMap<String, ChartArchetype>,
}
impl Catalog {
    pub fn get(&self, id: &str) -> Option<&ChartArchetype> {
        self.archetypes.get(id)
    }
    pub fn contains(&self, id: &str) -> bool {
        self.archetypes.contains_key(id)
    }
    pub fn ids(&self) -> Vec<&str> {
        self.archetypes.keys().map(String::as_str).collect()
    }
    pub fn archetypes(&self) -> Vec<&ChartArchetype> {
        self.archetypes.values().collect()
    }
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
/// Merges `custom` over `base` (same id replaces, keeping the base position),
/// then removes `exclude`d ids and, if `include` is non-empty, keeps only those.
pub fn build_catalog(
    base: Vec<ChartArchetype>,
    custom: Vec<ChartArchetype>,
    filter: &CatalogFilter,
) -> CatalogResult<Catalog> {
    let mut archetypes: IndexMap<String, ChartArchetype> = IndexMap::new();
    for archetype in base.into_iter().chain(custom) {
        archetype.validate()?;
        archetypes.insert(archetype.id.clone(), archetype);
    }
    archetypes.retain(|id, _| !filter.exclude.contains(id));
    if !filter.include.is_empty() {
        archetypes.retain(|id, _| filter.include.contains(id));
    }
    tracing::debug!(archetypes = ?archetypes.keys().collect::<Vec<_>>(), "catalog built");
    Ok(Catalog { archetypes })
}
pub fn build_catalog_from_config(
    base: Vec<ChartArchetype>,
    mut custom: Vec<ChartArchetype>,
    config: &CatalogConfig,
) -> CatalogResult<Catalog> {
    let mut declared = Vec::with_capacity(config.custom_archetypes.len());
    for decl in &config.custom_archetypes {
        declared.push(resolve_declaration(decl, &base)?);
    }
    declared.append(&mut custom);
    let filter = CatalogFilter {
        include: config.include.clone(),
        exclude: config.exclude.clone(),
    };
    build_catalog(base, declared, &filter)
}
fn resolve_declaration(decl: &ArchetypeDecl, base: &[ChartArchetype]) -> CatalogResult<ChartArchetype> {
    let template = base
        .iter()
        .find(|a| a.id == decl.synthesizer)
        .ok_or_else(|| CatalogError::UnknownSynthesizer {
            archetype: decl.id.clone(),
            synthesizer: decl.synthesizer.clone(),
        })?;
    let mut preconditions = Vec::with_capacity(decl.preconditions.len());
    for p in &decl.preconditions {
        let levels = p
            .levels
            .iter()
            .map(|name| {
                name.parse::<MeasurementLevel>()
                    .map_err(|level| CatalogError::UnknownMeasurementLevel {
                        archetype: decl.id.clone(),
                        level,
                    })
            })
            .collect::<CatalogResult<Vec<_>>>()?;
        preconditions.push(DataPrecondition::new(p.min_count, p.max_count, &levels));
    }
    let mut archetype = template.derive(decl.id.clone(), preconditions);
    if let Some(description) = &decl.description {
        archetype.description = description.clone();
    }
    Ok(archetype)
}
