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

pub mod advisor;
pub mod archetypes;
pub mod catalog;
pub mod config;
pub mod error;
pub mod field_classifier;
pub mod merger;
pub mod post_processor;
pub mod specification;

pub use advisor::{advise_classified, Advisor, Candidate};
pub use catalog::{
    build_catalog, build_catalog_from_config, AssignmentMode, Catalog, CatalogFilter,
    ChartArchetype, DataPrecondition, FieldAssignment,
};
pub use config::{AdvisorConfig, ArchetypeDecl, CatalogConfig, ClassifierConfig, PreconditionDecl};
pub use error::{AdvisorError, CatalogError, ConfigError, ErrorReporter, Result};
pub use field_classifier::{
    Datum, FieldClassifier, FieldDescriptor, FieldHint, FieldRecommendation, MeasurementLevel,
    ValueKind,
};
pub use merger::{RecommendationMerger, RecommendationResult};
pub use post_processor::PostProcessor;
pub use specification::{Encode, Encoding, MarkKind, Projection, Specification};

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub data: Vec<Datum>,
    pub field_hints: Vec<FieldHint>,
    pub external_hint: Vec<String>,
    pub previous_selection: Option<String>,
}
impl RecommendationRequest {
    pub fn new(data: Vec<Datum>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
    pub fn with_field_hints(mut self, hints: Vec<FieldHint>) -> Self {
        self.field_hints = hints;
        self
    }
    pub fn with_external_hint<I, S>(mut self, chart_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_hint = chart_types.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_previous_selection(mut self, chart_type: impl Into<String>) -> Self {
        self.previous_selection = Some(chart_type.into());
        self
    }
}
/// Classify, advise, merge and post-process in one call over an immutable catalog.
pub struct ChartAdvisor {
    config: AdvisorConfig,
    catalog: Catalog,
    advisor: Advisor,
}
impl ChartAdvisor {
    pub fn new() -> Result<Self> {
        Self::with_config(AdvisorConfig::default(), Vec::new())
    }
    pub fn with_config(config: AdvisorConfig, custom_archetypes: Vec<ChartArchetype>) -> Result<Self> {
        config.validate()?;
        let catalog = build_catalog_from_config(
            archetypes::builtin_archetypes(),
            custom_archetypes,
            &config.catalog,
        )?;
        let advisor = Advisor::with_classifier(FieldClassifier::with_config(config.classifier.clone()));
        Ok(Self {
            config,
            catalog,
            advisor,
        })
    }
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(AdvisorConfig::from_yaml_file(path)?, Vec::new())
    }
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
    pub fn classify(&self, data: &[Datum], hints: &[FieldHint]) -> Vec<FieldDescriptor> {
        self.advisor.classifier().classify_with_hints(data, hints)
    }
    pub fn recommend(&self, request: &RecommendationRequest) -> RecommendationResult {
        let fields = self.classify(&request.data, &request.field_hints);
        let candidates = advise_classified(&request.data, &fields, &self.catalog);
        let merged = RecommendationMerger::new(&request.data, &fields, &self.catalog)
            .merge(&candidates, &request.external_hint);
        let post_processor = PostProcessor::new(&fields, &self.config.classifier);
        let processed = merged
            .into_iter()
            .map(|mut candidate| {
                candidate.specification =
                    post_processor.process(candidate.specification, &candidate.chart_type);
                candidate
            })
            .collect();
        tracing::debug!(
            fields = fields.len(),
            candidates = candidates.len(),
            "recommendation computed"
        );
        RecommendationResult::new(processed, request.previous_selection.as_deref())
    }
}
