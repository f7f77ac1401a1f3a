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

use crate::error::{AdvisorError, ConfigError, ConfigResult, Result};
use crate::field_classifier::{
    DATE_CONFIDENCE_THRESHOLD, DEFAULT_TEMPORAL_FORMATS, DISTINCT_RATIO_THRESHOLD,
    MAX_ORDINAL_CARDINALITY,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub distinct_ratio_threshold: f64,
    pub max_ordinal_cardinality: usize,
    pub date_confidence_threshold: f64,
    pub temporal_formats: Vec<String>,
}
impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            distinct_ratio_threshold: DISTINCT_RATIO_THRESHOLD,
            max_ordinal_cardinality: MAX_ORDINAL_CARDINALITY,
            date_confidence_threshold: DATE_CONFIDENCE_THRESHOLD,
            temporal_formats: DEFAULT_TEMPORAL_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}
impl ClassifierConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let ratios = [
            ("distinct_ratio_threshold", self.distinct_ratio_threshold),
            ("date_confidence_threshold", self.date_confidence_threshold),
        ];
        for (field, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidClassifierConfig {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if self.temporal_formats.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidClassifierConfig {
                field: "temporal_formats".to_string(),
                value: "<empty>".to_string(),
            });
        }
        Ok(())
    }
    pub fn is_low_cardinality(&self, distinct: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        let ratio = distinct as f64 / total as f64;
        ratio <= self.distinct_ratio_threshold && distinct <= self.max_ordinal_cardinality
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreconditionDecl {
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    #[serde(default)]
    pub max_count: Option<usize>,
    pub levels: Vec<String>,
}
fn default_min_count() -> usize {
    1
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeDecl {
    pub id: String,
    pub synthesizer: String,
    #[serde(default)]
    pub description: Option<String>,
    pub preconditions: Vec<PreconditionDecl>,
}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub custom_archetypes: Vec<ArchetypeDecl>,
}
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub classifier: ClassifierConfig,
    pub catalog: CatalogConfig,
}
impl AdvisorConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| {
            AdvisorError::Config(ConfigError::ConfigFileError {
                path: path.as_ref().display().to_string(),
                source,
            })
        })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        let config: AdvisorConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        self.classifier.validate()
    }
}
