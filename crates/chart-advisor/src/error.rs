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

use thiserror::Error;
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Archetype id must not be empty")]
    EmptyArchetypeId,
    #[error("Archetype '{archetype}' declares no data preconditions")]
    EmptyPreconditions { archetype: String },
    #[error("Precondition {index} of archetype '{archetype}' allows no measurement level")]
    EmptyAllowedLevels { archetype: String, index: usize },
    #[error(
        "Precondition {index} of archetype '{archetype}' has invalid cardinality: min {min}, max {max}"
    )]
    InvalidCardinality {
        archetype: String,
        index: usize,
        min: usize,
        max: usize,
    },
    #[error("Archetype '{archetype}' references unknown measurement level '{level}'")]
    UnknownMeasurementLevel { archetype: String, level: String },
    #[error("Archetype '{archetype}' references unknown synthesizer '{synthesizer}'")]
    UnknownSynthesizer {
        archetype: String,
        synthesizer: String,
    },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid classifier configuration: {field} = {value}")]
    InvalidClassifierConfig { field: String, value: String },
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
    #[error("YAML serialisation failed: {source}")]
    YamlSerialisationError {
        #[from]
        source: serde_yaml::Error,
    },
}
pub type Result<T> = std::result::Result<T, AdvisorError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        AdvisorError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}
impl From<serde_yaml::Error> for AdvisorError {
    fn from(err: serde_yaml::Error) -> Self {
        AdvisorError::Serialisation(SerialisationError::YamlSerialisationError { source: err })
    }
}
impl AdvisorError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, AdvisorError::Catalog(_) | AdvisorError::Config(_))
    }
    pub fn category(&self) -> &'static str {
        match self {
            AdvisorError::Catalog(_) => "Catalog",
            AdvisorError::Config(_) => "Configuration",
            AdvisorError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdvisorError::Catalog(_) => ErrorSeverity::Critical,
            AdvisorError::Config(_) | AdvisorError::Serialisation(_) => {
                ErrorSeverity::Error
            }
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AdvisorError::Catalog(CatalogError::UnknownMeasurementLevel { .. }) => vec![
                "Use one of: nominal, ordinal, interval, time".to_string(),
                "Check the spelling of the level in the archetype declaration".to_string(),
            ],
            AdvisorError::Catalog(CatalogError::UnknownSynthesizer { .. }) => vec![
                "Reference a built-in archetype id as the synthesizer".to_string(),
                "List available archetypes to see valid options".to_string(),
            ],
            AdvisorError::Catalog(CatalogError::InvalidCardinality { .. }) => {
                vec!["Ensure min_count <= max_count and max_count > 0".to_string()]
            }
            AdvisorError::Config(ConfigError::InvalidClassifierConfig { .. }) => {
                vec!["Ratios and thresholds must lie in (0, 1]".to_string()]
            }
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &AdvisorError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!(
            "[{}] {}: {}\n",
            severity.as_str(),
            error.category(),
            error
        ));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
