// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration, stored as RON text.
//!
//! Only text goes in and out; reading and writing files is the caller's job.

use crate::history::MAX_HISTORY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "level_editor_core=info";

/// Errors from loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The text is not valid RON for [`EditorConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The config could not be written as RON
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// A field holds a value the editor cannot use
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Editing session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undoable actions kept
    pub history_depth: usize,
    /// `tracing` filter directive used by [`crate::logging::init`]
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: MAX_HISTORY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid(
                "history_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_depth, 100);
        assert_eq!(config.log_filter, "level_editor_core=info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_ron("(history_depth: 25)").unwrap();
        assert_eq!(config.history_depth, 25);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_saved_config_loads_back() {
        let config = EditorConfig {
            history_depth: 8,
            log_filter: "level_editor_core=debug".to_string(),
        };
        let text = config.to_ron().unwrap();
        assert!(text.contains("EditorConfig"));
        assert_eq!(EditorConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            EditorConfig::from_ron("(history_depth: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_ron("(history_depth: \"lots\")"),
            Err(ConfigError::Parse(_))
        ));
    }
}
