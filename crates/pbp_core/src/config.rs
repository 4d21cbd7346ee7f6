//! Ingest configuration
//!
//! Loaded from YAML, e.g.
//!
//! ```yaml
//! unknown_records: annotate
//! strict_fields: false
//! parallel_parse_threshold: 128
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// What to do with a record type the ingestor does not know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Abort the game with [`CoreError::UnknownRecord`]
    #[default]
    Fail,
    /// Keep the record as an "Unhandled" comment and carry on
    Annotate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub unknown_records: RecordPolicy,
    /// Leftover fields after a record's known fields are an error. When off,
    /// they are ignored and a malformed record is skipped rather than
    /// aborting its game.
    pub strict_fields: bool,
    /// Batch size above which play codes are parsed on the rayon pool
    pub parallel_parse_threshold: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            unknown_records: RecordPolicy::Fail,
            strict_fields: true,
            parallel_parse_threshold: 64,
        }
    }
}

impl IngestConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    /// Tolerates unknown record types and extra trailing fields.
    pub fn lenient() -> Self {
        Self {
            unknown_records: RecordPolicy::Annotate,
            strict_fields: false,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        log::debug!("[IngestConfig] loaded {:?}", config);
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel_parse_threshold == 0 {
            return Err(CoreError::InvalidConfig(
                "parallel_parse_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_strict() {
        let config = IngestConfig::default();
        assert_eq!(config, IngestConfig::strict());
        assert_eq!(config.unknown_records, RecordPolicy::Fail);
        assert!(config.strict_fields);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = IngestConfig::from_yaml_str("unknown_records: annotate\n").unwrap();
        assert_eq!(config.unknown_records, RecordPolicy::Annotate);
        assert!(config.strict_fields);
        assert_eq!(config.parallel_parse_threshold, 64);
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let err = IngestConfig::from_yaml_str("parallel_parse_threshold: 0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_policy_is_a_config_error() {
        let err = IngestConfig::from_yaml_str("unknown_records: explode\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict_fields: false").unwrap();
        let config = IngestConfig::from_path(file.path()).unwrap();
        assert!(!config.strict_fields);
        assert_eq!(config.unknown_records, RecordPolicy::Fail);
    }
}
