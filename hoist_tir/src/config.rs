//! Lowering configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! simplify = true
//!
//! [hoist_if]
//! enabled = true
//! versioning = true
//! prefix_split = true
//! max_iterations = 16
//! ```
//!
//! Every key is optional; missing keys take their default values.

use crate::error::{IrError, IrResult};
use crate::transform::HoistConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the lowering pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    /// Run expression simplification before hoisting
    pub simplify: bool,
    /// Guard hoisting options
    pub hoist_if: HoistConfig,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            simplify: true,
            hoist_if: HoistConfig::default(),
        }
    }
}

impl LowerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> IrResult<Self> {
        let config: LowerConfig =
            toml::from_str(text).map_err(|e| IrError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> IrResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> IrResult<String> {
        toml::to_string(self).map_err(|e| IrError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> IrResult<()> {
        if self.hoist_if.max_iterations == 0 {
            return Err(IrError::InvalidConfig(
                "hoist_if.max_iterations must be at least 1".to_string(),
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
    fn test_defaults_from_empty_document() {
        let config = LowerConfig::from_toml_str("").unwrap();
        assert_eq!(config, LowerConfig::default());
        assert!(config.simplify);
        assert!(config.hoist_if.enabled);
        assert_eq!(config.hoist_if.max_iterations, 16);
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config = LowerConfig::from_toml_str(
            r#"
            simplify = false

            [hoist_if]
            versioning = false
            "#,
        )
        .unwrap();
        assert!(!config.simplify);
        assert!(!config.hoist_if.versioning);
        assert!(config.hoist_if.prefix_split);
        assert!(config.hoist_if.enabled);
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let err = LowerConfig::from_toml_str("[hoist_if]\nmax_iterations = 0\n").unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = LowerConfig::from_toml_str("simplify = ").unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));

        let err = LowerConfig::from_toml_str("simplify = 3").unwrap_err();
        assert!(matches!(err, IrError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hoist_if]\nmax_iterations = 4").unwrap();
        let config = LowerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hoist_if.max_iterations, 4);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LowerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, IrError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = LowerConfig::default();
        config.hoist_if.prefix_split = false;
        let text = config.to_toml_string().unwrap();
        assert_eq!(LowerConfig::from_toml_str(&text).unwrap(), config);
    }
}
