//! Kernel configuration
//!
//! Tolerances and the initial trigonometry policy, loadable from JSON.

use crate::constants::{DECIMAL_DIGITS, FLOAT_ROUNDING_ERROR, UNIT_MARGIN};
use crate::scalar::AccuracySwitch;
use crate::{MathError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime settings of the math kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Start with library-exact trigonometry
    pub high_accuracy: bool,
    /// Tolerance of the `is_zero`/`is_equal`/`is_on_line` family
    pub epsilon: f64,
    /// Tolerance of `is_unit`
    pub unit_margin: f64,
    /// Significant digits of the decimal tier; only 34 is supported
    pub decimal_digits: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            high_accuracy: true,
            epsilon: FLOAT_ROUNDING_ERROR,
            unit_margin: UNIT_MARGIN,
            decimal_digits: DECIMAL_DIGITS,
        }
    }
}

impl KernelConfig {
    /// Parse a configuration from a JSON document
    ///
    /// Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: KernelConfig =
            serde_json::from_str(json).map_err(|e| MathError::Config(e.to_string()))?;
        config.validate()?;
        debug!("Loaded kernel configuration: {:?}", config);
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MathError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.decimal_digits != DECIMAL_DIGITS {
            return Err(MathError::Config(format!(
                "decimal tier runs at {} significant digits, got {}",
                DECIMAL_DIGITS, self.decimal_digits
            )));
        }
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(MathError::Config(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        if !(self.unit_margin >= 0.0 && self.unit_margin.is_finite()) {
            return Err(MathError::Config(format!(
                "unit_margin must be finite and non-negative, got {}",
                self.unit_margin
            )));
        }
        Ok(())
    }

    /// A fresh accuracy switch set to the configured initial policy
    pub fn accuracy(&self) -> AccuracySwitch {
        AccuracySwitch::new(self.high_accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert!(config.high_accuracy);
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.unit_margin, 1e-9);
        assert_eq!(config.decimal_digits, 34);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = KernelConfig::from_json_str(r#"{ "high_accuracy": false }"#).unwrap();
        assert!(!config.high_accuracy);
        assert_eq!(config.epsilon, 1e-6);
        assert!(!config.accuracy().is_high_accuracy());
    }

    #[test]
    fn test_rejects_other_decimal_precision() {
        let result = KernelConfig::from_json_str(r#"{ "decimal_digits": 50 }"#);
        assert!(matches!(result, Err(MathError::Config(_))));
    }

    #[test]
    fn test_rejects_negative_epsilon() {
        let result = KernelConfig::from_json_str(r#"{ "epsilon": -1.0 }"#);
        assert!(matches!(result, Err(MathError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = KernelConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(MathError::Config(_))));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let config = KernelConfig {
            high_accuracy: false,
            epsilon: 1e-4,
            ..KernelConfig::default()
        };

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_json_string().unwrap().as_bytes())
            .unwrap();

        let loaded = KernelConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = KernelConfig::from_file("/nonexistent/starmath.json");
        assert!(matches!(result, Err(MathError::Io(_))));
    }
}
