use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RampError, Result};

/// Settings shared by both compressions of a ramp-score run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    /// Door sensitivity in percent
    pub sensitivity: f64,
    /// Averaging window in minutes
    pub window_minutes: usize,
    /// Label of the competing series
    pub name: String,
    /// Hand the windowed series to a plotting consumer
    pub plot: bool,
}

impl Default for RampConfig {
    fn default() -> Self {
        RampConfig {
            sensitivity: 80.0,
            window_minutes: 60,
            name: "Compete".to_string(),
            plot: true,
        }
    }
}

impl RampConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: RampConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity.is_finite() || self.sensitivity < 0.0 {
            return Err(RampError::invalid(format!(
                "sensitivity must be a non-negative percentage, got {}",
                self.sensitivity
            )));
        }
        if self.window_minutes == 0 {
            return Err(RampError::invalid("window_minutes must be greater than 0"));
        }
        Ok(())
    }

    /// Sensitivity as the fraction the compressor expects.
    pub fn sensitivity_fraction(&self) -> f64 {
        self.sensitivity / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RampConfig::from_toml_str("").unwrap();
        assert_eq!(config, RampConfig::default());
        assert_eq!(config.sensitivity_fraction(), 0.8);
    }

    #[test]
    fn test_partial_override() {
        let config = RampConfig::from_toml_str("window_minutes = 15\nname = \"NWP\"").unwrap();
        assert_eq!(config.window_minutes, 15);
        assert_eq!(config.name, "NWP");
        assert_eq!(config.sensitivity, 80.0);
        assert!(config.plot);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            RampConfig::from_toml_str("window_minutes = 0"),
            Err(RampError::InvalidInput(_))
        ));
        assert!(RampConfig::from_toml_str("sensitivity = -5.0").is_err());
        assert!(matches!(
            RampConfig::from_toml_str("window_minutes = \"hour\""),
            Err(RampError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sensitivity = 50.0\nplot = false").unwrap();

        let config = RampConfig::load(file.path()).unwrap();
        assert_eq!(config.sensitivity, 50.0);
        assert!(!config.plot);
        assert!(RampConfig::load(file.path().with_extension("missing")).is_err());
    }
}
