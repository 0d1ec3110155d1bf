use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::CategoryMode;

/// Roughly one metre, in degrees of latitude/longitude.
const METRE: f64 = 1e-5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    NotNonNegative { field: &'static str, value: f64 },
    #[error("thinness area steps must be non-decreasing: {0:?}")]
    UnorderedAreaSteps([f64; 3]),
    #[error("thinness thresholds must be strictly decreasing: {0:?}")]
    UnorderedThresholds([f64; 3]),
    #[error("`{field}` must not be empty")]
    EmptyKey { field: &'static str },
}

/// Tunables for one classification granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Profile name, used in logs and default output paths.
    pub name: String,
    /// How input codes are reduced to categories.
    pub mode: CategoryMode,
    /// Input property holding the classification code.
    #[serde(default = "default_source_key")]
    pub source_key: String,
    /// Output property receiving the category.
    pub output_key: String,
    /// Polygons (and holes) smaller than this are always merged (dropped).
    pub area_limit: f64,
    /// Tolerance used to simplify a boundary before scoring its thinness.
    pub simplify_tolerance: f64,
    /// Upper area bounds of the three thinness tiers, smallest first.
    pub thinness_area_steps: [f64; 3],
    /// Thinness below which a polygon in the matching tier is force-merged.
    /// `None` disables thinness-based merging.
    #[serde(default)]
    pub thinness_thresholds: Option<[f64; 3]>,
    /// Minimum shared-border ratio for a same-category merge.
    pub minimum_border_ratio: f64,
}

fn default_source_key() -> String { "H".to_string() }

impl TrimConfig {
    /// Middle classification (`code / 100`), written under `"C"`.
    pub fn chu() -> Self {
        Self {
            name: "chu".to_string(),
            mode: CategoryMode::Hundred,
            source_key: default_source_key(),
            output_key: "C".to_string(),
            area_limit: (200.0 * METRE) * (200.0 * METRE),
            simplify_tolerance: 40.0 * METRE,
            thinness_area_steps: [
                (1000.0 * METRE) * (500.0 * METRE),
                (1000.0 * METRE) * (1000.0 * METRE),
                (1000.0 * METRE) * (3000.0 * METRE),
            ],
            thinness_thresholds: None,
            minimum_border_ratio: 0.15,
        }
    }

    /// Vegetation category classification, written under `"S"`.
    pub fn shokusei() -> Self {
        Self {
            name: "shokusei".to_string(),
            mode: CategoryMode::Vegetation { paddy_field: true },
            source_key: default_source_key(),
            output_key: "S".to_string(),
            area_limit: (750.0 * METRE) * (750.0 * METRE),
            simplify_tolerance: 150.0 * METRE,
            thinness_area_steps: [
                (1000.0 * METRE) * (5000.0 * METRE),
                (1000.0 * METRE) * (15000.0 * METRE),
                (1000.0 * METRE) * (30000.0 * METRE),
            ],
            thinness_thresholds: Some([0.10, 0.05, 0.02]),
            minimum_border_ratio: 0.13,
        }
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 { Ok(()) } else { Err(ConfigError::NotNonNegative { field, value }) }
        }

        if self.source_key.is_empty() { return Err(ConfigError::EmptyKey { field: "source_key" }) }
        if self.output_key.is_empty() { return Err(ConfigError::EmptyKey { field: "output_key" }) }

        non_negative("area_limit", self.area_limit)?;
        non_negative("simplify_tolerance", self.simplify_tolerance)?;
        non_negative("minimum_border_ratio", self.minimum_border_ratio)?;
        for step in self.thinness_area_steps {
            non_negative("thinness_area_steps", step)?;
        }
        if self.thinness_area_steps.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::UnorderedAreaSteps(self.thinness_area_steps));
        }

        if let Some(thresholds) = self.thinness_thresholds {
            for threshold in thresholds {
                non_negative("thinness_thresholds", threshold)?;
            }
            if thresholds.windows(2).any(|w| w[0] <= w[1]) {
                return Err(ConfigError::UnorderedThresholds(thresholds));
            }
        }

        Ok(())
    }

    /// Thinness threshold for a polygon of `area`, if its tier has one.
    pub fn thinness_threshold(&self, area: f64) -> Option<f64> {
        let thresholds = self.thinness_thresholds?;
        self.thinness_area_steps.iter()
            .position(|&step| area < step)
            .map(|tier| thresholds[tier])
    }
}

/// Built-in configuration profiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Profile { Chu, Shokusei }

impl Profile {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chu => "chu",
            Self::Shokusei => "shokusei",
        }
    }

    pub fn config(self) -> TrimConfig {
        match self {
            Self::Chu => TrimConfig::chu(),
            Self::Shokusei => TrimConfig::shokusei(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid() {
        assert_eq!(TrimConfig::chu().validate(), Ok(()));
        assert_eq!(TrimConfig::shokusei().validate(), Ok(()));
    }

    #[test]
    fn profile_constants() {
        let chu = TrimConfig::chu();
        assert!((chu.area_limit - 4e-6).abs() < 1e-18);
        assert!((chu.simplify_tolerance - 4e-4).abs() < 1e-15);
        assert_eq!(chu.output_key, "C");
        assert_eq!(chu.minimum_border_ratio, 0.15);
        assert!(chu.thinness_thresholds.is_none());

        let shokusei = TrimConfig::shokusei();
        assert!((shokusei.area_limit - 5.625e-5).abs() < 1e-17);
        assert!((shokusei.thinness_area_steps[0] - 5e-4).abs() < 1e-15);
        assert!((shokusei.thinness_area_steps[2] - 3e-3).abs() < 1e-15);
        assert_eq!(shokusei.output_key, "S");
        assert_eq!(shokusei.minimum_border_ratio, 0.13);
    }

    #[test]
    fn thinness_tiers() {
        let config = TrimConfig::shokusei();
        assert_eq!(config.thinness_threshold(1e-4), Some(0.10));
        assert_eq!(config.thinness_threshold(1e-3), Some(0.05));
        assert_eq!(config.thinness_threshold(2e-3), Some(0.02));
        assert_eq!(config.thinness_threshold(1.0), None);
        assert_eq!(TrimConfig::chu().thinness_threshold(1e-9), None);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = TrimConfig::shokusei();
        config.area_limit = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::NotNonNegative { field: "area_limit", .. })));

        let mut config = TrimConfig::shokusei();
        config.thinness_thresholds = Some([0.02, 0.05, 0.10]);
        assert!(matches!(config.validate(), Err(ConfigError::UnorderedThresholds(_))));

        let mut config = TrimConfig::chu();
        config.thinness_area_steps = [3.0, 2.0, 1.0];
        assert!(matches!(config.validate(), Err(ConfigError::UnorderedAreaSteps(_))));

        let mut config = TrimConfig::chu();
        config.output_key.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyKey { field: "output_key" }));
    }

    #[test]
    fn config_round_trips_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let config = TrimConfig::shokusei();
        fs::write(&path, serde_json::to_vec(&config).unwrap()).unwrap();

        assert_eq!(TrimConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn source_key_defaults_to_h() {
        let json = r#"{
            "name": "custom", "mode": {"kind": "hundred"}, "output_key": "K",
            "area_limit": 1.0, "simplify_tolerance": 0.1,
            "thinness_area_steps": [1.0, 2.0, 3.0], "minimum_border_ratio": 0.2
        }"#;
        let config: TrimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.source_key, "H");
        assert_eq!(config.thinness_thresholds, None);
    }

    #[test]
    fn profile_names_match_configs() {
        for profile in [Profile::Chu, Profile::Shokusei] {
            assert_eq!(profile.config().name, profile.name());
        }
    }
}
