use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::Band;

/// The 10-20 montage positions in plotting order.
pub const DEFAULT_MONTAGE: [&str; 19] = [
    "FP1", "FP2", "F7", "F3", "Fz", "F4", "F8", "T3", "C3", "Cz", "C4", "T4", "T5", "P3", "Pz",
    "P4", "T6", "O1", "O2",
];

pub const DEFAULT_GROUP_COLUMN: &str = "main.disorder";

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// What to look for in a dataset: the grouping column, the column prefix of
/// each band and the electrode order.
///
/// Loaded from JSON; any key left out keeps its default:
///
/// ```json
/// {
///   "group_column": "specific.disorder",
///   "bands": { "delta": "AB.A.delta", "gamma": "AB.F.gamma" },
///   "montage": ["FP1", "FP2", "Cz", "O1", "O2"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub group_column: String,
    pub bands: BTreeMap<Band, String>,
    pub montage: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("group column name is empty")]
    EmptyGroupColumn,
    #[error("montage has no electrodes")]
    EmptyMontage,
    #[error("electrode '{0}' appears more than once in the montage")]
    DuplicateElectrode(String),
    #[error("prefix for band '{0}' is empty")]
    EmptyPrefix(Band),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            bands: Band::ALL
                .iter()
                .map(|&b| (b, b.default_prefix().to_string()))
                .collect(),
            montage: DEFAULT_MONTAGE.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_column.trim().is_empty() {
            return Err(ConfigError::EmptyGroupColumn);
        }
        if self.montage.is_empty() {
            return Err(ConfigError::EmptyMontage);
        }
        let mut seen = BTreeSet::new();
        for electrode in &self.montage {
            if !seen.insert(electrode.as_str()) {
                return Err(ConfigError::DuplicateElectrode(electrode.clone()));
            }
        }
        if let Some((band, _)) = self.bands.iter().find(|(_, p)| p.is_empty()) {
            return Err(ConfigError::EmptyPrefix(*band));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_cover_all_bands_and_montage() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.bands.len(), 6);
        assert_eq!(cfg.bands[&Band::Beta], "AB.D.beta");
        assert_eq!(cfg.montage.len(), 19);
        assert_eq!(cfg.montage.first().map(String::as_str), Some("FP1"));
        assert_eq!(cfg.montage.last().map(String::as_str), Some("O2"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "group_column": "specific.disorder" }}"#).unwrap();

        let cfg = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.group_column, "specific.disorder");
        assert_eq!(cfg.bands, AnalysisConfig::default().bands);
        assert_eq!(cfg.montage.len(), 19);
    }

    #[test]
    fn band_keys_deserialize_lowercase() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{ "bands": { "highbeta": "HB" } }"#).unwrap();
        assert_eq!(cfg.bands.len(), 1);
        assert_eq!(cfg.bands[&Band::HighBeta], "HB");
    }

    #[test]
    fn validation_rejects_bad_configs() {
        let mut cfg = AnalysisConfig::default();
        cfg.montage.push("Cz".into());
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateElectrode("Cz".into()))
        );

        let mut cfg = AnalysisConfig::default();
        cfg.montage.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyMontage));

        let mut cfg = AnalysisConfig::default();
        cfg.group_column = "  ".into();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyGroupColumn));

        let mut cfg = AnalysisConfig::default();
        cfg.bands.insert(Band::Alpha, String::new());
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPrefix(Band::Alpha)));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(AnalysisConfig::from_file(file.path()).is_err());
    }
}
