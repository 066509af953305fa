use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{Const, DataError, PenPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub min_bars_per_pen: usize,
    pub pen_policy: PenPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_bars_per_pen: Const::DEFAULT_MIN_BARS_PER_PEN,
            pen_policy: PenPolicy::New,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfigPatch {
    #[serde(default, alias = "minBarsPerPen", alias = "min_klines_per_pen")]
    pub min_bars_per_pen: Option<usize>,
    #[serde(default, alias = "penPolicy", alias = "pen_type")]
    pub pen_policy: Option<PenPolicy>,
}

// 按品种覆盖默认配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisProfileConfig {
    #[serde(default)]
    pub default: AnalysisConfigPatch,
    #[serde(default)]
    pub symbol: HashMap<String, AnalysisConfigPatch>,
}

impl AnalysisConfig {
    pub fn new(pen_policy: PenPolicy, min_bars_per_pen: usize) -> Self {
        Self {
            min_bars_per_pen,
            pen_policy,
        }
    }

    pub fn apply_patch(mut self, patch: &AnalysisConfigPatch) -> Self {
        if let Some(v) = patch.min_bars_per_pen {
            self.min_bars_per_pen = v;
        }
        if let Some(v) = patch.pen_policy {
            self.pen_policy = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.min_bars_per_pen == 0 {
            return Err(DataError::InvalidConfig(
                "min_bars_per_pen must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let patch: AnalysisConfigPatch = serde_yaml::from_str(yaml)?;
        let config = Self::default().apply_patch(&patch);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

impl AnalysisProfileConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn resolve_for(&self, symbol: &str) -> Result<AnalysisConfig, DataError> {
        let mut config = AnalysisConfig::default().apply_patch(&self.default);
        if let Some(patch) = find_patch(&self.symbol, symbol) {
            config = config.apply_patch(patch);
        }
        config.validate()?;
        Ok(config)
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn find_patch<'a>(
    map: &'a HashMap<String, AnalysisConfigPatch>,
    key: &str,
) -> Option<&'a AnalysisConfigPatch> {
    let key_norm = normalize_key(key);
    map.iter()
        .find(|(k, _)| normalize_key(k) == key_norm)
        .map(|(_, v)| v)
}
