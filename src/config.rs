use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::pipeline::DEFAULT_THRESHOLD;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "CASCADE_TUNER_CONFIG";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Session settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Number of items generated at start-up.
    pub item_count: usize,
    /// Seed for item generation; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Initial threshold of every stage.
    pub default_threshold: f64,
    /// Slider granularity.
    pub threshold_step: f64,
    /// How many stages an in-flight pass evaluates per frame.
    pub stages_per_tick: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            item_count: 100,
            seed: None,
            default_threshold: DEFAULT_THRESHOLD,
            threshold_step: 0.1,
            stages_per_tick: 1,
        }
    }
}

impl Settings {
    /// Settings from `$CASCADE_TUNER_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading settings from {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).context("parsing settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_threshold) {
            bail!("default_threshold {} is outside [0, 1]", self.default_threshold);
        }
        if !(self.threshold_step > 0.0 && self.threshold_step <= 1.0) {
            bail!("threshold_step {} must be in (0, 1]", self.threshold_step);
        }
        if self.stages_per_tick == 0 {
            bail!("stages_per_tick must be at least 1");
        }
        Ok(())
    }
}
