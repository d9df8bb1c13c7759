//! Match settings
//!
//! Loaded from a JSON file by the headless driver; every field is optional
//! and falls back to the tuned defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Configuration for a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// RNG seed for spawn layout and headings
    pub seed: u64,
    /// Number of cells to infect
    pub num_cells: usize,
    /// Number of roaming antibodies
    pub num_antibodies: usize,
    /// Countdown budget in seconds
    pub time_budget: f32,
    /// Seconds after start during which antibody contact is harmless
    pub grace_period: f32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CE11,
            num_cells: DEFAULT_CELLS,
            num_antibodies: DEFAULT_ANTIBODIES,
            time_budget: MATCH_TIME_BUDGET,
            grace_period: HAZARD_GRACE_PERIOD,
        }
    }
}

impl MatchSettings {
    /// Defaults with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SimError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded match settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default match settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}, using default match settings");
                Self::default()
            }
        }
    }

    /// Reject settings that cannot produce a playable match
    pub fn validate(&self) -> Result<()> {
        if self.num_cells == 0 {
            return Err(SimError::InvalidSettings(
                "num_cells must be at least 1".into(),
            ));
        }
        if !(self.time_budget.is_finite() && self.time_budget > TIMER_EPSILON) {
            return Err(SimError::InvalidSettings(format!(
                "time_budget must be a positive number of seconds, got {}",
                self.time_budget
            )));
        }
        if !(self.grace_period.is_finite() && self.grace_period >= 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "grace_period must be >= 0, got {}",
                self.grace_period
            )));
        }
        Ok(())
    }
}
