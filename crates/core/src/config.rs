//! Tunable parameters of a chase.
//!
//! None of these are contracts: the step ratio and tick period only shape how
//! the chase looks. Defaults give the Jingshan Park demo its pace.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ChaseError, Result},
    store::is_valid_key,
};

pub const DEFAULT_RUNNER_STEP: usize = 2;
pub const DEFAULT_CHASER_STEP: usize = 1;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_STORAGE_KEY: &str = "positions";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Track positions the runner advances per tick
    pub runner_step: usize,
    /// Track positions the chaser advances per tick
    pub chaser_step: usize,
    pub tick_interval_ms: u64,
    /// Key the snapshot is stored under
    pub storage_key: String,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            runner_step: DEFAULT_RUNNER_STEP,
            chaser_step: DEFAULT_CHASER_STEP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl ChaseConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ChaseError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.runner_step == 0 || self.chaser_step == 0 {
            return Err(ChaseError::InvalidConfig(
                "step sizes must be positive".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ChaseError::InvalidConfig(
                "tick interval must be positive".into(),
            ));
        }
        if !is_valid_key(&self.storage_key) {
            return Err(ChaseError::InvalidConfig(format!(
                "storage key '{}' must be letters, digits, '-', '_' or '.'",
                self.storage_key
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
