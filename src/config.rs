use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{HoldConfig, RotationConfig, SceneConfig};
use crate::gesture::GestureThresholds;
use crate::scene::ParticleConfig;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "GESTURE_TREE_CONFIG";

/// All tunables in one place. Every section is optional in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gesture: GestureThresholds,
    pub hold: HoldConfig,
    pub scene: SceneConfig,
    pub rotation: RotationConfig,
    pub particles: ParticleConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `GESTURE_TREE_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        anyhow::ensure!(
            g.pinch_threshold <= g.pinch_threshold_relaxed,
            "pinch threshold {} exceeds relaxed threshold {}",
            g.pinch_threshold,
            g.pinch_threshold_relaxed
        );
        anyhow::ensure!(
            self.hold.countdown_start_ms < self.hold.capture_after_ms,
            "countdown must start before capture ({} >= {})",
            self.hold.countdown_start_ms,
            self.hold.capture_after_ms
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.rotation.inertia_damping),
            "inertia damping must be within [0, 1], got {}",
            self.rotation.inertia_damping
        );
        Ok(())
    }
}
