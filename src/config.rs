use crate::error::{ConfigError, PoseTableError};
use crate::pose::{PoseTable, PoseTableSpec, Profile};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for a [`HandController`](crate::HandController).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Wiring profile; selects the built-in pose table.
    pub profile: Profile,
    /// Settle window after a button edge. Default: 500 ms.
    pub settle_delay_ms: u64,
    /// How long a transient status message stays up. Default: 2 s.
    pub status_timeout_ms: u64,
    /// How long the game-over banner stays up. Default: 3 s.
    pub win_hold_ms: u64,
    /// Bounded wait for the counterpart's gesture after `USER:`. Default: 10 s.
    pub handshake_timeout_ms: u64,
    /// Score that ends a game. Default: 3.
    pub win_threshold: u32,
    /// Accept `ASL` / `MIRROR` / `GAME` lines as mode selection.
    pub serial_mode_select: bool,
    /// Custom pose table replacing the profile's built-in one.
    pub table: Option<PoseTableSpec>,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            settle_delay_ms: 500,
            status_timeout_ms: 2_000,
            win_hold_ms: 3_000,
            handshake_timeout_ms: 10_000,
            win_threshold: 3,
            serial_mode_select: true,
            table: None,
        }
    }
}

impl HandConfig {
    /// Parses a TOML config and validates the pose table it selects.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.pose_table()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Builds and validates the pose table this config selects.
    pub fn pose_table(&self) -> Result<PoseTable, PoseTableError> {
        match &self.table {
            Some(spec) => PoseTable::from_spec(spec),
            None => PoseTable::builtin(self.profile),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn win_hold(&self) -> Duration {
        Duration::from_millis(self.win_hold_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}
