use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::state::DEFAULT_REVIVE_HEALTH;

/// Complete worldsync configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldSyncConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub npc: NpcConfig,
}

/// Snapshot file locations
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory all snapshot files live under
    #[serde(default = "default_storage_directory")]
    pub directory: PathBuf,
    /// Mission snapshot, relative to `directory`
    #[serde(default = "default_missions_file")]
    pub missions_file: PathBuf,
    /// NPC snapshot, relative to `directory`
    #[serde(default = "default_npcs_file")]
    pub npcs_file: PathBuf,
}

fn default_storage_directory() -> PathBuf {
    PathBuf::from("plugins")
}

fn default_missions_file() -> PathBuf {
    PathBuf::from("MissionSync/missions.json")
}

fn default_npcs_file() -> PathBuf {
    PathBuf::from("NPCBattleSync/npcs.json")
}

impl StorageConfig {
    pub fn missions_path(&self) -> PathBuf {
        self.directory.join(&self.missions_file)
    }

    pub fn npcs_path(&self) -> PathBuf {
        self.directory.join(&self.npcs_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_directory(),
            missions_file: default_missions_file(),
            npcs_file: default_npcs_file(),
        }
    }
}

/// WebSocket host settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Capacity of the host event queue feeding the dispatcher
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_bind() -> String {
    "0.0.0.0:7777".to_string()
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Server tick settings
#[derive(Debug, Clone, Deserialize)]
pub struct TickConfig {
    #[serde(default = "default_tick_interval")]
    pub interval_ms: u64,
}

fn default_tick_interval() -> u64 {
    100
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_interval(),
        }
    }
}

/// NPC lifecycle settings
#[derive(Debug, Clone, Deserialize)]
pub struct NpcConfig {
    /// Health restored on revive
    #[serde(default = "default_revive_health")]
    pub revive_health: f32,
}

fn default_revive_health() -> f32 {
    DEFAULT_REVIVE_HEALTH
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            revive_health: default_revive_health(),
        }
    }
}

impl WorldSyncConfig {
    /// Override fields from env vars, ignoring unparseable values
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("WORLDSYNC_BIND") {
            self.server.bind = v;
        }
        if let Ok(v) = std::env::var("WORLDSYNC_TICK_MS") {
            if let Ok(n) = v.parse::<u64>() {
                self.tick.interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("WORLDSYNC_STORAGE_DIR") {
            self.storage.directory = PathBuf::from(v);
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &Path) -> Result<WorldSyncConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: WorldSyncConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load configuration from `path` if it exists, defaults otherwise, then
/// apply env overrides
pub fn load_or_default(path: &Path) -> Result<WorldSyncConfig> {
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        WorldSyncConfig::default()
    };
    config.apply_env();
    Ok(config)
}
