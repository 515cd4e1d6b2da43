use crate::registry::{Record, StateRegistry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Health an NPC is restored to when revived
pub const DEFAULT_REVIVE_HEALTH: f32 = 100.0;

/// Revive health usable without breaking `alive iff health > 0`.
///
/// Zero, negative and non-finite values fall back to
/// [`DEFAULT_REVIVE_HEALTH`].
pub fn valid_revive_health(health: f32) -> f32 {
    if health.is_finite() && health > 0.0 {
        health
    } else {
        warn!(
            revive_health = health,
            fallback = DEFAULT_REVIVE_HEALTH,
            "Revive health must be positive and finite, using default"
        );
        DEFAULT_REVIVE_HEALTH
    }
}

/// Spatial location of an NPC.
///
/// Encoded everywhere outside the process as `"(x, y, z)"`. Snapshots from
/// the older plugin may hold any free-form string; those are kept verbatim.
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    Coords { x: f32, y: f32, z: f32 },
    Raw(String),
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Position::Coords { x, y, z }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Coords { x, y, z } => write!(f, "({}, {}, {})", x, y, z),
            Position::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Position string parsing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PositionError {
    #[error("position '{0}' must be wrapped in parentheses")]
    Unwrapped(String),
    #[error("position '{0}' must have exactly three components")]
    ComponentCount(String),
    #[error("position component '{0}' is not a number")]
    InvalidComponent(String),
}

impl FromStr for Position {
    type Err = PositionError;

    /// Strict coordinate parse; see `Deserialize` for the lenient path
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| PositionError::Unwrapped(s.to_string()))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(PositionError::ComponentCount(s.to_string()));
        }

        let mut coords = [0.0f32; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f32>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| PositionError::InvalidComponent(part.to_string()))?;
        }

        Ok(Position::new(coords[0], coords[1], coords[2]))
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.parse() {
            Ok(position) => position,
            Err(_) => Position::Raw(raw),
        })
    }
}

/// Combat state of one NPC.
///
/// `alive` is false exactly when `health` is zero. Registries re-establish
/// this on every write, see [`NpcState::normalized`].
#[derive(Clone, Debug, PartialEq)]
pub struct NpcState {
    pub health: f32,
    pub alive: bool,
    pub position: Position,
}

impl NpcState {
    /// A living NPC at the given position
    pub fn spawn(health: f32, position: Position) -> Self {
        Self {
            health,
            alive: true,
            position,
        }
        .normalized()
    }

    /// Clamp health into `0..=f32::MAX` and derive `alive` from it.
    ///
    /// NaN counts as zero; infinities clamp so the value always serializes.
    pub fn normalized(self) -> Self {
        let health = if self.health.is_nan() {
            0.0
        } else {
            self.health.clamp(0.0, f32::MAX)
        };
        Self {
            health,
            alive: health > 0.0,
            position: self.position,
        }
    }
}

impl Record for NpcState {
    fn normalized(self) -> Self {
        NpcState::normalized(self)
    }
}

impl StateRegistry<NpcState> {
    /// Apply damage to a living NPC.
    ///
    /// Unknown or already-dead NPCs are left alone and `None` is returned.
    /// Negative amounts count as zero. Does not notify anyone.
    pub fn damage(&mut self, name: &str, amount: f32) -> Option<NpcState> {
        let amount = amount.max(0.0);

        self.modify(name, |npc| {
            if !npc.alive {
                return None;
            }

            npc.health -= amount;
            if npc.health <= 0.0 {
                npc.health = 0.0;
                npc.alive = false;
            }

            info!(
                npc = %name,
                health = npc.health,
                alive = npc.alive,
                "NPC damaged"
            );
            Some(npc.clone())
        })
        .ok()
        .flatten()
    }

    /// Bring a dead NPC back with `health`.
    ///
    /// Unknown or living NPCs are left alone and `None` is returned. A
    /// non-positive or non-finite `health` revives to the default instead.
    pub fn revive(&mut self, name: &str, health: f32) -> Option<NpcState> {
        self.modify(name, |npc| {
            if npc.alive {
                return None;
            }

            npc.health = valid_revive_health(health);
            npc.alive = true;

            info!(npc = %name, health = npc.health, "NPC revived");
            Some(npc.clone())
        })
        .ok()
        .flatten()
    }

    /// Names of every NPC currently dead, in registry order
    pub fn dead(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|(_, npc)| !npc.alive)
            .map(|(name, _)| name)
            .collect()
    }
}
