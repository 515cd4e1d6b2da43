// Mission and NPC record types

mod mission;
mod npc;

pub use mission::MissionStatus;
pub use npc::{valid_revive_health, NpcState, Position, PositionError, DEFAULT_REVIVE_HEALTH};

use crate::registry::StateRegistry;

/// Mission name -> status
pub type MissionRegistry = StateRegistry<MissionStatus>;

/// NPC name -> combat state
pub type NpcRegistry = StateRegistry<NpcState>;
