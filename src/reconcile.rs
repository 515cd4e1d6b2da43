use crate::state::{valid_revive_health, NpcRegistry, DEFAULT_REVIVE_HEALTH};
use tracing::info;

/// Per-tick liveness pass over NPC records.
///
/// Every NPC found dead is revived on the same tick; there is no cooldown
/// and no permanent death. An NPC is therefore dead for at most one tick
/// interval.
#[derive(Clone, Copy, Debug)]
pub struct HealthReconciler {
    revive_health: f32,
}

impl HealthReconciler {
    /// Zero, negative and non-finite health falls back to the default
    pub fn new(revive_health: f32) -> Self {
        Self {
            revive_health: valid_revive_health(revive_health),
        }
    }

    pub fn revive_health(&self) -> f32 {
        self.revive_health
    }

    /// Revive every dead NPC and return their names in registry order.
    ///
    /// `elapsed_seconds` is accepted for the tick signature only.
    pub fn on_tick(&self, registry: &mut NpcRegistry, _elapsed_seconds: f32) -> Vec<String> {
        let dead = registry.dead();

        for name in &dead {
            info!(npc = %name, "Reviving NPC automatically");
            registry.revive(name, self.revive_health);
        }

        dead
    }
}

impl Default for HealthReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_REVIVE_HEALTH)
    }
}
