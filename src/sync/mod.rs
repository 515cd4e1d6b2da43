// Join-time snapshot push and mutation fan-out

mod broadcast;
mod join;

pub use broadcast::{announce, broadcast_update};
pub use join::sync_to_client;

use crate::state::{MissionStatus, NpcState};


/// Text rendering of a record for delivery to clients
pub trait SyncLine {
    /// Line sent to a client catching up after joining
    fn join_line(key: &str, value: &Self) -> String;

    /// Line sent to every client after the record changed
    fn update_line(key: &str, value: &Self) -> String;
}

impl SyncLine for MissionStatus {
    fn join_line(key: &str, value: &Self) -> String {
        format!("Mission: {}, State: {}", key, value)
    }

    fn update_line(key: &str, value: &Self) -> String {
        format!("Mission Updated: {} -> {}", key, value)
    }
}

impl SyncLine for NpcState {
    fn join_line(key: &str, value: &Self) -> String {
        format!(
            "NPC {} - Health: {}, Position: {}",
            key, value.health, value.position
        )
    }

    fn update_line(key: &str, value: &Self) -> String {
        format!(
            "NPC {} - Health: {}, Alive: {}, Position: {}",
            key, value.health, value.alive, value.position
        )
    }
}
