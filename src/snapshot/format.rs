use super::SnapshotFormat;
use crate::registry::StateRegistry;
use crate::state::{MissionStatus, NpcState, Position};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Missions persist as one JSON object: mission name -> status
pub struct MissionFormat;

impl SnapshotFormat for MissionFormat {
    type Value = MissionStatus;

    const KIND: &'static str = "missions";

    fn encode(registry: &StateRegistry<MissionStatus>) -> serde_json::Result<String> {
        let map: IndexMap<String, MissionStatus> = registry.all().into_iter().collect();
        serde_json::to_string_pretty(&map)
    }

    fn decode(text: &str) -> serde_json::Result<StateRegistry<MissionStatus>> {
        // A literal `null` is an empty snapshot
        let map: Option<IndexMap<String, MissionStatus>> = serde_json::from_str(text)?;
        Ok(map.unwrap_or_default().into_iter().collect())
    }

    fn bootstrap() -> (String, MissionStatus) {
        ("Default Mission".to_string(), MissionStatus::new("Not Started"))
    }
}

/// One element of the persisted NPC list.
///
/// The PascalCase aliases accept snapshots written by the older plugin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcRecord {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Health")]
    pub health: f32,
    #[serde(alias = "Position")]
    pub position: Position,
    #[serde(alias = "IsAlive")]
    pub alive: bool,
}

impl NpcRecord {
    pub fn new(name: impl Into<String>, npc: NpcState) -> Self {
        Self {
            name: name.into(),
            health: npc.health,
            position: npc.position,
            alive: npc.alive,
        }
    }

    pub fn into_entry(self) -> (String, NpcState) {
        let npc = NpcState {
            health: self.health,
            alive: self.alive,
            position: self.position,
        };
        (self.name, npc.normalized())
    }
}

/// NPCs persist as an ordered JSON array of records
pub struct NpcFormat;

impl SnapshotFormat for NpcFormat {
    type Value = NpcState;

    const KIND: &'static str = "npcs";

    fn encode(registry: &StateRegistry<NpcState>) -> serde_json::Result<String> {
        let records: Vec<NpcRecord> = registry
            .all()
            .into_iter()
            .map(|(name, npc)| NpcRecord::new(name, npc))
            .collect();
        serde_json::to_string_pretty(&records)
    }

    fn decode(text: &str) -> serde_json::Result<StateRegistry<NpcState>> {
        let records: Option<Vec<NpcRecord>> = serde_json::from_str(text)?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(NpcRecord::into_entry)
            .collect())
    }

    fn bootstrap() -> (String, NpcState) {
        (
            "Default Goblin".to_string(),
            NpcState::spawn(100.0, Position::new(0.0, 0.0, 0.0)),
        )
    }
}
