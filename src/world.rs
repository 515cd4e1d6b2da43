use crate::command::{parse_command, Command};
use crate::config::WorldSyncConfig;
use crate::error::StoreError;
use crate::host::{ClientId, Host};
use crate::reconcile::HealthReconciler;
use crate::snapshot::{LoadOutcome, MissionFormat, NpcFormat, SnapshotStore};
use crate::state::{MissionRegistry, MissionStatus, NpcRegistry, NpcState};
use crate::sync::{self, SyncLine};
use tracing::{debug, error, info, warn};


/// Shared world state: missions, NPCs and the host they replicate to.
///
/// Owned by a single task; every operation runs to completion, file I/O
/// included, before the next host event is handled.
pub struct WorldSync<H> {
    host: H,
    missions: MissionRegistry,
    npcs: NpcRegistry,
    mission_store: SnapshotStore<MissionFormat>,
    npc_store: SnapshotStore<NpcFormat>,
    reconciler: HealthReconciler,
    // Set while a registry still stands in for a snapshot that failed to
    // load; save_all leaves that file alone until the registry is written.
    missions_unsaved_after_failure: bool,
    npcs_unsaved_after_failure: bool,
}

impl<H: Host> WorldSync<H> {
    /// Load both registries from their stores (bootstrapping if needed)
    pub fn new(
        host: H,
        mission_store: SnapshotStore<MissionFormat>,
        npc_store: SnapshotStore<NpcFormat>,
        reconciler: HealthReconciler,
    ) -> Self {
        let (missions, missions_outcome) = mission_store.load_with_outcome();
        let (npcs, npcs_outcome) = npc_store.load_with_outcome();

        info!(
            missions = missions.len(),
            npcs = npcs.len(),
            "World state initialized"
        );

        Self {
            host,
            missions,
            npcs,
            mission_store,
            npc_store,
            reconciler,
            missions_unsaved_after_failure: missions_outcome == LoadOutcome::Failed,
            npcs_unsaved_after_failure: npcs_outcome == LoadOutcome::Failed,
        }
    }

    pub fn from_config(host: H, config: &WorldSyncConfig) -> Self {
        Self::new(
            host,
            SnapshotStore::new(config.storage.missions_path()),
            SnapshotStore::new(config.storage.npcs_path()),
            HealthReconciler::new(config.npc.revive_health),
        )
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn missions(&self) -> &MissionRegistry {
        &self.missions
    }

    pub fn npcs(&self) -> &NpcRegistry {
        &self.npcs
    }

    /// Catch a new client up on every mission, then every NPC.
    ///
    /// Returns the number of lines sent to that client.
    pub fn on_client_joined(&self, client: &ClientId) -> usize {
        info!(client = %client, "Client joined, syncing world state");

        let missions = sync::sync_to_client(&self.missions, &self.host, client);
        let npcs = sync::sync_to_client(&self.npcs, &self.host, client);

        debug!(client = %client, missions, npcs, "Join sync complete");
        missions + npcs
    }

    /// Run the per-tick reconciliation; returns the NPCs revived
    pub fn on_tick(&mut self, elapsed_seconds: f32) -> Vec<String> {
        self.reconciler.on_tick(&mut self.npcs, elapsed_seconds)
    }

    /// Handle one chat line; returns `true` when the line was a command and
    /// must not propagate further.
    pub fn on_chat_message(&mut self, client: &ClientId, text: &str) -> bool {
        let command = match parse_command(text) {
            None => return false,
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                debug!(client = %client, error = %e, "Malformed command");
                self.host.send_to_one(client, &e.to_string());
                return true;
            }
        };

        match command {
            Command::NpcStatus => {
                info!(client = %client, "Client requested NPC status");
                for (name, npc) in self.npcs.all() {
                    self.host
                        .send_to_one(client, &NpcState::update_line(&name, &npc));
                }
            }
            Command::DumpNpcs => {
                info!(client = %client, "Client requested NPC dump");
                if let Err(e) = self.dump_npcs() {
                    error!(error = %e, "Failed to dump NPC data");
                }
                let file_name = self
                    .npc_store
                    .path()
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.host.send_to_one(
                    client,
                    &format!("NPC data has been dumped to {}.", file_name),
                );
            }
            Command::Missions => {
                sync::sync_to_client(&self.missions, &self.host, client);
            }
            Command::SetMission { name, status } => {
                self.update_mission(&name, MissionStatus::new(status));
            }
            Command::Damage { name, amount } => {
                self.damage_npc(&name, amount);
            }
            Command::Revive { name } => {
                self.revive_npc(&name);
            }
        }

        true
    }

    /// Set a mission's status and broadcast it to every client
    pub fn update_mission(&mut self, name: &str, status: MissionStatus) -> Option<MissionStatus> {
        info!(mission = %name, status = %status, "Updating mission state");
        self.missions_unsaved_after_failure = false;
        sync::broadcast_update(&mut self.missions, &self.host, name, status)
    }

    /// Damage an NPC and, if it took the hit, broadcast its new state.
    ///
    /// Unknown or dead NPCs are ignored.
    pub fn damage_npc(&mut self, name: &str, amount: f32) -> Option<NpcState> {
        let npc = self.npcs.damage(name, amount);
        match npc {
            Some(_) => {
                self.npcs_unsaved_after_failure = false;
                sync::announce(&self.npcs, &self.host, name);
            }
            None => debug!(npc = %name, "Damage ignored, NPC unknown or dead"),
        }
        npc
    }

    /// Revive a dead NPC and broadcast its new state.
    ///
    /// Unknown or living NPCs are ignored.
    pub fn revive_npc(&mut self, name: &str) -> Option<NpcState> {
        let npc = self.npcs.revive(name, self.reconciler.revive_health());
        if npc.is_some() {
            self.npcs_unsaved_after_failure = false;
            sync::announce(&self.npcs, &self.host, name);
        }
        npc
    }

    /// Persist the NPC registry now, even over a snapshot that failed to
    /// load
    pub fn dump_npcs(&mut self) -> Result<(), StoreError> {
        self.npc_store.save(&self.npcs)?;
        self.npcs_unsaved_after_failure = false;
        Ok(())
    }

    /// Persist both registries; the first failure is returned after both
    /// writes were attempted.
    ///
    /// A registry whose snapshot failed to load and that has not been
    /// written to since is skipped, leaving the file on disk untouched.
    pub fn save_all(&self) -> Result<(), StoreError> {
        let missions = if self.missions_unsaved_after_failure {
            warn!(
                path = %self.mission_store.path().display(),
                "Mission snapshot failed to load and was never replaced, not saving"
            );
            Ok(())
        } else {
            self.mission_store.save(&self.missions)
        };

        let npcs = if self.npcs_unsaved_after_failure {
            warn!(
                path = %self.npc_store.path().display(),
                "NPC snapshot failed to load and was never replaced, not saving"
            );
            Ok(())
        } else {
            self.npc_store.save(&self.npcs)
        };

        missions.and(npcs)
    }
}
