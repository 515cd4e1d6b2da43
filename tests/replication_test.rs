// End-to-end checks of the replication core through the public API:
// bootstrap, restart, join fan-out, broadcast fan-out and auto-revive.

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use worldsync::config::WorldSyncConfig;
use worldsync::host::{ClientHub, ClientId};
use worldsync::state::MissionStatus;
use worldsync::world::WorldSync;

fn config_in(temp_dir: &TempDir) -> WorldSyncConfig {
    let mut config = WorldSyncConfig::default();
    config.storage.directory = temp_dir.path().to_path_buf();
    config
}

fn count(rx: &mut UnboundedReceiver<String>) -> usize {
    let mut n = 0;
    while rx.try_recv().is_ok() {
        n += 1;
    }
    n
}

#[test]
fn test_bootstrap_files_are_stable_across_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);

    let first = WorldSync::from_config(Arc::new(ClientHub::new()), &config);
    let missions_bytes = fs::read(config.storage.missions_path()).unwrap();
    let npcs_bytes = fs::read(config.storage.npcs_path()).unwrap();

    let second = WorldSync::from_config(Arc::new(ClientHub::new()), &config);

    assert_eq!(first.missions(), second.missions());
    assert_eq!(first.npcs(), second.npcs());
    assert_eq!(fs::read(config.storage.missions_path()).unwrap(), missions_bytes);
    assert_eq!(fs::read(config.storage.npcs_path()).unwrap(), npcs_bytes);
}

#[test]
fn test_join_and_broadcast_fan_out() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let hub = Arc::new(ClientHub::new());
    let mut world = WorldSync::from_config(Arc::clone(&hub), &config);

    for name in ["Troll Bridge", "Lost Ring", "Dragon Lair"] {
        world.update_mission(name, MissionStatus::new("Not Started"));
    }

    let clients: Vec<ClientId> = (0..4).map(|_| ClientId::new()).collect();
    let mut receivers: Vec<_> = clients.iter().map(|c| hub.register(*c)).collect();

    // One join: every record to the joiner, nothing to anyone else
    let records = world.missions().len() + world.npcs().len();
    assert_eq!(world.on_client_joined(&clients[0]), records);
    assert_eq!(count(&mut receivers[0]), records);
    for rx in receivers.iter_mut().skip(1) {
        assert_eq!(count(rx), 0);
    }

    // One update: exactly one line per connected client
    world.update_mission("Lost Ring", MissionStatus::new("Complete"));
    for rx in receivers.iter_mut() {
        assert_eq!(count(rx), 1);
    }

    // A disconnected client no longer counts
    hub.remove(&clients[3]);
    world.update_mission("Lost Ring", MissionStatus::new("Complete"));
    for rx in receivers.iter_mut().take(3) {
        assert_eq!(count(rx), 1);
    }
    assert_eq!(count(&mut receivers[3]), 0);
}

#[test]
fn test_no_npc_stays_dead_after_tick() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    fs::create_dir_all(config.storage.npcs_path().parent().unwrap()).unwrap();
    fs::write(
        config.storage.npcs_path(),
        r#"[
            {"name":"Goblin","health":0,"position":"(1, 2, 3)","alive":false},
            {"name":"Troll","health":80,"position":"(0, 0, 0)","alive":true},
            {"name":"Imp","health":3,"position":"(9, 9, 9)","alive":true}
        ]"#,
    )
    .unwrap();

    let mut world = WorldSync::from_config(Arc::new(ClientHub::new()), &config);
    assert_eq!(world.npcs().keys(), vec!["Goblin", "Troll", "Imp"]);

    world.damage_npc("Imp", 10.0);
    let revived = world.on_tick(0.05);

    assert_eq!(revived, vec!["Goblin".to_string(), "Imp".to_string()]);
    assert!(world.npcs().all().iter().all(|(_, npc)| npc.alive));
    assert_eq!(world.npcs().get("Troll").unwrap().health, 80.0);
}
