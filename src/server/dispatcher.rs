use crate::host::{Host, HostEvent};
use crate::world::WorldSync;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Apply one host event to the world.
///
/// Chat lines that are not commands are relayed to every client.
pub fn handle_event<H: Host>(world: &mut WorldSync<H>, event: HostEvent) {
    match event {
        HostEvent::ClientJoined(client) => {
            world.on_client_joined(&client);
        }
        HostEvent::ClientLeft(client) => {
            info!(client = %client, "Client left");
        }
        HostEvent::Chat { client, text } => {
            if !world.on_chat_message(&client, &text) {
                world.host().send_to_all(&format!("{}: {}", client, text));
            }
        }
        HostEvent::Tick { elapsed_seconds } => {
            let revived = world.on_tick(elapsed_seconds);
            if !revived.is_empty() {
                debug!(count = revived.len(), "Tick revived NPCs");
            }
        }
    }
}

/// Own the world and drain host events until shutdown.
///
/// This task is the only writer: joins, chat commands and ticks are applied
/// one at a time in arrival order. Returns the world when `shutdown` fires
/// or every event sender is gone, so the caller can persist it.
pub async fn run_dispatcher<H: Host>(
    mut world: WorldSync<H>,
    mut events: mpsc::Receiver<HostEvent>,
    tick_interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> WorldSync<H> {
    let mut ticker = interval(tick_interval.max(Duration::from_millis(1)));

    // Skip missed ticks to prevent backlog when a save stalls the loop
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_tick = Instant::now();

    info!(
        tick_ms = tick_interval.as_millis() as u64,
        "Dispatcher started"
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) => handle_event(&mut world, event),
                    None => {
                        info!("All event senders closed, stopping dispatcher");
                        break;
                    }
                }
            }

            now = ticker.tick() => {
                let elapsed_seconds = now.duration_since(last_tick).as_secs_f32();
                last_tick = now;
                handle_event(&mut world, HostEvent::Tick { elapsed_seconds });
            }

            _ = &mut shutdown => {
                info!("Shutdown signalled, stopping dispatcher");
                break;
            }
        }
    }

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ClientHub, ClientId};
    use crate::reconcile::HealthReconciler;
    use crate::snapshot::SnapshotStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn world(temp_dir: &TempDir) -> WorldSync<Arc<ClientHub>> {
        WorldSync::new(
            Arc::new(ClientHub::new()),
            SnapshotStore::new(temp_dir.path().join("missions.json")),
            SnapshotStore::new(temp_dir.path().join("npcs.json")),
            HealthReconciler::default(),
        )
    }

    #[test]
    fn test_plain_chat_is_relayed_to_everyone() {
        let temp_dir = TempDir::new().unwrap();
        let mut world = world(&temp_dir);
        let speaker = ClientId::new();
        let mut speaker_rx = world.host().register(speaker);
        let mut listener_rx = world.host().register(ClientId::new());

        handle_event(
            &mut world,
            HostEvent::Chat {
                client: speaker,
                text: "hi all".to_string(),
            },
        );

        let expected = format!("{}: hi all", speaker);
        assert_eq!(speaker_rx.try_recv().unwrap(), expected);
        assert_eq!(listener_rx.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_command_chat_is_not_relayed() {
        let temp_dir = TempDir::new().unwrap();
        let mut world = world(&temp_dir);
        let speaker = ClientId::new();
        world.host().register(speaker);
        let mut listener_rx = world.host().register(ClientId::new());

        handle_event(
            &mut world,
            HostEvent::Chat {
                client: speaker,
                text: "/npcstatus".to_string(),
            },
        );

        assert!(listener_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatcher_applies_events_in_order_and_returns_world() {
        let temp_dir = TempDir::new().unwrap();
        let world = world(&temp_dir);
        let hub = Arc::clone(world.host());
        let client = ClientId::new();
        let mut rx = hub.register(client);

        let (events_tx, events_rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_dispatcher(
            world,
            events_rx,
            Duration::from_secs(3600),
            shutdown_rx,
        ));

        events_tx.send(HostEvent::ClientJoined(client)).await.unwrap();
        events_tx
            .send(HostEvent::Chat {
                client,
                text: "/damage Default Goblin 100".to_string(),
            })
            .await
            .unwrap();
        events_tx
            .send(HostEvent::Tick { elapsed_seconds: 0.1 })
            .await
            .unwrap();
        drop(events_tx);

        let world = task.await.unwrap();

        assert!(world.npcs().get("Default Goblin").unwrap().alive);
        assert_eq!(
            rx.recv().await.unwrap(),
            "Mission: Default Mission, State: Not Started"
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            "NPC Default Goblin - Health: 100, Position: (0, 0, 0)"
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            "NPC Default Goblin - Health: 0, Alive: false, Position: (0, 0, 0)"
        );
    }

    #[tokio::test]
    async fn test_dispatcher_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let (_events_tx, events_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_dispatcher(
            world(&temp_dir),
            events_rx,
            Duration::from_millis(10),
            shutdown_rx,
        ));

        shutdown_tx.send(()).unwrap();
        let world = task.await.unwrap();

        assert_eq!(world.missions().len(), 1);
    }
}
