use super::*;

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}

#[test]
fn test_send_to_one_reaches_only_target() {
    let hub = ClientHub::new();
    let alice = ClientId::new();
    let bob = ClientId::new();
    let mut alice_rx = hub.register(alice);
    let mut bob_rx = hub.register(bob);

    hub.send_to_one(&alice, "hello");

    assert_eq!(drain(&mut alice_rx), vec!["hello"]);
    assert!(drain(&mut bob_rx).is_empty());
}

#[test]
fn test_send_to_all_reaches_every_client_once() {
    let hub = ClientHub::new();
    let mut receivers: Vec<_> = (0..3).map(|_| hub.register(ClientId::new())).collect();

    hub.send_to_all("tick");

    for rx in receivers.iter_mut() {
        assert_eq!(drain(rx), vec!["tick"]);
    }
}

#[test]
fn test_removed_client_gets_nothing() {
    let hub = ClientHub::new();
    let alice = ClientId::new();
    let mut alice_rx = hub.register(alice);

    assert!(hub.remove(&alice));
    assert!(!hub.contains(&alice));
    hub.send_to_all("gone");
    hub.send_to_one(&alice, "gone");

    assert!(drain(&mut alice_rx).is_empty());
    assert!(hub.is_empty());
}

#[test]
fn test_closed_receiver_does_not_break_broadcast() {
    let hub = ClientHub::new();
    let dropped = ClientId::new();
    drop(hub.register(dropped));
    let mut live_rx = hub.register(ClientId::new());

    hub.send_to_all("still here");

    assert_eq!(drain(&mut live_rx), vec!["still here"]);
    assert_eq!(hub.len(), 2);
}

#[test]
fn test_client_id_display_is_short() {
    let id = ClientId::new();
    assert_eq!(id.to_string().len(), 8);
    assert_ne!(id, ClientId::new());
}
