use super::SyncLine;
use crate::host::Host;
use crate::registry::{Record, StateRegistry};
use tracing::info;

/// Write a record and push the new value to every connected client.
///
/// The push is unconditional: it fires even when the value did not change.
/// Returns the replaced value, if any.
pub fn broadcast_update<V, H>(
    registry: &mut StateRegistry<V>,
    host: &H,
    key: &str,
    value: V,
) -> Option<V>
where
    V: SyncLine + Record,
    H: Host + ?Sized,
{
    let line = V::update_line(key, &value);
    let previous = registry.upsert(key, value);

    info!(key = %key, "Record updated, broadcasting");
    host.send_to_all(&line);

    previous
}

/// Push the current value of an existing record to every client.
///
/// Unknown keys are ignored and `false` is returned.
pub fn announce<V, H>(registry: &StateRegistry<V>, host: &H, key: &str) -> bool
where
    V: SyncLine + Record,
    H: Host + ?Sized,
{
    match registry.get(key) {
        Some(value) => {
            host.send_to_all(&V::update_line(key, value));
            true
        }
        None => false,
    }
}
