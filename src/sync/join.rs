use super::SyncLine;
use crate::host::{ClientId, Host};
use crate::registry::{Record, StateRegistry};
use tracing::debug;

/// Push every record to a newly joined client, in registry order.
///
/// Only `client` is contacted. Returns the number of lines sent.
pub fn sync_to_client<V, H>(registry: &StateRegistry<V>, host: &H, client: &ClientId) -> usize
where
    V: SyncLine + Record,
    H: Host + ?Sized,
{
    let records = registry.all();

    for (key, value) in &records {
        host.send_to_one(client, &V::join_line(key, value));
        debug!(client = %client, key = %key, "Synced record to client");
    }

    records.len()
}
