//! Background writer that mirrors cart snapshots to the repository.
//!
//! Snapshots arrive on a watch channel, so a burst of mutations collapses into
//! a single write of the newest state. Saves run one at a time, in order.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::models::CartItem;
use crate::observability::StoreMetrics;
use crate::repositories::CartRepository;

/// A published cart state. Version 0 is the initial, never-saved state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub version: u64,
    pub items: Arc<Vec<CartItem>>,
}

/// Start the writer task.
///
/// Reports each handled version on `settled`, whether the save succeeded or
/// not. Exits once every snapshot sender has been dropped.
pub fn spawn_persister(
    repository: Arc<dyn CartRepository>,
    metrics: Arc<StoreMetrics>,
    mut snapshots: watch::Receiver<Snapshot>,
    settled: watch::Sender<u64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();

            let started = Instant::now();
            let result = repository.save_products(&snapshot.items).await;
            let elapsed = started.elapsed().as_secs_f64();

            match result {
                Ok(()) => {
                    metrics.record_storage_operation("save", true, elapsed);
                    debug!(
                        version = snapshot.version,
                        items = snapshot.items.len(),
                        "Cart persisted"
                    );
                }
                Err(e) => {
                    // In-memory state stays authoritative
                    metrics.record_storage_operation("save", false, elapsed);
                    error!(version = snapshot.version, "Failed to persist cart: {}", e);
                }
            }

            settled.send_replace(snapshot.version);
        }
        debug!("Cart persister stopped");
    })
}
