//! Coalescing single-flight cart sync.
//!
//! The backend's cart endpoint is a blind full overwrite, so the only
//! ordering discipline worth having is: at most one push in flight, and
//! every push carries the newest snapshot. Mutations drop their snapshot
//! into a latest-value mailbox; a single worker drains it. A burst of
//! rapid mutations collapses into one push (or one push plus a trailing
//! one if a snapshot lands while a push is in flight), and after the
//! burst settles the backend holds the final local state.

use crate::notify::Notifier;
use bloom_api::CartBackend;
use bloom_commerce::cart::CartItem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct PendingPush {
    seq: u64,
    items: Vec<CartItem>,
}

/// Handle to the sync worker.
///
/// Dropping the handle closes the mailbox and the worker exits on its
/// own; pushes already in flight still complete.
pub(crate) struct SyncQueue {
    pending_tx: watch::Sender<Option<PendingPush>>,
    settled_rx: watch::Receiver<u64>,
    last_seq: AtomicU64,
}

impl SyncQueue {
    /// Spawn the worker task. Must be called within a Tokio runtime.
    pub(crate) fn spawn(backend: Arc<dyn CartBackend>, notifier: Notifier) -> Self {
        let (pending_tx, mut pending_rx) = watch::channel(None::<PendingPush>);
        let (settled_tx, settled_rx) = watch::channel(0_u64);

        tokio::spawn(async move {
            while pending_rx.changed().await.is_ok() {
                let push = match pending_rx.borrow_and_update().clone() {
                    Some(push) => push,
                    None => continue,
                };
                debug!(seq = push.seq, items = push.items.len(), "pushing cart");
                if let Err(err) = backend.push_cart(&push.items).await {
                    // Local state stays authoritative; the shopper keeps
                    // their cart and the next mutation retries the push.
                    warn!(seq = push.seq, error = %err, "cart sync failed");
                    notifier.error(format!("Could not sync your cart: {}", err));
                }
                let _ = settled_tx.send(push.seq);
            }
            debug!("cart sync worker stopped");
        });

        Self {
            pending_tx,
            settled_rx,
            last_seq: AtomicU64::new(0),
        }
    }

    /// Queue a push of the given snapshot, replacing any snapshot still
    /// waiting. Returns immediately.
    pub(crate) fn schedule(&self, items: Vec<CartItem>) -> u64 {
        let seq = self.last_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending_tx.send_replace(Some(PendingPush { seq, items }));
        seq
    }

    /// Wait until every push scheduled so far has been attempted.
    pub(crate) async fn settled(&self) {
        let target = self.last_seq.load(Ordering::Relaxed);
        let mut rx = self.settled_rx.clone();
        let _ = rx.wait_for(|done| *done >= target).await;
    }
}
