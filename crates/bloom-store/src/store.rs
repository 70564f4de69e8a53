//! The observable cart store.

use crate::notify::Notifier;
use crate::sync::SyncQueue;
use bloom_api::{ApiError, CartBackend};
use bloom_commerce::cart::{Cart, CartItem, CartTotals};
use bloom_commerce::catalog::ProductSnapshot;
use bloom_commerce::error::CommerceError;
use bloom_commerce::ids::LineItemId;
use bloom_commerce::money::Money;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, warn};

/// The cart as subscribers see it: the lines plus their derived totals,
/// published as one value per mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

struct Inner {
    cart: Mutex<Cart>,
    snapshot_tx: watch::Sender<CartSnapshot>,
    notifier: Notifier,
    backend: Option<Arc<dyn CartBackend>>,
    sync: Option<SyncQueue>,
}

/// Shared handle to a shopper's cart.
///
/// Mutations are synchronous against in-memory state; when the store is
/// backed by a remote cart, each mutation also schedules a non-blocking
/// push of the new snapshot. Push failures never reach the mutating
/// caller; they surface on the notice channel, and local state stays
/// authoritative.
///
/// Stores are plain values: construct as many independent ones as you
/// need and hand clones of the handle to whoever mutates or observes.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    /// A local-only store, for guests and tests.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A store that mirrors every mutation to the remote cart. Spawns
    /// the sync worker, so this must be called within a Tokio runtime.
    pub fn synced(backend: Arc<dyn CartBackend>) -> Self {
        Self::build(Some(backend))
    }

    fn build(backend: Option<Arc<dyn CartBackend>>) -> Self {
        let notifier = Notifier::new();
        let sync = backend
            .as_ref()
            .map(|backend| SyncQueue::spawn(backend.clone(), notifier.clone()));
        let (snapshot_tx, _) = watch::channel(CartSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                cart: Mutex::new(Cart::new()),
                snapshot_tx,
                notifier,
                backend,
                sync,
            }),
        }
    }

    fn cart(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the current state to subscribers; returns the snapshot so
    /// the caller can schedule a sync from it.
    fn publish(&self, cart: &Cart) -> CartSnapshot {
        let totals = cart.totals().unwrap_or_else(|err| {
            error!(error = %err, "cart totals overflowed");
            CartTotals::default()
        });
        let snapshot = CartSnapshot {
            items: cart.items().cloned().collect(),
            totals,
        };
        self.inner.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn schedule_sync(&self, items: Vec<CartItem>) {
        if let Some(sync) = &self.inner.sync {
            sync.schedule(items);
        }
    }

    /// Add a product, merging into an existing line for the same product.
    pub fn add_item(
        &self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<LineItemId, CommerceError> {
        let (id, snapshot) = {
            let mut cart = self.cart();
            let id = cart.add_item(product, quantity)?;
            (id, self.publish(&cart))
        };
        self.schedule_sync(snapshot.items);
        Ok(id)
    }

    /// Remove a line. Unknown ids are a no-op and schedule nothing.
    pub fn remove_item(&self, line_id: &LineItemId) -> bool {
        let snapshot = {
            let mut cart = self.cart();
            if !cart.remove_item(line_id) {
                return false;
            }
            self.publish(&cart)
        };
        self.schedule_sync(snapshot.items);
        true
    }

    /// Set the quantity of a line. Zero is rejected; removal is its own
    /// operation. Returns `false` when the line id is unknown.
    pub fn update_quantity(
        &self,
        line_id: &LineItemId,
        quantity: u32,
    ) -> Result<bool, CommerceError> {
        let snapshot = {
            let mut cart = self.cart();
            if !cart.update_quantity(line_id, quantity)? {
                return Ok(false);
            }
            self.publish(&cart)
        };
        self.schedule_sync(snapshot.items);
        Ok(true)
    }

    /// Empty the cart locally. Used on logout: no push is scheduled, the
    /// server copy is either already synced or intentionally abandoned.
    pub fn clear(&self) {
        let mut cart = self.cart();
        cart.clear();
        self.publish(&cart);
    }

    /// Replace local state wholesale with the server's cart. Called once
    /// at session start for a signed-in shopper. On failure the local
    /// cart is left untouched and a notice is published.
    pub async fn hydrate(&self) -> Result<(), ApiError> {
        let backend = match &self.inner.backend {
            Some(backend) => backend.clone(),
            None => {
                debug!("hydrate on a local-only store is a no-op");
                return Ok(());
            }
        };
        match backend.fetch_cart().await {
            Ok(items) => {
                debug!(items = items.len(), "hydrated cart from backend");
                let mut cart = self.cart();
                *cart = Cart::from_items(items);
                self.publish(&cart);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "cart hydration failed");
                self.inner
                    .notifier
                    .error(format!("Could not load your saved cart: {}", err));
                Err(err)
            }
        }
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u32 {
        self.cart().total_items()
    }

    /// Sum of price × quantity across all lines.
    pub fn total_amount(&self) -> Result<Money, CommerceError> {
        self.cart().total_amount()
    }

    /// Both totals in one pass.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        self.cart().totals()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart().is_empty()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Watch the cart. The receiver holds the latest snapshot and wakes
    /// on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Subscribe to user-facing notices (sync failures, order results).
    pub fn notices(&self) -> broadcast::Receiver<crate::notify::Notice> {
        self.inner.notifier.subscribe()
    }

    pub(crate) fn notifier(&self) -> Notifier {
        self.inner.notifier.clone()
    }

    /// Wait until every scheduled push has been attempted. Useful before
    /// logout and in tests; a local-only store returns immediately.
    pub async fn sync_settled(&self) {
        if let Some(sync) = &self.inner.sync {
            sync.settled().await;
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::MockCartBackend;
    use bloom_commerce::catalog::{Category, FlowerType};

    fn product(id: &str, price: i64) -> ProductSnapshot {
        ProductSnapshot::new(
            id,
            format!("Bouquet {}", id),
            Money::new(price),
            Category::Birthday,
            FlowerType::Rose,
        )
    }

    #[test]
    fn test_add_merges_and_totals_follow() {
        let store = CartStore::new();
        store.add_item(product("a", 450_000), 1).unwrap();
        store.add_item(product("a", 450_000), 2).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 3);
        assert_eq!(snapshot.totals.total_amount, Money::new(1_350_000));
        assert_eq!(store.total_items(), 3);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let store = CartStore::new();
        store.add_item(product("a", 450_000), 2).unwrap();
        let before = store.snapshot();

        assert!(!store.remove_item(&LineItemId::new("missing")));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_clear_empties_and_zeroes() {
        let store = CartStore::new();
        store.add_item(product("a", 450_000), 2).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.total_amount().unwrap(), Money::zero());
        assert!(store.snapshot().totals.is_empty());
    }

    #[test]
    fn test_stores_are_independent() {
        let a = CartStore::new();
        let b = CartStore::new();
        a.add_item(product("a", 450_000), 1).unwrap();

        assert_eq!(a.total_items(), 1);
        assert_eq!(b.total_items(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_sees_every_mutation() {
        let store = CartStore::new();
        let mut rx = store.subscribe();

        let line = store.add_item(product("a", 450_000), 1).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().totals.total_amount, Money::new(450_000));

        store.update_quantity(&line, 4).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().totals.total_amount,
            Money::new(1_800_000)
        );
    }

    #[tokio::test]
    async fn test_mutation_burst_coalesces_into_one_push() {
        let backend = Arc::new(MockCartBackend::new());
        let store = CartStore::synced(backend.clone());

        // No await between mutations: the worker only wakes afterwards
        // and pushes the final snapshot once.
        store.add_item(product("a", 450_000), 1).unwrap();
        store.add_item(product("b", 250_000), 1).unwrap();
        store.add_item(product("a", 450_000), 2).unwrap();
        store.sync_settled().await;

        let pushes = backend.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].len(), 2);
        assert_eq!(pushes[0][0].quantity, 3);
    }

    #[tokio::test]
    async fn test_push_in_flight_still_converges() {
        let backend = Arc::new(MockCartBackend::gated());
        let store = CartStore::synced(backend.clone());

        store.add_item(product("a", 450_000), 1).unwrap();
        // Let the worker start the first push; it blocks in the gate
        // with only product a on board.
        tokio::task::yield_now().await;
        store.add_item(product("b", 250_000), 1).unwrap();

        backend.release(2);
        store.sync_settled().await;

        // First push carried the stale snapshot, the trailing push the
        // final one: the backend converges on both items.
        let pushes = backend.pushes();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].len(), 1);
        assert_eq!(pushes[1].len(), 2);
    }

    #[tokio::test]
    async fn test_clear_schedules_no_push() {
        let backend = Arc::new(MockCartBackend::new());
        let store = CartStore::synced(backend.clone());

        store.add_item(product("a", 450_000), 1).unwrap();
        store.sync_settled().await;
        assert_eq!(backend.pushes().len(), 1);

        store.clear();
        store.sync_settled().await;
        assert_eq!(backend.pushes().len(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_replaces_local_state() -> anyhow::Result<()> {
        let backend = Arc::new(MockCartBackend::new());
        backend.set_server_cart(vec![CartItem::new(product("saved", 250_000), 2)]);
        let store = CartStore::synced(backend.clone());

        store.hydrate().await?;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].product.id.as_str(), "saved");
        assert_eq!(snapshot.totals.total_amount, Money::new(500_000));
        // Hydration reads, it does not write back.
        assert!(backend.pushes().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_hydrate_failure_keeps_local_and_notifies() {
        let backend = Arc::new(MockCartBackend::new());
        let store = CartStore::synced(backend);
        store.add_item(product("a", 450_000), 1).unwrap();
        let mut notices = store.notices();

        assert!(store.hydrate().await.is_err());

        assert_eq!(store.total_items(), 1);
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_sync_failure_never_reaches_the_mutating_caller() {
        let backend = Arc::new(MockCartBackend::new());
        backend.fail_pushes(true);
        let store = CartStore::synced(backend);
        let mut notices = store.notices();

        // The mutation itself succeeds.
        store.add_item(product("a", 450_000), 1).unwrap();
        store.sync_settled().await;

        assert_eq!(store.total_items(), 1);
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Error);
    }
}
