//! Checkout submission and order lifecycle calls.

use crate::notify::Notifier;
use crate::store::CartStore;
use bloom_api::{ApiError, OrderBackend};
use bloom_commerce::cart::Cart;
use bloom_commerce::checkout::{
    CustomerInfo, Order, OrderConfirmation, OrderDraft, OrderStatus, PaymentMethod,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Drives a shopper's checkout against the order backend.
///
/// A submission snapshots the cart into an [`OrderDraft`], so later cart
/// mutations never leak into it. The draft is held until it succeeds:
/// retrying after a failure reuses the same draft, and with it the same
/// idempotency key, so the backend can deduplicate instead of creating
/// a second order. Editing anything (items, contact details, payment)
/// makes it a new attempt with a fresh key.
///
/// The cart is deliberately not cleared on success; the shopper keeps it
/// until they empty it themselves.
pub struct CheckoutSession {
    store: CartStore,
    orders: Arc<dyn OrderBackend>,
    notifier: Notifier,
    attempt: Mutex<Option<OrderDraft>>,
}

impl CheckoutSession {
    pub fn new(store: CartStore, orders: Arc<dyn OrderBackend>) -> Self {
        let notifier = store.notifier();
        Self {
            store,
            orders,
            notifier,
            attempt: Mutex::new(None),
        }
    }

    /// Submit the current cart as an order.
    ///
    /// Validation failures (empty cart, missing contact fields, total
    /// mismatch) are caught before any network call. On backend failure
    /// the cart is intact and the attempt can be retried as-is.
    pub async fn submit(
        &self,
        customer_info: CustomerInfo,
        payment_method: PaymentMethod,
    ) -> Result<OrderConfirmation, ApiError> {
        let snapshot = Cart::from_items(self.store.snapshot().items);
        let fresh = OrderDraft::from_cart(&snapshot, customer_info, payment_method)?;
        let draft = self.resume_or_start(fresh);
        draft.validate()?;

        match self.orders.create_order(&draft).await {
            Ok(confirmation) => {
                self.take_attempt();
                info!(order_number = %confirmation.order_number, "order placed");
                self.notifier
                    .info(format!("Order {} placed", confirmation.order_number));
                Ok(confirmation)
            }
            Err(err) => {
                warn!(error = %err, "order submission failed");
                self.notifier
                    .error(format!("Order submission failed: {}", err));
                Err(err)
            }
        }
    }

    /// Request a status change, rejecting locally what the server would
    /// reject anyway. Server-side rejections come back verbatim.
    pub async fn update_status(&self, order: &Order, next: OrderStatus) -> Result<(), ApiError> {
        order.status.transition_to(next)?;
        self.orders.update_order_status(&order.id, next).await
    }

    /// The signed-in shopper's order history.
    pub async fn history(&self) -> Result<Vec<Order>, ApiError> {
        self.orders.my_orders().await
    }

    /// Reuse the held draft when `fresh` describes the same attempt,
    /// otherwise start over with the fresh one (and its fresh key).
    fn resume_or_start(&self, fresh: OrderDraft) -> OrderDraft {
        let mut slot = self
            .attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some(held) if same_attempt(&held, &fresh) => {
                *slot = Some(held.clone());
                held
            }
            _ => {
                *slot = Some(fresh.clone());
                fresh
            }
        }
    }

    fn take_attempt(&self) {
        self.attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Two drafts describe the same checkout attempt when everything but the
/// idempotency key matches.
fn same_attempt(held: &OrderDraft, fresh: &OrderDraft) -> bool {
    held.customer_info == fresh.customer_info
        && held.payment_method == fresh.payment_method
        && held.items == fresh.items
        && held.total_amount == fresh.total_amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::testing::MockOrderBackend;
    use bloom_commerce::catalog::{Category, FlowerType, ProductSnapshot};
    use bloom_commerce::error::CommerceError;
    use bloom_commerce::ids::OrderId;
    use bloom_commerce::money::Money;

    fn product(id: &str, price: i64) -> ProductSnapshot {
        ProductSnapshot::new(
            id,
            format!("Bouquet {}", id),
            Money::new(price),
            Category::Gift,
            FlowerType::Lily,
        )
    }

    fn contact() -> CustomerInfo {
        CustomerInfo::new("Lan Nguyen", "0901234567")
    }

    fn session_with_cart() -> (CheckoutSession, Arc<MockOrderBackend>, CartStore) {
        let store = CartStore::new();
        store.add_item(product("a", 450_000), 2).unwrap();
        let backend = Arc::new(MockOrderBackend::new());
        let session = CheckoutSession::new(store.clone(), backend.clone());
        (session, backend, store)
    }

    fn order_with_status(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("o1"),
            order_number: "DH000001".into(),
            status,
            total_amount: Money::new(900_000),
            created_at: "2025-06-01T09:30:00Z".into(),
            updated_at: None,
            payment_method: Some(PaymentMethod::Cod),
            customer_name: None,
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_order_with_item_sum() {
        let (session, backend, store) = session_with_cart();
        let mut notices = store.notices();

        let confirmation = session.submit(contact(), PaymentMethod::Cod).await.unwrap();
        assert_eq!(confirmation.order_number, "DH000001");

        let drafts = backend.drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].total_amount, Money::new(900_000));
        assert_eq!(drafts[0].payment_method, PaymentMethod::Cod);
        assert_eq!(drafts[0].items[0].quantity, 2);

        // The cart survives a successful checkout.
        assert_eq!(store.total_items(), 2);
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn test_retry_after_failure_reuses_idempotency_key() {
        let (session, backend, store) = session_with_cart();
        let mut notices = store.notices();

        backend.fail_next();
        assert!(session.submit(contact(), PaymentMethod::Cod).await.is_err());
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Error);

        session.submit(contact(), PaymentMethod::Cod).await.unwrap();

        let drafts = backend.drafts();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].idempotency_key, drafts[1].idempotency_key);
    }

    #[tokio::test]
    async fn test_edited_attempt_gets_a_fresh_key() {
        let (session, backend, _store) = session_with_cart();

        backend.fail_next();
        assert!(session.submit(contact(), PaymentMethod::Cod).await.is_err());

        // The shopper fixes their phone number before retrying: that is
        // a new attempt, not a retry of the old one.
        let edited = CustomerInfo::new("Lan Nguyen", "0909999999");
        session.submit(edited, PaymentMethod::Cod).await.unwrap();

        let drafts = backend.drafts();
        assert_eq!(drafts.len(), 2);
        assert_ne!(drafts[0].idempotency_key, drafts[1].idempotency_key);
    }

    #[tokio::test]
    async fn test_resubmission_after_success_is_a_new_order() {
        let (session, backend, _store) = session_with_cart();

        let first = session.submit(contact(), PaymentMethod::Cod).await.unwrap();
        let second = session.submit(contact(), PaymentMethod::Cod).await.unwrap();

        assert_ne!(first.order_number, second.order_number);
        let drafts = backend.drafts();
        assert_ne!(drafts[0].idempotency_key, drafts[1].idempotency_key);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_network() {
        let store = CartStore::new();
        let backend = Arc::new(MockOrderBackend::new());
        let session = CheckoutSession::new(store, backend.clone());

        let err = session.submit(contact(), PaymentMethod::Bank).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(CommerceError::EmptyCart)));
        assert!(backend.drafts().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_walks_the_lifecycle() {
        let (session, backend, _store) = session_with_cart();

        session
            .update_status(&order_with_status(OrderStatus::Pending), OrderStatus::Completed)
            .await
            .unwrap();

        let updates = backend.status_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_terminal_status_rejected_without_a_request() {
        let (session, backend, _store) = session_with_cart();

        let err = session
            .update_status(&order_with_status(OrderStatus::Completed), OrderStatus::Processing)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Invalid(CommerceError::InvalidStatusTransition { .. })
        ));
        assert!(backend.status_updates().is_empty());
    }

    #[tokio::test]
    async fn test_history_passthrough() -> anyhow::Result<()> {
        let (session, backend, _store) = session_with_cart();
        backend.set_orders(vec![order_with_status(OrderStatus::Processing)]);

        let orders = session.history().await?;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Processing);
        Ok(())
    }
}
