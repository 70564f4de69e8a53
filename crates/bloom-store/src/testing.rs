//! Mock backends shared by the tests in this crate.

use async_trait::async_trait;
use bloom_api::{ApiError, CartBackend, OrderBackend};
use bloom_commerce::cart::CartItem;
use bloom_commerce::checkout::{Order, OrderConfirmation, OrderDraft, OrderStatus};
use bloom_commerce::ids::OrderId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

fn unavailable(what: &str) -> ApiError {
    ApiError::Rejected {
        status: 503,
        message: format!("{} unavailable", what),
    }
}

/// In-memory stand-in for the remote cart endpoint.
///
/// `gated()` makes every push wait for a permit, so a test can hold a
/// push in flight while it keeps mutating the cart.
pub(crate) struct MockCartBackend {
    pushes: Mutex<Vec<Vec<CartItem>>>,
    server_cart: Mutex<Option<Vec<CartItem>>>,
    fail: AtomicBool,
    gate: Option<Semaphore>,
}

impl MockCartBackend {
    pub(crate) fn new() -> Self {
        Self {
            pushes: Mutex::new(Vec::new()),
            server_cart: Mutex::new(None),
            fail: AtomicBool::new(false),
            gate: None,
        }
    }

    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Let `n` gated pushes proceed.
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn fail_pushes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_server_cart(&self, items: Vec<CartItem>) {
        *self.server_cart.lock().unwrap() = Some(items);
    }

    /// Every successful push, oldest first.
    pub(crate) fn pushes(&self) -> Vec<Vec<CartItem>> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CartBackend for MockCartBackend {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.server_cart
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unavailable("cart service"))
    }

    async fn push_cart(&self, items: &[CartItem]) -> Result<(), ApiError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable("cart service"));
        }
        self.pushes.lock().unwrap().push(items.to_vec());
        Ok(())
    }
}

/// In-memory stand-in for the order endpoints.
///
/// Every submission attempt is recorded, including ones told to fail, so
/// tests can compare idempotency keys across retries.
pub(crate) struct MockOrderBackend {
    drafts: Mutex<Vec<OrderDraft>>,
    status_updates: Mutex<Vec<(OrderId, OrderStatus)>>,
    orders: Mutex<Vec<Order>>,
    fail_next: AtomicBool,
    next_number: AtomicU64,
}

impl MockOrderBackend {
    pub(crate) fn new() -> Self {
        Self {
            drafts: Mutex::new(Vec::new()),
            status_updates: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            next_number: AtomicU64::new(1),
        }
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn drafts(&self) -> Vec<OrderDraft> {
        self.drafts.lock().unwrap().clone()
    }

    pub(crate) fn status_updates(&self) -> Vec<(OrderId, OrderStatus)> {
        self.status_updates.lock().unwrap().clone()
    }

    pub(crate) fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock().unwrap() = orders;
    }
}

#[async_trait]
impl OrderBackend for MockOrderBackend {
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderConfirmation, ApiError> {
        self.drafts.lock().unwrap().push(draft.clone());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(unavailable("order service"));
        }
        let n = self.next_number.fetch_add(1, Ordering::SeqCst);
        Ok(OrderConfirmation {
            order_number: format!("DH{:06}", n),
        })
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.status_updates
            .lock()
            .unwrap()
            .push((order_id.clone(), status));
        Ok(())
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.orders.lock().unwrap().clone())
    }
}
