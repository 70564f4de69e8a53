//! Order types and the status state machine.

use crate::cart::Cart;
use crate::checkout::CustomerInfo;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Bank transfer.
    Bank,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Bank => "bank",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cod" => Some(PaymentMethod::Cod),
            "bank" => Some(PaymentMethod::Bank),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on delivery",
            PaymentMethod::Bank => "Bank transfer",
        }
    }
}

/// Order status.
///
/// The vocabulary is fixed by the backend; what the client adds is a
/// guarded transition function so an illegal move is rejected before it
/// ever becomes a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, not yet accepted.
    #[default]
    Pending,
    /// Order accepted and being prepared.
    Processing,
    /// Order fulfilled (or bank payment confirmed).
    Completed,
    /// Order cancelled by staff or by the buyer.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if the order can no longer move.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Check whether moving to `next` is a legal transition.
    ///
    /// ```text
    /// pending    -> processing | completed | cancelled
    /// processing -> completed | cancelled
    /// completed, cancelled: terminal
    /// ```
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            OrderStatus::Pending => matches!(
                next,
                OrderStatus::Processing | OrderStatus::Completed | OrderStatus::Cancelled
            ),
            OrderStatus::Processing => {
                matches!(next, OrderStatus::Completed | OrderStatus::Cancelled)
            }
            OrderStatus::Completed | OrderStatus::Cancelled => false,
        }
    }

    /// Guarded transition.
    pub fn transition_to(&self, next: OrderStatus) -> Result<OrderStatus, CommerceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }

    /// Label shown to the buyer.
    ///
    /// A pending COD order is already on its way, a pending bank-transfer
    /// order is waiting for the payment to land; the stored status value
    /// is the same. That payment-dependent reading lives here and nowhere
    /// else.
    pub fn display_label(&self, payment: PaymentMethod) -> &'static str {
        match (self, payment) {
            (OrderStatus::Pending, PaymentMethod::Cod) => "Out for delivery",
            (OrderStatus::Pending, PaymentMethod::Bank) => "Awaiting payment",
            (OrderStatus::Processing, _) => "Processing",
            (OrderStatus::Completed, _) => "Completed",
            (OrderStatus::Cancelled, _) => "Cancelled",
        }
    }
}

/// One line of a submitted order, decoupled from the live cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product identifier.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at submission time.
    pub price: Money,
}

impl OrderItem {
    /// Price of this line (unit price × quantity).
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A checkout submission, built from a cart snapshot plus buyer input.
///
/// The draft owns its item snapshot, so cart mutations after checkout
/// started do not leak into the submission. The idempotency key is
/// generated once per attempt: retrying the same draft after a timeout
/// carries the same key, so the backend can deduplicate instead of
/// creating a second order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderDraft {
    /// Recipient name, duplicated from the customer info for the backend.
    pub customer_name: String,
    /// Shipping snapshot.
    pub customer_info: CustomerInfo,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Item snapshot.
    pub items: Vec<OrderItem>,
    /// Declared total; must equal the item sum.
    pub total_amount: Money,
    /// Client-generated key identifying this checkout attempt.
    pub idempotency_key: String,
}

impl OrderDraft {
    /// Build a draft from the current cart contents.
    pub fn from_cart(
        cart: &Cart,
        customer_info: CustomerInfo,
        payment_method: PaymentMethod,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer_info.validate()?;

        let items: Vec<OrderItem> = cart
            .items()
            .map(|line| OrderItem {
                product_id: line.product.id.clone(),
                quantity: line.quantity,
                price: line.product.price,
            })
            .collect();
        let total_amount = cart.total_amount()?;

        Ok(Self {
            customer_name: customer_info.name.clone(),
            customer_info,
            payment_method,
            items,
            total_amount,
            idempotency_key: generate_idempotency_key(),
        })
    }

    /// Re-check the draft invariants before it goes on the wire.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.items.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        self.customer_info.validate()?;

        let computed = Money::try_sum(
            self.items
                .iter()
                .map(|i| i.line_total())
                .collect::<Result<Vec<_>, _>>()?
                .into_iter(),
        )
        .ok_or(CommerceError::Overflow)?;

        if computed != self.total_amount {
            return Err(CommerceError::TotalMismatch {
                declared: self.total_amount.amount,
                computed: computed.amount,
            });
        }
        Ok(())
    }

    /// Issue a fresh key. Call when the buyer edits the draft: changed
    /// contents are a new order, not a retry of the old one.
    pub fn regenerate_key(&mut self) {
        self.idempotency_key = generate_idempotency_key();
    }
}

/// An order as returned by the backend.
///
/// Timestamps are backend-formatted strings and are passed through
/// untouched. The order-history endpoint only reports item names and
/// quantities, hence [`OrderLineSummary`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Backend record id.
    pub id: OrderId,
    /// Human-facing order number, e.g. `DH000042`.
    pub order_number: String,
    /// Current status.
    pub status: OrderStatus,
    /// Total charged.
    pub total_amount: Money,
    /// Creation timestamp, backend-formatted.
    pub created_at: String,
    /// Last-update timestamp, backend-formatted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Payment method; older records may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Recipient name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Item summaries, when the endpoint includes them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderLineSummary>,
}

impl Order {
    /// Check if the buyer can still cancel this order.
    pub fn can_cancel(&self) -> bool {
        self.status.can_cancel()
    }

    /// One-line summary for history views.
    pub fn summary_line(&self) -> String {
        let count: u32 = self.items.iter().map(|i| i.quantity).sum();
        format!(
            "{} · {} item(s) · {}",
            self.order_number,
            count,
            self.total_amount.display()
        )
    }
}

/// Name and quantity of one line, as the history endpoint reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineSummary {
    /// Product name at order time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
}

/// Confirmation returned by a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    /// Backend-assigned order number.
    pub order_number: String,
}

/// Generate a URL-safe random key for one checkout attempt.
fn generate_idempotency_key() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 18] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}
