//! HTTP implementation of the backend contract.

use crate::dto::{
    CreateOrderRequest, DataEnvelope, MyOrdersData, PushCartRequest, RefreshTokenRequest,
    RefreshTokenResponse, StatusUpdateRequest,
};
use crate::refresh::RefreshGate;
use crate::traits::{CartBackend, OrderBackend};
use crate::ApiError;
use async_trait::async_trait;
use bloom_auth::CredentialStore;
use bloom_commerce::cart::CartItem;
use bloom_commerce::checkout::{Order, OrderConfirmation, OrderDraft, OrderStatus};
use bloom_commerce::ids::OrderId;
use bloom_data::{ClientRequestBuilder, FetchClient, FetchError, Response};
use tracing::{debug, warn};

const CART_PATH: &str = "/api/cart";
// The backend really does serve buyer order creation from under /api/admin;
// the paths here document the contract, they do not rename it.
const ORDERS_PATH: &str = "/api/admin/orders";
const MY_ORDERS_PATH: &str = "/api/admin/my-orders";
const REFRESH_PATH: &str = "/api/auth/refresh-token";

fn order_status_path(order_id: &OrderId) -> String {
    format!("{}/{}/status", ORDERS_PATH, order_id)
}

/// HTTP client for the shop's REST backend.
///
/// Every call attaches `Authorization: Bearer <access_token>` when a
/// token is stored. A 401 triggers one single-flight refresh followed by
/// one retry of the original request; a second 401 clears all credential
/// state and surfaces [`ApiError::AuthExpired`].
pub struct ShopClient {
    http: FetchClient,
    credentials: CredentialStore,
    refresh_gate: RefreshGate,
}

impl ShopClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Self {
        Self {
            http: FetchClient::new()
                .with_base_url(base_url)
                .with_default_header("Accept", "application/json"),
            credentials,
            refresh_gate: RefreshGate::new(),
        }
    }

    /// The credential store this client reads tokens from.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Call the refresh endpoint. No bearer header: the refresh token in
    /// the body is the credential.
    async fn refresh_access_token(&self, refresh_token: String) -> Result<String, ApiError> {
        let response = self
            .http
            .post(REFRESH_PATH)
            .json(&RefreshTokenRequest {
                refresh_token: &refresh_token,
            })?
            .send()?;
        let body: RefreshTokenResponse = Self::into_success(response)?.json()?;
        Ok(body.access_token)
    }

    /// Send an authenticated request, refreshing the token once on 401.
    ///
    /// `build` is called again for the retry so the request body is
    /// reconstructed rather than reused.
    async fn send_authed<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&FetchClient) -> Result<ClientRequestBuilder, FetchError>,
    {
        let token = self.credentials.access_token()?;
        let mut request = build(&self.http)?;
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;
        if response.status != 401 {
            return Self::into_success(response);
        }

        debug!("request returned 401, attempting token refresh");
        let fresh = self
            .refresh_gate
            .refresh_once(&self.credentials, token.as_deref(), |refresh_token| {
                self.refresh_access_token(refresh_token)
            })
            .await?;

        let response = build(&self.http)?.bearer_auth(&fresh).send()?;
        if response.status == 401 {
            warn!("retry after refresh still unauthorized, clearing credentials");
            self.credentials.clear()?;
            return Err(ApiError::AuthExpired);
        }
        Self::into_success(response)
    }

    /// Turn a non-2xx response into a rejection carrying the server's
    /// message untouched.
    fn into_success(response: Response) -> Result<Response, ApiError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Rejected {
                status: response.status,
                message: response
                    .text()
                    .unwrap_or_else(|_| "unknown error".to_string()),
            })
        }
    }
}

#[async_trait]
impl CartBackend for ShopClient {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let response = self.send_authed(|http| Ok(http.get(CART_PATH))).await?;
        let envelope: DataEnvelope<Vec<CartItem>> = response.json()?;
        debug!(items = envelope.data.len(), "fetched server-side cart");
        Ok(envelope.data)
    }

    async fn push_cart(&self, items: &[CartItem]) -> Result<(), ApiError> {
        self.send_authed(|http| http.post(CART_PATH).json(&PushCartRequest { items }))
            .await?;
        debug!(items = items.len(), "pushed cart to backend");
        Ok(())
    }
}

#[async_trait]
impl OrderBackend for ShopClient {
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderConfirmation, ApiError> {
        // Reject bad drafts before they cost a round trip.
        draft.validate()?;

        let response = self
            .send_authed(|http| {
                http.post(ORDERS_PATH)
                    .json(&CreateOrderRequest::from_draft(draft))
            })
            .await?;
        let confirmation: OrderConfirmation = response.json()?;
        debug!(
            order_number = %confirmation.order_number,
            "order created"
        );
        Ok(confirmation)
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let path = order_status_path(order_id);
        self.send_authed(|http| http.put(path.as_str()).json(&StatusUpdateRequest { status }))
            .await?;
        debug!(order_id = %order_id, status = status.as_str(), "order status updated");
        Ok(())
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response = self.send_authed(|http| Ok(http.get(MY_ORDERS_PATH))).await?;
        let envelope: DataEnvelope<MyOrdersData> = response.json()?;
        Ok(envelope.data.orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_commerce::cart::Cart;
    use bloom_commerce::catalog::{Category, FlowerType, ProductSnapshot};
    use bloom_commerce::checkout::{CustomerInfo, PaymentMethod};
    use bloom_commerce::money::Money;
    use bloom_commerce::CommerceError;

    fn client() -> ShopClient {
        ShopClient::new(
            "http://localhost:5003",
            CredentialStore::open_default().unwrap(),
        )
    }

    #[test]
    fn test_order_status_path() {
        assert_eq!(
            order_status_path(&OrderId::new("665f1e")),
            "/api/admin/orders/665f1e/status"
        );
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_draft_before_network() {
        let mut cart = Cart::new();
        cart.add_item(
            ProductSnapshot::new(
                "a",
                "Bouquet A",
                Money::new(450_000),
                Category::Birthday,
                FlowerType::Rose,
            ),
            2,
        )
        .unwrap();
        let mut draft = OrderDraft::from_cart(
            &cart,
            CustomerInfo::new("Lan Nguyen", "0901234567"),
            PaymentMethod::Cod,
        )
        .unwrap();
        draft.total_amount = Money::new(1);

        let err = client().create_order(&draft).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Invalid(CommerceError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn test_rejection_carries_server_message() {
        let response = Response::new(
            400,
            std::collections::HashMap::new(),
            b"invalid status transition".to_vec(),
        );
        match ShopClient::into_success(response) {
            Err(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid status transition");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
