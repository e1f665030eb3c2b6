//! End-to-end session scenarios against an in-process fake of the shop services

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use ms_core::errors::{DomainError, GatewayError, TransportError};
use ms_core::services::{AuthClient, Dashboard, DashboardSnapshot, SessionController, ShopClient};
use ms_core::session::SessionContext;
use ms_core::{
    HttpMethod, HttpRequest, HttpTransport, LoginOutcome, RawResponse, RequestGateway,
    SessionState,
};
use ms_shared::{AuthFlowConfig, ServiceEndpoints, SessionConfig};

fn token(sub: &str, role: &str, generation: u32) -> String {
    let exp = (Utc::now() + Duration::minutes(15)).timestamp();
    encode(
        &Header::default(),
        &json!({"sub": sub, "role": role, "exp": exp, "gen": generation}),
        &EncodingKey::from_secret(b"integration"),
    )
    .unwrap()
}

#[derive(Default)]
struct ShopState {
    valid_token: Option<String>,
    generation: u32,
    refresh_allowed: bool,
    require_otp: bool,
    cart: Vec<(String, u32)>,
    refresh_calls: usize,
    logout_calls: usize,
}

/// Minimal stand-in for the user, product and cart services
struct FakeShop {
    state: Mutex<ShopState>,
}

impl FakeShop {
    fn new() -> Self {
        Self {
            state: Mutex::new(ShopState {
                refresh_allowed: true,
                ..Default::default()
            }),
        }
    }

    /// Invalidate the current access token, as its expiry would
    fn expire_access_token(&self) {
        self.state.lock().unwrap().valid_token = Some("rotated-away".to_string());
    }

    fn revoke_refresh(&self) {
        self.state.lock().unwrap().refresh_allowed = false;
    }

    fn require_otp(&self) {
        self.state.lock().unwrap().require_otp = true;
    }

    fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refresh_calls
    }

    fn logout_calls(&self) -> usize {
        self.state.lock().unwrap().logout_calls
    }

    fn issue(state: &mut ShopState) -> String {
        state.generation += 1;
        let issued = token("alice", "buyer", state.generation);
        state.valid_token = Some(issued.clone());
        issued
    }
}

fn reply(status: u16, body: Value) -> RawResponse {
    RawResponse::new(status, body.to_string())
}

#[async_trait]
impl HttpTransport for FakeShop {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let path = request
            .url
            .splitn(4, '/')
            .nth(3)
            .map(|p| format!("/{}", p))
            .unwrap_or_default();
        let bearer = request
            .header("Authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);
        let body: Value = request
            .body
            .as_deref()
            .map(|b| serde_json::from_str(b).unwrap())
            .unwrap_or(Value::Null);

        let mut state = self.state.lock().unwrap();
        let response = match (request.method, path.as_str()) {
            (HttpMethod::Post, "/login") => {
                if body["password"] != "secret" {
                    reply(401, json!({"message": "Invalid credentials"}))
                } else if state.require_otp {
                    reply(206, json!({"message": "OTP sent to your email", "pre_auth_token": "pre-1"}))
                } else {
                    let issued = Self::issue(&mut state);
                    reply(200, json!({"username": "alice", "access_token": issued}))
                }
            }
            (HttpMethod::Post, "/login/verify-otp") => {
                if body["pre_auth_token"] == "pre-1" && body["otp_code"] == "424242" {
                    let issued = Self::issue(&mut state);
                    reply(200, json!({"username": "alice", "access_token": issued}))
                } else {
                    reply(401, json!({"message": "Invalid or expired OTP"}))
                }
            }
            (HttpMethod::Post, "/refresh") => {
                state.refresh_calls += 1;
                if state.refresh_allowed {
                    let issued = Self::issue(&mut state);
                    reply(200, json!({"access_token": issued}))
                } else {
                    reply(401, json!({"message": "Refresh token is invalid"}))
                }
            }
            (HttpMethod::Post, "/logout") => {
                state.logout_calls += 1;
                reply(200, json!({"message": "Logged out successfully"}))
            }
            _ if bearer.is_none() || bearer != state.valid_token => {
                reply(401, json!({"message": "Token has expired"}))
            }
            (HttpMethod::Get, "/products") => reply(
                200,
                json!({"status": "success", "data": [{"id": "P1", "name": "Lamp", "price": 20.0}]}),
            ),
            (HttpMethod::Get, "/cart/alice") => {
                let items: Vec<Value> = state
                    .cart
                    .iter()
                    .map(|(id, qty)| json!({"product_id": id, "quantity": qty}))
                    .collect();
                reply(200, Value::Array(items))
            }
            (HttpMethod::Post, "/cart/alice/add") => {
                let id = body["product_id"].as_str().unwrap_or_default().to_string();
                let qty = body["quantity"].as_u64().unwrap_or(1) as u32;
                state.cart.push((id, qty));
                reply(200, json!({"message": "Item added to cart"}))
            }
            (HttpMethod::Get, "/wishlist/alice") => reply(200, json!([])),
            (HttpMethod::Get, "/orders/alice") => reply(200, json!([])),
            _ => reply(404, json!({"message": "Not found"})),
        };
        Ok(response)
    }
}

struct Storefront {
    shop_service: Arc<FakeShop>,
    auth: AuthClient<FakeShop>,
    shop: ShopClient<FakeShop>,
    session: Arc<SessionContext>,
}

fn storefront() -> Storefront {
    let shop_service = Arc::new(FakeShop::new());
    let session = Arc::new(SessionContext::in_memory());
    let gateway = Arc::new(RequestGateway::new(
        shop_service.clone(),
        session.clone(),
        ServiceEndpoints::single("http://shop.test"),
    ));
    Storefront {
        shop_service,
        auth: AuthClient::new(gateway.clone(), AuthFlowConfig::default()),
        shop: ShopClient::new(gateway),
        session,
    }
}

#[tokio::test]
async fn test_login_without_extra_steps() {
    let store = storefront();

    let outcome = store.auth.login("alice", "secret", None).await.unwrap();
    let LoginOutcome::Authenticated(session) = outcome else {
        panic!("expected an authenticated session");
    };
    assert_eq!(session.username, "alice");
    assert!(!session.access_token.is_empty());
    assert_eq!(store.session.state().await, SessionState::Authenticated);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_transparently() {
    let store = storefront();
    store.auth.login("alice", "secret", None).await.unwrap();
    let before = store.shop.list_products().await.unwrap();

    store.shop_service.expire_access_token();
    let after = store.shop.list_products().await.unwrap();

    assert_eq!(before, after);
    assert_eq!(store.shop_service.refresh_calls(), 1);
    assert_eq!(store.session.state().await, SessionState::Authenticated);

    store.shop.add_to_cart("alice", "P1", 2).await.unwrap();
    let cart = store.shop.cart("alice").await.unwrap();
    assert_eq!(cart[0].quantity, 2);
    assert_eq!(store.shop_service.refresh_calls(), 1);
}

#[tokio::test]
async fn test_revoked_refresh_forces_logout() {
    let store = storefront();
    store.auth.login("alice", "secret", None).await.unwrap();

    let controller = Arc::new(SessionController::new(
        store.shop.gateway().clone(),
        SessionConfig::default(),
    ));
    controller.start();

    store.shop_service.expire_access_token();
    store.shop_service.revoke_refresh();

    let error = store.shop.cart("alice").await.unwrap_err();
    assert!(matches!(error, DomainError::Gateway(GatewayError::SessionExpired)));
    assert_eq!(store.session.signal().emitted_count(), 1);

    let torn_down = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while store.session.state().await != SessionState::Anonymous {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(torn_down.is_ok());
    assert!(store.session.access_token().await.is_none());
    controller.shutdown();
}

#[tokio::test]
async fn test_otp_login_flow() {
    let store = storefront();
    store.shop_service.require_otp();

    let outcome = store.auth.login("alice", "secret", None).await.unwrap();
    let LoginOutcome::OtpRequired(step) = outcome else {
        panic!("expected an OTP step");
    };
    assert_eq!(step.continuation_token.as_deref(), Some("pre-1"));
    assert_eq!(store.session.state().await, SessionState::PendingMfa);

    let session = store.auth.verify_login_otp("pre-1", " 424242 ").await.unwrap();
    assert_eq!(session.username, "alice");
    assert_eq!(store.session.state().await, SessionState::Authenticated);
}

#[tokio::test]
async fn test_wrong_password_is_reported_without_refresh() {
    let store = storefront();

    let error = store.auth.login("alice", "nope", None).await.unwrap_err();
    assert_eq!(error.to_string(), "Invalid credentials");
    assert_eq!(store.shop_service.refresh_calls(), 0);
    assert_eq!(store.session.state().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_dashboard_then_logout() {
    let store = storefront();
    store.auth.login("alice", "secret", None).await.unwrap();

    let snapshot = Dashboard::load_for_session(&store.shop).await.unwrap();
    assert!(matches!(snapshot, DashboardSnapshot::Buyer(_)));
    assert!(snapshot.is_complete());

    let outcome = store.auth.logout().await;
    assert!(outcome.is_success());
    assert!(store.session.access_token().await.is_none());
    assert_eq!(store.shop_service.logout_calls(), 1);
}
