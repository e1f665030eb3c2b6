//! Credentials written by one session are resumed by the next one

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use ms_core::domain::entities::session::{SessionState, StoredCredentials};
use ms_core::session::{SessionContext, TokenStore};
use ms_core::{HttpRequest, HttpTransport, RawResponse, RequestGateway, TransportError};
use ms_infra::FileTokenStore;
use ms_shared::{Role, ServiceEndpoints};

fn token(sub: &str, role: &str, minutes: i64) -> String {
    let exp = (Utc::now() + Duration::minutes(minutes)).timestamp();
    encode(
        &Header::default(),
        &json!({"sub": sub, "role": role, "exp": exp}),
        &EncodingKey::from_secret(b"persistence"),
    )
    .unwrap()
}

fn credentials_path() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("ms-session-{}", uuid::Uuid::new_v4()))
        .join("credentials.json")
}

#[tokio::test]
async fn test_session_survives_restart() {
    let path = credentials_path();

    let first = SessionContext::new(Arc::new(FileTokenStore::new(&path)));
    first.establish("sam", &token("sam", "seller", 10)).await.unwrap();
    first.replace_access_token(&token("sam", "seller", 20)).await;
    let expected = first.access_token().await;

    let second = SessionContext::new(Arc::new(FileTokenStore::new(&path)));
    let restored = second.restore().await.unwrap().unwrap();
    assert_eq!(restored.username, "sam");
    assert_eq!(restored.role, Role::Seller);
    assert_eq!(second.access_token().await, expected);
    assert_eq!(second.state().await, SessionState::Authenticated);
}

#[tokio::test]
async fn test_logout_removes_file() {
    let path = credentials_path();
    let store = Arc::new(FileTokenStore::new(&path));

    let context = SessionContext::new(store.clone());
    context.establish("sam", &token("sam", "buyer", 10)).await.unwrap();
    assert!(path.exists());

    context.clear().await.unwrap();
    assert!(!path.exists());
    assert!(store.load().await.unwrap().is_none());
}

/// Shop stand-in that accepts only the token handed out by `/refresh`
struct RefreshingShop {
    fresh: String,
    refreshes: AtomicUsize,
}

#[async_trait]
impl HttpTransport for RefreshingShop {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        if request.url.ends_with("/refresh") {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            return Ok(RawResponse::new(200, json!({"access_token": self.fresh}).to_string()));
        }
        let expected = format!("Bearer {}", self.fresh);
        if request.header("Authorization") == Some(expected.as_str()) {
            Ok(RawResponse::new(200, r#"[{"product_id": "P1", "quantity": 1}]"#))
        } else {
            Ok(RawResponse::new(401, r#"{"message": "Token has expired"}"#))
        }
    }
}

#[tokio::test]
async fn test_expired_stored_token_refreshed_after_restart() {
    let path = credentials_path();
    let context = SessionContext::new(Arc::new(FileTokenStore::new(&path)));
    context.establish("sam", &token("sam", "buyer", -1)).await.unwrap();

    let store = Arc::new(FileTokenStore::new(&path));
    let next = Arc::new(SessionContext::new(store.clone()));
    let restored = next.restore().await.unwrap().unwrap();
    assert_eq!(restored.username, "sam");
    assert_eq!(next.state().await, SessionState::Authenticated);

    let fresh = token("sam", "buyer", 10);
    let transport = Arc::new(RefreshingShop {
        fresh: fresh.clone(),
        refreshes: AtomicUsize::new(0),
    });
    let gateway = RequestGateway::new(transport.clone(), next.clone(), ServiceEndpoints::default());

    let cart: Value = gateway.get("http://127.0.0.1:5004/cart/sam").await.unwrap();
    assert_eq!(cart, json!([{"product_id": "P1", "quantity": 1}]));
    let _: Value = gateway.get("http://127.0.0.1:5004/cart/sam").await.unwrap();

    assert_eq!(transport.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(next.access_token().await, Some(fresh.clone()));
    assert_eq!(store.load().await.unwrap().unwrap().access_token, fresh);
}

#[tokio::test]
async fn test_unreadable_stored_token_is_discarded() {
    let path = credentials_path();
    let store = FileTokenStore::new(&path);
    store
        .save(&StoredCredentials {
            username: "sam".into(),
            access_token: "not-a-jwt".into(),
        })
        .await
        .unwrap();

    let next = SessionContext::new(Arc::new(FileTokenStore::new(&path)));
    assert!(next.restore().await.unwrap().is_none());
    assert!(!path.exists());
    assert_eq!(next.state().await, SessionState::Anonymous);
}
