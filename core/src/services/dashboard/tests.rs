use std::sync::Arc;

use serde_json::json;

use ms_shared::{Role, ServiceEndpoints};

use super::*;
use crate::gateway::tests::mocks::{access_token, MockTransport};
use crate::gateway::{HttpMethod, RequestGateway};
use crate::session::SessionContext;

async fn shop_as(
    username: &str,
    role: &str,
    transport: MockTransport,
) -> (Arc<MockTransport>, ShopClient<MockTransport>) {
    let transport = Arc::new(transport);
    let session = Arc::new(SessionContext::in_memory());
    session
        .establish(username, &access_token(username, role, 15))
        .await
        .unwrap();
    let gateway = Arc::new(RequestGateway::new(
        transport.clone(),
        session,
        ServiceEndpoints::default(),
    ));
    (transport, ShopClient::new(gateway))
}

#[test]
fn test_dashboard_for_role() {
    assert_eq!(Dashboard::for_role(Role::Buyer), Dashboard::Buyer);
    assert_eq!(Dashboard::for_role(Role::Seller), Dashboard::Seller);
    assert_eq!(Dashboard::for_role(Role::Admin), Dashboard::Admin);
}

#[tokio::test]
async fn test_buyer_dashboard_settles_each_section() {
    let transport = MockTransport::new()
        .respond(HttpMethod::Get, "/products", 200, json!([{"id": "P1", "name": "Lamp", "price": 20.0}]))
        .respond(HttpMethod::Get, "/cart/alice", 200, json!([{"product_id": "P2", "quantity": 1}]))
        .respond(HttpMethod::Get, "/wishlist/alice", 500, json!({"message": "Database unavailable"}))
        .respond(HttpMethod::Get, "/orders/alice", 200, json!([]))
        .respond(HttpMethod::Get, "/products/P2", 200, json!({"id": "P2", "name": "Mug", "price": 5.0}));
    let (_, shop) = shop_as("alice", "buyer", transport).await;

    let snapshot = Dashboard::load_for_session(&shop).await.unwrap();
    let DashboardSnapshot::Buyer(buyer) = &snapshot else {
        panic!("expected buyer dashboard");
    };

    assert_eq!(buyer.products.as_ref().unwrap().len(), 1);
    assert_eq!(buyer.cart.as_ref().unwrap()[0].product_id, "P2");
    assert!(buyer.wishlist.is_err());
    assert!(buyer.orders.as_ref().unwrap().is_empty());
    assert_eq!(buyer.details.fetched, vec!["P2".to_string()]);
    assert_eq!(snapshot.failed_sections(), vec!["wishlist"]);
    assert!(!snapshot.session_expired());
}

#[tokio::test]
async fn test_seller_dashboard_reviews_own_products() {
    let transport = MockTransport::new()
        .respond(HttpMethod::Get, "/products", 200, json!([
            {"id": "P1", "name": "Lamp", "price": 20.0, "owner_id": "sam"},
            {"id": "P2", "name": "Mug", "price": 5.0, "owner_id": "tia"}
        ]))
        .respond(HttpMethod::Post, "/seller/reviews", 200, json!([{
            "review_id": "r-1",
            "user_id": "alice",
            "product_id": "P1",
            "rating": 4,
            "comment": "Bright",
            "status": "approved"
        }]));
    let (transport, shop) = shop_as("sam", "seller", transport).await;

    let snapshot = Dashboard::load_for_session(&shop).await.unwrap();
    let DashboardSnapshot::Seller(seller) = &snapshot else {
        panic!("expected seller dashboard");
    };

    assert_eq!(seller.products.as_ref().unwrap().len(), 1);
    let reviews = seller.reviews.as_ref().unwrap().as_ref().unwrap();
    assert_eq!(reviews[0].review_id, "r-1");

    let request = &transport.requests_to(HttpMethod::Post, "/seller/reviews")[0];
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"product_ids": ["P1"]}));
    assert!(snapshot.is_complete());
}

#[tokio::test]
async fn test_seller_dashboard_without_products_skips_reviews() {
    let transport = MockTransport::new().respond(
        HttpMethod::Get,
        "/products",
        503,
        json!({"message": "Service unavailable"}),
    );
    let (transport, shop) = shop_as("sam", "seller", transport).await;

    let snapshot = Dashboard::Seller.load(&shop, "sam").await;
    let DashboardSnapshot::Seller(seller) = &snapshot else {
        panic!("expected seller dashboard");
    };
    assert!(seller.products.is_err());
    assert!(seller.reviews.is_none());
    assert_eq!(transport.count(HttpMethod::Post, "/seller/reviews"), 0);
}

#[tokio::test]
async fn test_admin_dashboard() {
    let transport = MockTransport::new()
        .respond(HttpMethod::Get, "/admin/users", 200, json!([{"username": "bob", "role": "seller"}]))
        .respond(HttpMethod::Get, "/admin/inventory", 200, json!([{"product_id": "P1", "quantity": 3}]))
        .respond(HttpMethod::Get, "/admin/reviews/pending", 200, json!([]));
    let (_, shop) = shop_as("root", "admin", transport).await;

    let snapshot = Dashboard::load_for_session(&shop).await.unwrap();
    let DashboardSnapshot::Admin(admin) = &snapshot else {
        panic!("expected admin dashboard");
    };
    assert_eq!(admin.users.as_ref().unwrap()[0].role, Role::Seller);
    assert_eq!(admin.inventory.as_ref().unwrap()[0].quantity, 3);
    assert!(snapshot.is_complete());
}

#[tokio::test]
async fn test_dashboard_reports_expired_session() {
    let transport = MockTransport::new()
        .require_token("never-issued")
        .respond(HttpMethod::Post, "/refresh", 401, json!({"message": "Refresh token expired"}));
    let (_, shop) = shop_as("root", "admin", transport).await;

    let snapshot = Dashboard::Admin.load(&shop, "root").await;
    assert!(snapshot.session_expired());
    assert_eq!(snapshot.failed_sections().len(), 3);
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let transport = Arc::new(MockTransport::new());
    let gateway = Arc::new(RequestGateway::new(
        transport,
        Arc::new(SessionContext::in_memory()),
        ServiceEndpoints::default(),
    ));
    let shop = ShopClient::new(gateway);

    let result = Dashboard::load_for_session(&shop).await;
    assert!(matches!(
        result,
        Err(DomainError::Session(SessionError::NotAuthenticated))
    ));
}
