mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use bitecraft::domain::order::OrderStatus;
use bitecraft::domain::payment::PaymentStatus;
use bitecraft::interfaces::http::admin::ADMIN_EMAIL_HEADER;
use common::*;
use serde_json::{Value, json};

const ADMIN: &str = "owner@bitecraft.example";

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(ADMIN_EMAIL_HEADER, ADMIN)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_settings_update_is_partial_and_public_view_hides_secrets() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            Method::PATCH,
            "/api/admin/settings",
            json!({ "deliveryFee": "8.00", "theme": "dark", "paymentGateway": "paystack" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let full = json_body(response).await;
    assert_eq!(full["theme"], "dark");
    assert_eq!(full["hubtelClientSecret"], "client-secret");

    let public = json_body(send(&app, get("/api/settings")).await).await;
    assert_eq!(public["theme"], "dark");
    assert_eq!(public["paymentGateway"], "paystack");
    assert!(public.get("hubtelClientSecret").is_none());
    assert!(public.get("paystackSecretKey").is_none());

    let activity = json_body(send(&app, get("/api/admin/activity?limit=1")).await).await;
    assert_eq!(activity[0]["description"], "Updated settings");
    assert_eq!(activity[0]["details"]["adminEmail"], ADMIN);
}

#[tokio::test]
async fn test_menu_item_lifecycle_through_api() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/api/admin/menu-items",
            json!({
                "name": "Waakye",
                "description": "Rice and beans",
                "price": "35.00",
                "image": "/images/waakye.jpg",
                "category": "Mains"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = json_body(response).await;
    let id = item["id"].as_str().unwrap().to_string();

    let menu = json_body(send(&app, get("/api/menu")).await).await;
    assert_eq!(menu.as_array().unwrap().len(), 1);
    assert_eq!(menu[0]["name"], "Waakye");

    let response = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/menu-items/{id}"),
            json!({ "name": "Waakye Special", "price": "40.00", "image": "/images/waakye.jpg", "category": "Mains" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request(Method::DELETE, &format!("/api/admin/menu-items/{id}"), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        json_request(Method::DELETE, &format!("/api/admin/menu-items/{id}"), json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_order_status_change_and_listing() {
    let app = test_app();
    let order = seed_pending_order(&app.stores).await;

    let response = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/orders/{}/status", order.id),
            json!({ "status": "Processing" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let orders = json_body(send(&app, get("/api/admin/orders")).await).await;
    assert_eq!(orders[0]["status"], "Processing");
    assert_eq!(orders[0]["customerDetails"]["email"], "ama@example.com");
}

#[tokio::test]
async fn test_stale_sweep_cancels_pending_orders() {
    let app = test_app();
    let order = seed_pending_order(&app.stores).await;

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/api/admin/orders/cancel-stale",
            json!({ "olderThanMinutes": 0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["cancelled"][0], order.id.as_str());

    let stored = app.stores.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Cancelled);
    let payment = app
        .stores
        .payments
        .payment_for_order(&order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn test_stale_sweep_rejects_out_of_range_age() {
    let app = test_app();
    let order = seed_pending_order(&app.stores).await;

    for minutes in [json!(i64::MAX), json!(-5)] {
        let response = send(
            &app,
            json_request(
                Method::POST,
                "/api/admin/orders/cancel-stale",
                json!({ "olderThanMinutes": minutes }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], true);
    }

    let stored = app.stores.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_dashboard_counts_only_succeeded_revenue() {
    let app = test_app();
    let paid = seed_pending_order(&app.stores).await;
    seed_pending_order(&app.stores).await;
    app.stores
        .payments
        .update_payment_status_by_order(&paid.id, PaymentStatus::Succeeded, Some("tx".to_string()))
        .await
        .unwrap();

    let stats = json_body(send(&app, get("/api/admin/dashboard")).await).await;
    assert_eq!(stats["totalOrders"], 2);
    assert_eq!(stats["totalCustomers"], 2);
    assert_eq!(stats["totalRevenue"], "25.00");
    assert_eq!(stats["topItems"][0]["quantity"], 4);
    assert_eq!(stats["recentOrders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_contact_and_rating_flow() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            Method::POST,
            "/api/contact",
            json!({
                "name": "Esi",
                "phone": "0271234567",
                "location": "Tema",
                "message": "Please add more vegetarian options."
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let messages = json_body(send(&app, get("/api/admin/messages")).await).await;
    assert_eq!(messages[0]["isRead"], false);
    let id = messages[0]["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/admin/messages/{id}/read"),
            json!({ "isRead": true }),
        ),
    )
    .await;
    assert_eq!(json_body(response).await["isRead"], true);

    let response = send(
        &app,
        json_request(Method::POST, "/api/ratings", json!({ "rating": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(Method::POST, "/api/ratings", json!({ "rating": 4, "comment": "Great kelewele" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ratings = json_body(send(&app, get("/api/admin/ratings")).await).await;
    assert_eq!(ratings[0]["rating"], 4);
}

#[tokio::test]
async fn test_page_views_skip_admin_paths() {
    let app = test_app();
    for path in ["/menu", "/admin/orders", "/checkout"] {
        let response = send(
            &app,
            json_request(Method::POST, "/api/page-views", json!({ "path": path })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let activity = json_body(send(&app, get("/api/admin/activity")).await).await;
    let paths: Vec<&str> = activity
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["details"]["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/checkout", "/menu"]);
}
