#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use bitecraft::application::Services;
use bitecraft::domain::customer::NewCustomer;
use bitecraft::domain::order::{DeliveryMethod, NewOrder, Order, OrderLine};
use bitecraft::domain::payment::{Gateway, NewPayment, PaymentRequest};
use bitecraft::domain::ports::{PaymentGateway, PaymentGateways, SharedWebhookReceiver, Stores};
use bitecraft::domain::settings::Settings;
use bitecraft::error::{AppError, Result};
use bitecraft::infrastructure::hubtel::{HubtelEndpoints, HubtelGateway};
use bitecraft::infrastructure::in_memory::InMemoryStore;
use bitecraft::infrastructure::paystack::{PaystackEndpoints, PaystackGateway};
use bitecraft::interfaces::http::{AppState, router};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const PAYSTACK_SECRET: &str = "sk_test_4f2b9c";

/// Outbound gateway stand-in that records requests and answers with a canned result.
pub struct RecordingGateway {
    pub kind: Gateway,
    pub failure: Option<String>,
    pub requests: Mutex<Vec<PaymentRequest>>,
}

impl RecordingGateway {
    pub fn ok(kind: Gateway) -> Arc<Self> {
        Arc::new(Self {
            kind,
            failure: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(kind: Gateway, message: &str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            failure: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    fn gateway(&self) -> Gateway {
        self.kind
    }

    fn requires_channel(&self) -> bool {
        self.kind == Gateway::Hubtel
    }

    async fn initiate(&self, request: &PaymentRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(message) => Err(AppError::GatewayError(message.clone())),
            None => Ok(format!("https://checkout.test/{}", request.client_reference)),
        }
    }
}

pub fn default_settings() -> Settings {
    Settings {
        delivery_fee: dec!(5.00),
        hubtel_client_id: "client-id".to_string(),
        hubtel_client_secret: "client-secret".to_string(),
        merchant_account_number: "HM-001".to_string(),
        paystack_secret_key: PAYSTACK_SECRET.to_string(),
        ..Settings::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub hubtel: Arc<RecordingGateway>,
    pub paystack: Arc<RecordingGateway>,
}

/// Router over an in-memory store. Outbound gateways are recorded; webhook
/// receivers are the real adapters.
pub fn test_app_with(settings: Settings, hubtel: Arc<RecordingGateway>) -> TestApp {
    let stores = Stores::from_backend(InMemoryStore::with_settings(settings));
    let paystack = RecordingGateway::ok(Gateway::Paystack);

    let http = reqwest::Client::new();
    let hubtel_webhook: SharedWebhookReceiver = Arc::new(HubtelGateway::new(
        http.clone(),
        stores.settings.clone(),
        HubtelEndpoints {
            api_url: "http://127.0.0.1:9/unused".to_string(),
            callback_url: "http://localhost:3000/api/hubtel-callback".to_string(),
            return_url: "http://localhost:3000/order-confirmation".to_string(),
            cancellation_url: "http://localhost:3000/checkout".to_string(),
        },
    ));
    let paystack_webhook: SharedWebhookReceiver = Arc::new(PaystackGateway::new(
        http,
        stores.settings.clone(),
        PaystackEndpoints {
            api_url: "http://127.0.0.1:9".to_string(),
            callback_url: "http://localhost:3000/order-confirmation".to_string(),
        },
    ));

    let state = AppState {
        services: Services::new(
            stores.clone(),
            PaymentGateways::new(hubtel.clone(), paystack.clone()),
        ),
        hubtel_webhook,
        paystack_webhook,
    };

    TestApp {
        router: router(state),
        stores,
        hubtel,
        paystack,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(default_settings(), RecordingGateway::ok(Gateway::Hubtel))
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn jollof(quantity: u32) -> OrderLine {
    OrderLine {
        id: "menu-jollof".to_string(),
        name: "Jollof Rice".to_string(),
        price: dec!(10.00),
        quantity,
        image: "/images/jollof.jpg".to_string(),
    }
}

/// Persists a pending delivery order with its payment, the way checkout leaves it.
pub async fn seed_pending_order(stores: &Stores) -> Order {
    let order = seed_order_without_payment(stores).await;
    stores
        .payments
        .create_payment(NewPayment {
            order_id: order.id.clone(),
            amount: order.total,
            gateway: Gateway::Hubtel,
        })
        .await
        .unwrap();
    order
}

/// A pending order whose payment record was never written.
pub async fn seed_order_without_payment(stores: &Stores) -> Order {
    let customer = stores
        .customers
        .create_customer(NewCustomer {
            name: "Ama Owusu".to_string(),
            email: "ama@example.com".to_string(),
            phone: "0244123456".to_string(),
            location: "12 Oxford Street, Osu".to_string(),
        })
        .await
        .unwrap();
    stores
        .orders
        .create_order(NewOrder::from_cart(
            customer.id,
            vec![jollof(2)],
            dec!(25.00),
            DeliveryMethod::Delivery,
            "mtn-gh".to_string(),
        ).unwrap())
        .await
        .unwrap()
}
