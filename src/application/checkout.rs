use crate::domain::checkout::CheckoutRequest;
use crate::domain::contact::normalize_phone;
use crate::domain::customer::{Customer, NewCustomer, Visitor};
use crate::domain::new_id;
use crate::domain::order::NewOrder;
use crate::domain::payment::{NewPayment, PaymentRequest};
use crate::domain::ports::{PaymentGateways, Stores};
use crate::error::Result;
use chrono::Utc;
use tracing::{Instrument, error, info, info_span, warn};

/// What a successful checkout hands back to the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub order_id: String,
    pub payment_id: String,
    pub checkout_url: String,
}

/// Sequences a checkout: validate, record, then ask the configured gateway for a redirect.
///
/// Writes are not transactional. A gateway failure leaves the order and payment
/// `Pending`; the stale-order sweep cleans them up later.
#[derive(Clone)]
pub struct CheckoutService {
    stores: Stores,
    gateways: PaymentGateways,
}

impl CheckoutService {
    pub fn new(stores: Stores, gateways: PaymentGateways) -> Self {
        Self { stores, gateways }
    }

    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let span = info_span!("checkout", email = %request.email, method = ?request.delivery_method);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let settings = self.stores.settings.get_settings().await?;
        let gateway = self.gateways.get(settings.payment_gateway);

        request.validate(gateway.requires_channel())?;
        request.check_total(settings.delivery_fee)?;

        self.register_visitor(&request).await;
        let customer = self.find_or_create_customer(&request).await?;

        let order = self
            .stores
            .orders
            .create_order(NewOrder::from_cart(
                customer.id.clone(),
                request.items.clone(),
                request.total,
                request.delivery_method,
                request.channel.clone().unwrap_or_default(),
            )?)
            .await?;
        info!(order_id = %order.id, total = %order.total, "Order created");

        let payment = self
            .stores
            .payments
            .create_payment(NewPayment {
                order_id: order.id.clone(),
                amount: order.total,
                gateway: gateway.gateway(),
            })
            .await?;
        info!(payment_id = %payment.id, gateway = %payment.gateway, "Payment created");

        let payment_request = PaymentRequest {
            amount: order.total,
            description: format!("Payment for Bite Craft Order #{}", order.id),
            client_reference: order.id.clone(),
            customer_name: request.name.trim().to_string(),
            customer_email: request.email.trim().to_string(),
            mobile_number: request.phone.clone(),
            channel: request.channel.clone(),
        };
        let checkout_url = gateway.initiate(&payment_request).await.map_err(|e| {
            error!(order_id = %order.id, error = %e, "Gateway initiation failed; order left pending");
            e
        })?;

        info!(order_id = %order.id, "Checkout redirect issued");
        Ok(CheckoutSession {
            order_id: order.id,
            payment_id: payment.id,
            checkout_url,
        })
    }

    async fn register_visitor(&self, request: &CheckoutRequest) {
        let phone = normalize_phone(&request.phone);
        let result = async {
            if self.stores.visitors.find_visitor_by_phone(&phone).await?.is_none() {
                self.stores
                    .visitors
                    .add_visitor(Visitor {
                        id: new_id(),
                        name: request.name.trim().to_string(),
                        phone: phone.clone(),
                        email: request.email.trim().to_string(),
                        created_at: Utc::now(),
                    })
                    .await?;
            }
            Ok::<_, crate::error::AppError>(())
        }
        .await;

        if let Err(e) = result {
            warn!(error = %e, "Could not record visitor; continuing checkout");
        }
    }

    async fn find_or_create_customer(&self, request: &CheckoutRequest) -> Result<Customer> {
        let email = request.email.trim();
        if let Some(existing) = self.stores.customers.find_customer_by_email(email).await? {
            return Ok(existing);
        }
        let customer = self
            .stores
            .customers
            .create_customer(NewCustomer {
                name: request.name.trim().to_string(),
                email: email.to_string(),
                phone: request.phone.trim().to_string(),
                location: request.customer_location(),
            })
            .await?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }
}
