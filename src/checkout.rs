//! Order placement
//!
//! Orders carry a full denormalized snapshot of the cart lines, so later
//! catalog edits never rewrite history. Placement does not touch inventory;
//! stock reconciliation is a manual console task.

use chrono::Utc;
use rand::Rng;
use serde_json::json;
use thiserror::Error;
use validator::Validate;

use crate::cart::Cart;
use crate::catalog::CatalogStore;
use crate::domain::{Order, OrderStatus};
use crate::gateway::{Collection, GatewayError, RecordGateway};

/// Customer-entered checkout form. Validated in full before anything is
/// sent over the wire.
#[derive(Clone, Debug, Validate)]
pub struct CheckoutDetails {
    #[validate(length(min = 1, message = "Please enter your name."))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "Please enter your phone number."))]
    pub customer_phone: String,

    #[validate(email(message = "Please enter a valid email address."))]
    pub customer_email: String,

    #[validate(length(min = 1, message = "Please select a payment method."))]
    pub payment_method: String,

    #[validate(length(min = 1, message = "Please enter the transaction ID."))]
    pub transaction_id: String,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A user-facing message; the form never reaches the gateway.
    #[error("{0}")]
    Invalid(String),

    #[error("could not place order: {0}")]
    Persist(#[from] GatewayError),
}

/// First user-facing message out of a validation report.
pub fn validation_message(details: &CheckoutDetails) -> Option<String> {
    let report = details.validate().err()?;
    report
        .field_errors()
        .into_values()
        .flatten()
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .or_else(|| Some("Please fill all required fields.".to_string()))
}

fn order_number() -> String {
    format!("FLM-{}", rand::thread_rng().gen_range(1000..10000))
}

/// Validates the form, persists a new Pending order, then clears the cart
/// and prepends the order to the local history. On any failure the cart is
/// left untouched.
pub async fn place_order(
    gateway: &dyn RecordGateway,
    catalog: &mut CatalogStore,
    cart: &mut Cart,
    details: &CheckoutDetails,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::Invalid("Your cart is empty.".to_string()));
    }
    if let Some(message) = validation_message(details) {
        return Err(CheckoutError::Invalid(message));
    }

    let now = Utc::now();
    let order = Order {
        id: order_number(),
        date: now.format("%d %b %Y, %I:%M %p").to_string(),
        created_at: Some(now),
        status: OrderStatus::Pending,
        items: cart.items().to_vec(),
        total: cart.total(),
        payment_method: details.payment_method.clone(),
        transaction_id: details.transaction_id.clone(),
        customer_name: details.customer_name.clone(),
        customer_phone: details.customer_phone.clone(),
        customer_email: details.customer_email.clone(),
    };

    gateway
        .insert(
            Collection::Orders,
            json!({
                "id": &order.id,
                "date": &order.date,
                "created_at": now.to_rfc3339(),
                "status": order.status.to_string(),
                "items": &order.items,
                "total": order.total,
                "payment_method": &order.payment_method,
                "transaction_id": &order.transaction_id,
                "customer_name": &order.customer_name,
                "customer_phone": &order.customer_phone,
                "customer_email": &order.customer_email,
            }),
        )
        .await?;

    tracing::info!(order = %order.id, total = %order.total, "order placed");
    cart.clear();
    catalog.prepend_order(order.clone());
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use rust_decimal::Decimal;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            customer_name: "Rahim".into(),
            customer_phone: "01700-000000".into(),
            customer_email: "rahim@example.com".into(),
            payment_method: "bKash".into(),
            transaction_id: "TXN123".into(),
        }
    }

    async fn loaded_cart() -> (CatalogStore, Cart, MemoryGateway) {
        let gw = MemoryGateway::new();
        crate::catalog::seed_demo_data(&gw).await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;
        let mut cart = Cart::new();
        let p = catalog.product(101).cloned().unwrap();
        cart.add(&p, 0).unwrap();
        (catalog, cart, gw)
    }

    #[tokio::test]
    async fn placement_clears_cart_and_prepends() {
        let (mut catalog, mut cart, gw) = loaded_cart().await;
        let order = place_order(&gw, &mut catalog, &mut cart, &details())
            .await
            .unwrap();
        assert!(order.id.starts_with("FLM-"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Decimal::from(600u32));
        assert!(cart.is_empty());
        assert_eq!(catalog.orders()[0].id, order.id);

        // the persisted row carries the denormalized snapshot
        let rows = gw
            .select(Collection::Orders, crate::gateway::Select::all())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["items"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn persist_failure_leaves_cart_untouched() {
        let (mut catalog, mut cart, gw) = loaded_cart().await;
        let before = cart.items().to_vec();
        gw.set_fail_writes(true);
        let err = place_order(&gw, &mut catalog, &mut cart, &details()).await;
        assert!(matches!(err, Err(CheckoutError::Persist(_))));
        assert_eq!(cart.items(), before.as_slice());
        assert!(catalog.orders().is_empty());
    }

    #[tokio::test]
    async fn invalid_details_never_reach_the_gateway() {
        let (mut catalog, mut cart, gw) = loaded_cart().await;
        let mut bad = details();
        bad.customer_email = "not-an-email".into();
        let err = place_order(&gw, &mut catalog, &mut cart, &bad).await;
        assert!(matches!(err, Err(CheckoutError::Invalid(_))));
        assert!(gw
            .select(Collection::Orders, crate::gateway::Select::all())
            .await
            .unwrap()
            .is_empty());
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let gw = MemoryGateway::new();
        let mut catalog = CatalogStore::new();
        let mut cart = Cart::new();
        let err = place_order(&gw, &mut catalog, &mut cart, &details()).await;
        assert!(matches!(err, Err(CheckoutError::Invalid(_))));
    }

    #[test]
    fn validation_messages_are_user_facing() {
        let mut d = details();
        d.customer_name.clear();
        let msg = validation_message(&d).unwrap();
        assert_eq!(msg, "Please enter your name.");
        assert!(validation_message(&details()).is_none());
    }
}
