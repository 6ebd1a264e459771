//! Sanitization of remote records
//!
//! Backend rows arrive as arbitrary JSON: text columns may hold numbers,
//! nulls or nested structures, list columns may be missing entirely. Every
//! decoder here is total — it never fails, it only narrows the value space
//! so downstream consumers always see strings where strings are expected
//! and arrays where arrays are expected.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::cart::CartItem;
use crate::domain::{Category, Order, OrderStatus, PaymentMethod, PricingOption, Product, Review};

/// String → itself, number → decimal string, null/absent → "", anything
/// else → its JSON text.
pub fn safe_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Array → itself, anything else → empty.
pub fn safe_array(value: &Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

pub fn safe_bool(value: &Value) -> bool {
    value.as_bool().unwrap_or(false)
}

pub fn safe_u32(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

pub fn safe_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn safe_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n.to_string().parse().unwrap_or(Decimal::ZERO),
        Value::String(s) => s.parse().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Null/absent/negative → None; otherwise the count.
fn opt_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|v| v as u32).or(Some(0)),
        _ => None,
    }
}

fn get<'a>(record: &'a Value, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&Value::Null)
}

pub fn pricing_from_record(record: &Value) -> PricingOption {
    PricingOption {
        duration: safe_string(get(record, "duration")),
        duration_days: safe_u32(get(record, "duration_days")),
        price: safe_decimal(get(record, "price")),
        stock: opt_u32(get(record, "stock")),
    }
}

pub fn product_from_record(record: &Value) -> Product {
    Product {
        id: safe_u32(get(record, "id")),
        name: safe_string(get(record, "name")),
        slug: safe_string(get(record, "slug")),
        category: safe_string(get(record, "category")),
        category_slug: safe_string(get(record, "category_slug")),
        description: safe_string(get(record, "description")),
        short_description: safe_string(get(record, "short_description")),
        image: safe_string(get(record, "image")),
        pricing: safe_array(get(record, "pricing"))
            .iter()
            .map(pricing_from_record)
            .collect(),
        rating: safe_f64(get(record, "rating")),
        reviews: safe_u32(get(record, "reviews")),
        sold: safe_string(get(record, "sold")),
        stock_out: safe_bool(get(record, "stock_out")),
        is_featured: safe_bool(get(record, "is_featured")),
        is_hot_deal: safe_bool(get(record, "is_hot_deal")),
        hot_deal_title: safe_string(get(record, "hot_deal_title")),
        related_product_ids: safe_array(get(record, "related_product_ids"))
            .iter()
            .filter_map(Value::as_u64)
            .map(|id| id as u32)
            .collect(),
    }
}

pub fn category_from_record(record: &Value) -> Category {
    Category {
        id: safe_u32(get(record, "id")),
        name: safe_string(get(record, "name")),
        slug: safe_string(get(record, "slug")),
        icon: safe_string(get(record, "icon")),
    }
}

pub fn payment_method_from_record(record: &Value) -> PaymentMethod {
    PaymentMethod {
        id: safe_u32(get(record, "id")),
        name: safe_string(get(record, "name")),
        number: safe_string(get(record, "number")),
        instructions: safe_string(get(record, "instructions")),
        is_custom: safe_bool(get(record, "is_custom")),
        is_active: safe_bool(get(record, "is_active")),
    }
}

pub fn cart_item_from_record(record: &Value) -> CartItem {
    CartItem {
        id: safe_string(get(record, "id")),
        product_id: safe_u32(get(record, "product_id")),
        name: safe_string(get(record, "name")),
        subtitle: safe_string(get(record, "subtitle")),
        price: safe_decimal(get(record, "price")),
        image: safe_string(get(record, "image")),
        quantity: safe_u32(get(record, "quantity")),
    }
}

pub fn order_from_record(record: &Value) -> Order {
    Order {
        id: safe_string(get(record, "id")),
        date: safe_string(get(record, "date")),
        created_at: get(record, "created_at")
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        status: OrderStatus::parse(&safe_string(get(record, "status"))),
        items: safe_array(get(record, "items"))
            .iter()
            .map(cart_item_from_record)
            .collect(),
        total: safe_decimal(get(record, "total")),
        payment_method: safe_string(get(record, "payment_method")),
        transaction_id: safe_string(get(record, "transaction_id")),
        customer_name: safe_string(get(record, "customer_name")),
        customer_phone: safe_string(get(record, "customer_phone")),
        customer_email: safe_string(get(record, "customer_email")),
    }
}

pub fn review_from_record(record: &Value) -> Review {
    Review {
        id: safe_u32(get(record, "id")),
        product_id: safe_u32(get(record, "product_id")),
        customer_name: safe_string(get(record, "customer_name")),
        rating: safe_u32(get(record, "rating")).min(5) as u8,
        comment: safe_string(get(record, "comment")),
        created_at: safe_string(get(record, "created_at")),
        likes: safe_u32(get(record, "likes")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_string_is_total() {
        assert_eq!(safe_string(&Value::Null), "");
        assert_eq!(safe_string(&json!("text")), "text");
        assert_eq!(safe_string(&json!(42)), "42");
        assert_eq!(safe_string(&json!(4.5)), "4.5");
        assert_eq!(safe_string(&json!({"a": 1})), "{\"a\":1}");
        assert_eq!(safe_string(&json!([1, 2])), "[1,2]");
        assert_eq!(safe_string(&json!(true)), "true");
    }

    #[test]
    fn safe_array_is_total() {
        assert_eq!(safe_array(&Value::Null), Vec::<Value>::new());
        assert_eq!(safe_array(&json!("nope")), Vec::<Value>::new());
        assert_eq!(safe_array(&json!([1])), vec![json!(1)]);
    }

    #[test]
    fn product_decoding_survives_hostile_fields() {
        let product = product_from_record(&json!({
            "id": 101,
            "name": 12345,
            "category": null,
            "description": {"rich": "text"},
            "pricing": "not-an-array",
            "related_product_ids": null,
            "sold": 500
        }));
        assert_eq!(product.name, "12345");
        assert_eq!(product.category, "");
        assert_eq!(product.description, "{\"rich\":\"text\"}");
        assert!(product.pricing.is_empty());
        assert!(product.related_product_ids.is_empty());
        assert_eq!(product.sold, "500");
    }

    #[test]
    fn pricing_stock_absent_means_untracked() {
        let tracked = pricing_from_record(&json!({"duration": "1 Month", "price": 600, "stock": 0}));
        assert_eq!(tracked.stock, Some(0));
        let untracked = pricing_from_record(&json!({"duration": "1 Month", "price": 600}));
        assert_eq!(untracked.stock, None);
        assert_eq!(untracked.price, rust_decimal::Decimal::new(600, 0));
    }

    #[test]
    fn order_decoding() {
        let order = order_from_record(&json!({
            "id": "FLM-9421",
            "status": "Completed",
            "total": 850,
            "created_at": "2023-10-12T14:30:00Z",
            "items": [
                {"id": "o1", "product_id": 101, "name": "ChatGPT Plus",
                 "subtitle": "1 Month", "price": 600, "quantity": 1}
            ]
        }));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, 101);
        assert!(order.created_at.is_some());
        // transaction metadata absent from the row is still a string
        assert_eq!(order.transaction_id, "");
    }
}
