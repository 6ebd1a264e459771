//! Cart & pricing engine
//!
//! Stock enforcement here is advisory: it is evaluated against the
//! last-fetched catalog snapshot only, and nothing re-validates at checkout.
//! Concurrent shoppers are not serialized against each other; the design
//! accepts oversell risk in exchange for simplicity.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::Product;

/// Session-scoped line item. Two additions of the same product+tier merge
/// into one line by incrementing quantity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItem {
    /// Unique within a session: product id + tier index + creation time.
    pub id: String,
    pub product_id: u32,
    pub name: String,
    /// The chosen tier's duration label; the merge key alongside product id.
    pub subtitle: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

/// Soft validation failures on the cart-mutation path. Surfaced as notices,
/// never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("This product is currently out of stock.")]
    ProductOutOfStock,

    #[error("Sorry, the \"{0}\" option is out of stock.")]
    TierOutOfStock(String),

    #[error("You cannot add more of this item. Only {0} available.")]
    TierLimitReached(u32),

    #[error("This product has no such pricing option.")]
    UnknownTier,
}

#[derive(Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines, for the header badge.
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Recomputed on every read, never cached.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    /// Adds one unit of the selected tier, merging into an existing line
    /// when product and tier match. Rejects when the product is globally
    /// out of stock, the tier is exhausted, or the merge would exceed the
    /// tier's remaining stock.
    pub fn add<'a>(
        &'a mut self,
        product: &Product,
        tier_index: usize,
    ) -> Result<&'a CartItem, CartError> {
        if product.stock_out {
            return Err(CartError::ProductOutOfStock);
        }
        let tier = product.tier(tier_index).ok_or(CartError::UnknownTier)?;
        if tier.is_exhausted() {
            return Err(CartError::TierOutOfStock(tier.duration.clone()));
        }

        if let Some(pos) = self
            .items
            .iter()
            .position(|i| i.product_id == product.id && i.subtitle == tier.duration)
        {
            if let Some(stock) = tier.stock {
                if self.items[pos].quantity + 1 > stock {
                    return Err(CartError::TierLimitReached(stock));
                }
            }
            self.items[pos].quantity += 1;
            return Ok(&self.items[pos]);
        }

        self.items.push(CartItem {
            id: format!(
                "{}-{}-{}",
                product.id,
                tier_index,
                Utc::now().timestamp_millis()
            ),
            product_id: product.id,
            name: product.name.clone(),
            subtitle: tier.duration.clone(),
            price: tier.price,
            image: product.image.clone(),
            quantity: 1,
        });
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Clamps at a minimum of 1; removal is a separate explicit operation.
    pub fn update_quantity(&mut self, line_id: &str, delta: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == line_id) {
            item.quantity = (i64::from(item.quantity) + delta).max(1) as u32;
        }
    }

    pub fn remove(&mut self, line_id: &str) {
        self.items.retain(|i| i.id != line_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
