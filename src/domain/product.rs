//! Product and its pricing tiers

use rust_decimal::Decimal;
use serde::Serialize;

/// One purchasable duration+price combination for a product.
///
/// `stock` of `None` means the tier is untracked (unlimited for cart
/// purposes); the inventory editor treats it as zero when recomputing the
/// product-level `stock_out` flag, mirroring how the admin forms fill
/// missing counts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingOption {
    /// Display label, e.g. "1 Month". Also the cart merge key per product.
    pub duration: String,
    pub duration_days: u32,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl PricingOption {
    /// Tracked and empty. Untracked tiers are never exhausted for shoppers.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.stock, Some(0))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub category_slug: String,
    pub description: String,
    pub short_description: String,
    pub image: String,
    pub pricing: Vec<PricingOption>,
    pub rating: f64,
    pub reviews: u32,
    pub sold: String,
    pub stock_out: bool,
    pub is_featured: bool,
    pub is_hot_deal: bool,
    pub hot_deal_title: String,
    pub related_product_ids: Vec<u32>,
}

impl Product {
    pub fn tier(&self, index: usize) -> Option<&PricingOption> {
        self.pricing.get(index)
    }

    /// The inventory-save rule: `stock_out` is true iff every tier has no
    /// stock left, counting an untracked tier as zero.
    pub fn all_tiers_exhausted(pricing: &[PricingOption]) -> bool {
        pricing.iter().all(|t| t.stock.unwrap_or(0) == 0)
    }

    pub fn first_price(&self) -> Decimal {
        self.pricing
            .first()
            .map(|t| t.price)
            .unwrap_or(Decimal::ZERO)
    }
}
