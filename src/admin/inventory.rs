//! Inventory editor
//!
//! Stock edits stage a deep copy of the product's whole pricing array and
//! commit per product. A commit overwrites the array, recomputes the
//! product-level `stock_out` flag and re-fetches the catalog. A failed
//! commit keeps the staged copy so nothing typed is lost.

use serde_json::json;

use super::pending::PendingChanges;
use super::session::{AdminContext, AdminError};
use crate::catalog::CatalogStore;
use crate::domain::{PricingOption, Product};
use crate::gateway::{Collection, RecordGateway};

#[derive(Default)]
pub struct InventoryEditor {
    pending: PendingChanges<u32, Vec<PricingOption>>,
}

impl InventoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a stock count for one tier. The first edit to a product
    /// copies its current pricing array; later edits mutate the copy.
    pub fn set_stock(
        &mut self,
        catalog: &CatalogStore,
        product_id: u32,
        tier_index: usize,
        stock: u32,
    ) {
        let Some(product) = catalog.product(product_id) else {
            return;
        };
        let staged = self
            .pending
            .entry_or(product_id, || product.pricing.clone());
        if let Some(tier) = staged.get_mut(tier_index) {
            tier.stock = Some(stock);
        }
    }

    /// The pricing the screen should show: staged copy when dirty,
    /// authoritative otherwise.
    pub fn effective_pricing<'a>(
        &'a self,
        catalog: &'a CatalogStore,
        product_id: u32,
    ) -> Option<&'a [PricingOption]> {
        if let Some(staged) = self.pending.get(product_id) {
            return Some(staged);
        }
        catalog.product(product_id).map(|p| p.pricing.as_slice())
    }

    pub fn is_dirty(&self, product_id: u32) -> bool {
        self.pending.is_dirty(product_id)
    }

    /// Products with uncommitted edits, for the screen's unsaved badge.
    pub fn dirty_products(&self) -> Vec<u32> {
        self.pending.dirty_keys()
    }

    pub fn discard(&mut self, product_id: u32) {
        self.pending.discard(product_id);
    }

    /// Case-insensitive name/category filter for the inventory screen.
    pub fn search<'a>(&self, catalog: &'a CatalogStore, query: &str) -> Vec<&'a Product> {
        let needle = query.to_lowercase();
        catalog
            .products()
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Commits the staged pricing for one product.
    pub async fn save(
        &mut self,
        admin: &AdminContext,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        product_id: u32,
    ) -> Result<(), AdminError> {
        let Some(pricing) = self.pending.take(product_id) else {
            return Ok(());
        };
        let stock_out = Product::all_tiers_exhausted(&pricing);
        let result = gateway
            .update(
                Collection::Products,
                json!(product_id),
                json!({"pricing": pricing, "stock_out": stock_out}),
            )
            .await;
        if let Err(err) = result {
            // keep the edit so the admin can retry
            self.pending.stage(product_id, pricing);
            return Err(err.into());
        }
        tracing::info!(admin = %admin.email(), product = product_id, stock_out, "inventory saved");
        catalog.refresh(gateway).await;
        Ok(())
    }
}
