//! Hot-deal editor

use serde_json::json;

use super::pending::PendingChanges;
use super::session::{AdminContext, AdminError};
use crate::catalog::CatalogStore;
use crate::gateway::{Collection, RecordGateway};

/// The pair of fields the hot-deal screen edits together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotDealUpdate {
    pub is_hot_deal: bool,
    pub hot_deal_title: String,
}

#[derive(Default)]
pub struct HotDealEditor {
    pending: PendingChanges<u32, HotDealUpdate>,
}

impl HotDealEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn seed(catalog: &CatalogStore, product_id: u32) -> HotDealUpdate {
        catalog
            .product(product_id)
            .map(|p| HotDealUpdate {
                is_hot_deal: p.is_hot_deal,
                hot_deal_title: p.hot_deal_title.clone(),
            })
            .unwrap_or(HotDealUpdate {
                is_hot_deal: false,
                hot_deal_title: String::new(),
            })
    }

    pub fn toggle(&mut self, catalog: &CatalogStore, product_id: u32) {
        let staged = self
            .pending
            .entry_or(product_id, || Self::seed(catalog, product_id));
        staged.is_hot_deal = !staged.is_hot_deal;
    }

    pub fn set_title(&mut self, catalog: &CatalogStore, product_id: u32, title: &str) {
        let staged = self
            .pending
            .entry_or(product_id, || Self::seed(catalog, product_id));
        staged.hot_deal_title = title.to_string();
    }

    /// What the screen shows: staged when dirty, authoritative otherwise.
    pub fn effective(&self, catalog: &CatalogStore, product_id: u32) -> HotDealUpdate {
        self.pending
            .get(product_id)
            .cloned()
            .unwrap_or_else(|| Self::seed(catalog, product_id))
    }

    pub fn is_dirty(&self, product_id: u32) -> bool {
        self.pending.is_dirty(product_id)
    }

    pub fn discard(&mut self, product_id: u32) {
        self.pending.discard(product_id);
    }

    pub async fn save(
        &mut self,
        admin: &AdminContext,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        product_id: u32,
    ) -> Result<(), AdminError> {
        let Some(update) = self.pending.take(product_id) else {
            return Ok(());
        };
        let result = gateway
            .update(
                Collection::Products,
                json!(product_id),
                json!({
                    "is_hot_deal": update.is_hot_deal,
                    "hot_deal_title": update.hot_deal_title,
                }),
            )
            .await;
        if let Err(err) = result {
            self.pending.stage(product_id, update);
            return Err(err.into());
        }
        tracing::info!(admin = %admin.email(), product = product_id, "hot deal saved");
        catalog.refresh(gateway).await;
        Ok(())
    }
}
