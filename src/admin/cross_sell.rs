//! Cross-sell curation
//!
//! Picks a target product, then toggles other products in and out of its
//! manual related list. The list is written whole on commit, and its order
//! is the order items were toggled in, which the storefront preserves.

use serde_json::json;

use super::pending::PendingChanges;
use super::session::{AdminContext, AdminError};
use crate::catalog::CatalogStore;
use crate::domain::Product;
use crate::gateway::{Collection, RecordGateway};

#[derive(Default)]
pub struct CrossSellEditor {
    target: Option<u32>,
    pending: PendingChanges<u32, Vec<u32>>,
}

impl CrossSellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    /// Selecting a target seeds its staged list from the catalog; switching
    /// targets keeps other products' staged lists untouched.
    pub fn select_target(&mut self, catalog: &CatalogStore, product_id: u32) {
        let Some(product) = catalog.product(product_id) else {
            return;
        };
        self.target = Some(product_id);
        let related = product.related_product_ids.clone();
        self.pending.entry_or(product_id, || related);
    }

    pub fn staged(&self) -> &[u32] {
        self.target
            .and_then(|t| self.pending.get(t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adds or removes a product from the target's list. The target itself
    /// can never be its own cross-sell.
    pub fn toggle(&mut self, product_id: u32) {
        let Some(target) = self.target else { return };
        if product_id == target {
            return;
        }
        let staged = self.pending.entry_or(target, Vec::new);
        if let Some(pos) = staged.iter().position(|id| *id == product_id) {
            staged.remove(pos);
        } else {
            staged.push(product_id);
        }
    }

    /// Everything except the target, currently selected products first in
    /// their staged order.
    pub fn candidates<'a>(&self, catalog: &'a CatalogStore) -> Vec<&'a Product> {
        let Some(target) = self.target else {
            return Vec::new();
        };
        let staged = self.staged();
        let mut out: Vec<&Product> = staged
            .iter()
            .filter_map(|id| catalog.product(*id))
            .collect();
        out.extend(
            catalog
                .products()
                .iter()
                .filter(|p| p.id != target && !staged.contains(&p.id)),
        );
        out
    }

    pub fn is_dirty(&self) -> bool {
        self.target.map(|t| self.pending.is_dirty(t)).unwrap_or(false)
    }

    pub fn discard(&mut self) {
        if let Some(target) = self.target {
            self.pending.discard(target);
        }
    }

    pub async fn save(
        &mut self,
        admin: &AdminContext,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
    ) -> Result<(), AdminError> {
        let Some(target) = self.target else {
            return Ok(());
        };
        let Some(related) = self.pending.take(target) else {
            return Ok(());
        };
        let result = gateway
            .update(
                Collection::Products,
                json!(target),
                json!({"related_product_ids": related}),
            )
            .await;
        if let Err(err) = result {
            self.pending.stage(target, related);
            return Err(err.into());
        }
        tracing::info!(admin = %admin.email(), product = target, "cross-sell list saved");
        catalog.refresh(gateway).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    async fn setup() -> (MemoryGateway, CatalogStore, AdminContext) {
        let gw = MemoryGateway::new();
        gw.add_account("admin@flamemart.example", "hunter2").await;
        crate::catalog::seed_demo_data(&gw).await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;
        let admin = AdminContext::sign_in(&gw, "admin@flamemart.example", "hunter2")
            .await
            .unwrap();
        (gw, catalog, admin)
    }

    #[tokio::test]
    async fn toggle_order_is_preserved_through_save() {
        let (gw, mut catalog, admin) = setup().await;
        let mut editor = CrossSellEditor::new();
        editor.select_target(&catalog, 101);
        editor.toggle(301);
        editor.toggle(201);
        assert_eq!(editor.staged(), &[301, 201]);

        editor.save(&admin, &gw, &mut catalog).await.unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(
            catalog.product(101).unwrap().related_product_ids,
            vec![301, 201]
        );

        // the storefront serves the curated list in the same order
        let target = catalog.product(101).cloned().unwrap();
        let shown: Vec<u32> = catalog
            .related_products(&target)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(shown, vec![301, 201]);
    }

    #[tokio::test]
    async fn target_is_never_a_candidate_nor_toggleable() {
        let (_gw, catalog, _admin) = setup().await;
        let mut editor = CrossSellEditor::new();
        editor.select_target(&catalog, 101);
        editor.toggle(101); // ignored
        assert!(editor.staged().is_empty());
        assert!(editor.candidates(&catalog).iter().all(|p| p.id != 101));
    }

    #[tokio::test]
    async fn candidates_list_selected_first() {
        let (_gw, catalog, _admin) = setup().await;
        let mut editor = CrossSellEditor::new();
        editor.select_target(&catalog, 101);
        editor.toggle(301);
        let ids: Vec<u32> = editor.candidates(&catalog).iter().map(|p| p.id).collect();
        assert_eq!(ids[0], 301);
        assert_eq!(ids.len(), 3); // everything but the target
    }

    #[tokio::test]
    async fn double_toggle_and_discard_revert() {
        let (_gw, catalog, _admin) = setup().await;
        let mut editor = CrossSellEditor::new();
        editor.select_target(&catalog, 101);
        editor.toggle(301);
        editor.toggle(301);
        assert!(editor.staged().is_empty());

        editor.toggle(201);
        editor.discard();
        assert!(!editor.is_dirty());
        assert!(editor.staged().is_empty());
    }
}
