//! Catalog snapshot
//!
//! One explicitly owned copy of the remote catalog. `refresh` is the only
//! way data enters; every query is a pure projection over the snapshot,
//! recomputed per call and never cached.

use serde_json::json;

use crate::domain::{Category, Order, PaymentMethod, Product};
use crate::fallback;
use crate::gateway::{Collection, RecordGateway, Select, SortDir};
use crate::sanitize;

#[derive(Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    categories: Vec<Category>,
    payment_methods: Vec<PaymentMethod>,
    orders: Vec<Order>,
    loaded: bool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale re-fetch of every collection. Failed or empty reads degrade
    /// to the bundled fallback where one exists; the order history has no
    /// fallback and keeps its previous contents on failure.
    pub async fn refresh(&mut self, gateway: &dyn RecordGateway) {
        match gateway
            .select(Collection::Products, Select::all().order("id", SortDir::Desc))
            .await
        {
            Ok(rows) => {
                self.products = rows.iter().map(sanitize::product_from_record).collect();
            }
            Err(err) => {
                tracing::warn!(%err, "product fetch failed, serving fallback catalog");
                self.products = fallback::fallback_products();
            }
        }

        match gateway
            .select(Collection::Categories, Select::all().order("id", SortDir::Asc))
            .await
        {
            Ok(rows) if !rows.is_empty() => {
                self.categories = rows.iter().map(sanitize::category_from_record).collect();
            }
            Ok(_) => self.categories = fallback::fallback_categories(),
            Err(err) => {
                tracing::warn!(%err, "category fetch failed, serving fallback categories");
                self.categories = fallback::fallback_categories();
            }
        }

        match gateway
            .select(
                Collection::PaymentMethods,
                Select::all().eq("is_active", true).order("id", SortDir::Asc),
            )
            .await
        {
            Ok(rows) if !rows.is_empty() => {
                self.payment_methods = rows
                    .iter()
                    .map(sanitize::payment_method_from_record)
                    .collect();
            }
            Ok(_) => self.payment_methods = fallback::fallback_payment_methods(),
            Err(err) => {
                tracing::warn!(%err, "payment method fetch failed, serving fallback gateways");
                self.payment_methods = fallback::fallback_payment_methods();
            }
        }

        match gateway
            .select(
                Collection::Orders,
                Select::all().order("created_at", SortDir::Desc),
            )
            .await
        {
            Ok(rows) => {
                self.orders = rows.iter().map(sanitize::order_from_record).collect();
            }
            Err(err) => {
                tracing::warn!(%err, "order fetch failed, keeping existing history");
            }
        }

        self.loaded = true;
        tracing::debug!(
            products = self.products.len(),
            categories = self.categories.len(),
            orders = self.orders.len(),
            "catalog refreshed"
        );
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn product(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Optimistic local insert after a successful placement; no re-fetch.
    pub fn prepend_order(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    pub fn hot_deals(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_hot_deal).collect()
    }

    /// Hot deals doubled back to back, for a seamless marquee loop.
    pub fn marquee_hot_deals(&self) -> Vec<&Product> {
        let deals = self.hot_deals();
        deals.iter().chain(deals.iter()).copied().collect()
    }

    /// Category names that contain at least one featured product, in the
    /// order the products first mention them.
    pub fn featured_categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for p in self.products.iter().filter(|p| p.is_featured) {
            if !names.contains(&p.category.as_str()) {
                names.push(&p.category);
            }
        }
        names
    }

    pub fn featured_in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_featured && p.category == category)
            .collect()
    }

    /// Manually curated list first, in its stored order; otherwise up to
    /// four products from the same category, excluding the product itself.
    pub fn related_products(&self, product: &Product) -> Vec<&Product> {
        let manual: Vec<&Product> = product
            .related_product_ids
            .iter()
            .filter_map(|id| self.product(*id))
            .collect();
        if !manual.is_empty() {
            return manual;
        }
        self.products
            .iter()
            .filter(|p| p.category_slug == product.category_slug && p.id != product.id)
            .take(4)
            .collect()
    }

    /// Replaces one order in place, for status edits from the console.
    pub fn replace_order(&mut self, order: Order) {
        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == order.id) {
            *existing = order;
        }
    }
}

/// Seeds a gateway with the bundled fallback catalog. Used by the demo
/// binary and integration tests.
pub async fn seed_demo_data(gateway: &crate::gateway::MemoryGateway) {
    gateway
        .seed(
            Collection::Products,
            fallback::fallback_products()
                .iter()
                .map(|p| serde_json::to_value(p).unwrap_or_else(|_| json!({})))
                .collect(),
        )
        .await;
    gateway
        .seed(
            Collection::Categories,
            fallback::fallback_categories()
                .iter()
                .map(|c| serde_json::to_value(c).unwrap_or_else(|_| json!({})))
                .collect(),
        )
        .await;
    gateway
        .seed(
            Collection::PaymentMethods,
            fallback::fallback_payment_methods()
                .iter()
                .map(|m| serde_json::to_value(m).unwrap_or_else(|_| json!({})))
                .collect(),
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    async fn empty_backend() -> CatalogStore {
        let gw = MemoryGateway::new();
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;
        catalog
    }

    #[tokio::test]
    async fn empty_backend_serves_fallback_categories_and_gateways() {
        let catalog = empty_backend().await;
        assert!(catalog.is_loaded());
        // products come back empty (an empty table is a valid catalog)...
        assert!(catalog.products().is_empty());
        // ...but categories and payment methods fall back
        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.payment_methods().len(), 4);
    }

    #[tokio::test]
    async fn refresh_sanitizes_and_orders_products() {
        let gw = MemoryGateway::new();
        gw.seed(
            Collection::Products,
            vec![
                json!({"id": 1, "name": 42, "pricing": null}),
                json!({"id": 2, "name": "Real", "pricing": [{"duration": "1 Month", "price": 600}]}),
            ],
        )
        .await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;
        assert_eq!(catalog.products()[0].id, 2); // id desc
        assert_eq!(catalog.products()[1].name, "42");
        assert!(catalog.products()[1].pricing.is_empty());
    }

    #[tokio::test]
    async fn demo_seed_round_trips() {
        let gw = MemoryGateway::new();
        seed_demo_data(&gw).await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.product(101).map(|p| p.name.as_str()), Some("ChatGPT Plus"));
        assert_eq!(catalog.hot_deals().len(), 2);
        assert_eq!(catalog.marquee_hot_deals().len(), 4);
    }

    #[tokio::test]
    async fn related_products_prefers_manual_list_order() {
        let gw = MemoryGateway::new();
        seed_demo_data(&gw).await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;

        // same-category fallback: chatgpt relates to midjourney only
        let chatgpt = catalog.product(101).cloned().unwrap();
        let related: Vec<u32> = catalog.related_products(&chatgpt).iter().map(|p| p.id).collect();
        assert_eq!(related, vec![102]);

        // manual curation wins and keeps its stored order
        let mut curated = chatgpt.clone();
        curated.related_product_ids = vec![301, 201];
        let related: Vec<u32> = catalog.related_products(&curated).iter().map(|p| p.id).collect();
        assert_eq!(related, vec![301, 201]);

        // every manual id stale: the list resolves empty, so the
        // same-category fallback applies again
        let mut stale = chatgpt;
        stale.related_product_ids = vec![999];
        let related: Vec<u32> = catalog.related_products(&stale).iter().map(|p| p.id).collect();
        assert_eq!(related, vec![102]);
    }

    #[tokio::test]
    async fn featured_projections() {
        let gw = MemoryGateway::new();
        gw.seed(
            Collection::Products,
            vec![
                json!({"id": 1, "name": "A", "category": "Design Tools", "is_featured": true}),
                json!({"id": 2, "name": "B", "category": "AI Tools", "is_featured": true}),
                json!({"id": 3, "name": "C", "category": "Design Tools", "is_featured": true}),
                json!({"id": 4, "name": "D", "category": "Courses", "is_featured": false}),
            ],
        )
        .await;
        let mut catalog = CatalogStore::new();
        catalog.refresh(&gw).await;

        // first-seen order over id-desc products
        assert_eq!(catalog.featured_categories(), vec!["Design Tools", "AI Tools"]);
        assert_eq!(catalog.featured_in_category("Design Tools").len(), 2);
        assert!(catalog.featured_in_category("Courses").is_empty());
    }

    #[tokio::test]
    async fn prepend_and_replace_orders() {
        let mut catalog = CatalogStore::new();
        let order = sanitize::order_from_record(&json!({"id": "FLM-1", "status": "Pending"}));
        catalog.prepend_order(order.clone());
        let mut updated = order;
        updated.status = crate::domain::OrderStatus::Processing;
        catalog.replace_order(updated);
        assert_eq!(
            catalog.orders()[0].status,
            crate::domain::OrderStatus::Processing
        );
    }
}
