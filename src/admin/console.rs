//! Console CRUD surface
//!
//! Product, category, payment-method, order, review and media management,
//! all as methods on [`AdminContext`]. Every write is followed by a catalog
//! re-fetch so the storefront and console read the same snapshot.

use serde_json::{json, Value};
use std::path::Path;
use uuid::Uuid;

use super::session::{AdminContext, AdminError};
use crate::catalog::CatalogStore;
use crate::domain::{slugify, OrderStatus, PaymentMethod, Product, Review};
use crate::gateway::{BlobInfo, BlobStore, Collection, RecordGateway, Select, SortDir};
use crate::sanitize;

/// Bucket holding product imagery.
const MEDIA_BUCKET: &str = "product-images";

/// Product form state. `id` of `None` means create. The related-products
/// list is deliberately absent: cross-sell curation owns that column and
/// a form save must not clobber it.
#[derive(Clone, Debug, Default)]
pub struct ProductDraft {
    pub id: Option<u32>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub short_description: String,
    pub image: String,
    pub pricing: Vec<crate::domain::PricingOption>,
    pub is_featured: bool,
    pub is_hot_deal: bool,
    pub hot_deal_title: String,
}

#[derive(Clone, Debug, Default)]
pub struct CategoryDraft {
    pub id: Option<u32>,
    pub name: String,
    pub icon: String,
}

#[derive(Clone, Debug, Default)]
pub struct PaymentMethodDraft {
    pub id: Option<u32>,
    pub name: String,
    pub number: String,
    /// Shown at checkout only when `is_custom`; otherwise the generated
    /// template applies and nothing is stored.
    pub custom_instructions: String,
    pub is_custom: bool,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub name: String,
    pub size: u64,
    pub url: String,
}

impl AdminContext {
    pub async fn save_product(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        draft: &ProductDraft,
    ) -> Result<(), AdminError> {
        if draft.name.trim().is_empty() || draft.pricing.is_empty() {
            return Err(AdminError::Invalid(
                "Please provide a name and at least one pricing option.".to_string(),
            ));
        }
        let category_slug = catalog
            .categories()
            .iter()
            .find(|c| c.name == draft.category)
            .map(|c| c.slug.clone())
            .unwrap_or_else(|| "misc".to_string());
        let stock_out = Product::all_tiers_exhausted(&draft.pricing);

        let mut record = json!({
            "name": draft.name.trim(),
            "slug": slugify(&draft.name),
            "category": draft.category,
            "category_slug": category_slug,
            "description": draft.description,
            "short_description": draft.short_description,
            "image": draft.image,
            "pricing": draft.pricing,
            "stock_out": stock_out,
            "is_featured": draft.is_featured,
            "is_hot_deal": draft.is_hot_deal,
            "hot_deal_title": draft.hot_deal_title,
        });

        match draft.id {
            Some(id) => {
                gateway
                    .update(Collection::Products, json!(id), record)
                    .await?;
                tracing::info!(admin = %self.email(), product = id, "product updated");
            }
            None => {
                // counters start from zero for a brand-new listing
                record["rating"] = json!(0.0);
                record["reviews"] = json!(0);
                record["sold"] = json!("0+");
                let stored = gateway.insert(Collection::Products, record).await?;
                tracing::info!(
                    admin = %self.email(),
                    product = stored.get("id").and_then(serde_json::Value::as_u64),
                    "product created"
                );
            }
        }
        catalog.refresh(gateway).await;
        Ok(())
    }

    pub async fn delete_product(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        product_id: u32,
    ) -> Result<(), AdminError> {
        gateway.delete(Collection::Products, json!(product_id)).await?;
        tracing::info!(admin = %self.email(), product = product_id, "product deleted");
        catalog.refresh(gateway).await;
        Ok(())
    }

    pub async fn save_category(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        draft: &CategoryDraft,
    ) -> Result<(), AdminError> {
        if draft.name.trim().is_empty() {
            return Err(AdminError::Invalid("Please enter a category name.".to_string()));
        }
        let record = json!({
            "name": draft.name.trim(),
            "slug": slugify(&draft.name),
            "icon": draft.icon,
        });
        match draft.id {
            Some(id) => gateway.update(Collection::Categories, json!(id), record).await?,
            None => {
                gateway.insert(Collection::Categories, record).await?;
            }
        }
        catalog.refresh(gateway).await;
        Ok(())
    }

    pub async fn delete_category(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        category_id: u32,
    ) -> Result<(), AdminError> {
        gateway.delete(Collection::Categories, json!(category_id)).await?;
        catalog.refresh(gateway).await;
        Ok(())
    }

    pub async fn save_payment_method(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        draft: &PaymentMethodDraft,
    ) -> Result<(), AdminError> {
        if draft.name.trim().is_empty() || draft.number.trim().is_empty() {
            return Err(AdminError::Invalid(
                "Please provide a gateway name and account number.".to_string(),
            ));
        }
        let instructions = if draft.is_custom {
            Value::from(draft.custom_instructions.clone())
        } else {
            Value::Null
        };
        let record = json!({
            "name": draft.name.trim(),
            "number": draft.number.trim(),
            "instructions": instructions,
            "is_custom": draft.is_custom,
            "is_active": draft.is_active,
        });
        match draft.id {
            Some(id) => {
                gateway
                    .update(Collection::PaymentMethods, json!(id), record)
                    .await?
            }
            None => {
                gateway.insert(Collection::PaymentMethods, record).await?;
            }
        }
        catalog.refresh(gateway).await;
        Ok(())
    }

    /// Active and inactive alike; the storefront only ever loads active ones.
    pub async fn list_payment_methods(
        &self,
        gateway: &dyn RecordGateway,
    ) -> Result<Vec<PaymentMethod>, AdminError> {
        let rows = gateway
            .select(
                Collection::PaymentMethods,
                Select::all().order("id", SortDir::Asc),
            )
            .await?;
        Ok(rows
            .iter()
            .map(sanitize::payment_method_from_record)
            .collect())
    }

    pub async fn delete_payment_method(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        method_id: u32,
    ) -> Result<(), AdminError> {
        gateway
            .delete(Collection::PaymentMethods, json!(method_id))
            .await?;
        catalog.refresh(gateway).await;
        Ok(())
    }

    /// Completed and Cancelled are terminal; the console refuses to move an
    /// order out of them.
    pub async fn update_order_status(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), AdminError> {
        let Some(order) = catalog.orders().iter().find(|o| o.id == order_id) else {
            return Err(AdminError::Invalid("Order not found.".to_string()));
        };
        if order.status.is_terminal() {
            return Err(AdminError::TerminalOrder);
        }
        gateway
            .update(
                Collection::Orders,
                json!(order_id),
                json!({"status": status.to_string()}),
            )
            .await?;
        tracing::info!(admin = %self.email(), order = order_id, %status, "order status updated");
        let mut updated = order.clone();
        updated.status = status;
        catalog.replace_order(updated);
        Ok(())
    }

    pub async fn delete_order(
        &self,
        gateway: &dyn RecordGateway,
        catalog: &mut CatalogStore,
        order_id: &str,
    ) -> Result<(), AdminError> {
        gateway.delete(Collection::Orders, json!(order_id)).await?;
        catalog.refresh(gateway).await;
        Ok(())
    }

    pub async fn list_reviews(
        &self,
        gateway: &dyn RecordGateway,
    ) -> Result<Vec<Review>, AdminError> {
        let rows = gateway
            .select(
                Collection::Reviews,
                Select::all().order("created_at", SortDir::Desc),
            )
            .await?;
        Ok(rows.iter().map(sanitize::review_from_record).collect())
    }

    pub async fn delete_review(
        &self,
        gateway: &dyn RecordGateway,
        review_id: u32,
    ) -> Result<(), AdminError> {
        gateway.delete(Collection::Reviews, json!(review_id)).await?;
        Ok(())
    }

    pub async fn list_media(&self, blobs: &dyn BlobStore) -> Result<Vec<MediaItem>, AdminError> {
        let files = blobs.list(MEDIA_BUCKET).await?;
        Ok(files
            .into_iter()
            .map(|BlobInfo { name, size }| MediaItem {
                url: blobs.public_url(MEDIA_BUCKET, &name),
                name,
                size,
            })
            .collect())
    }

    /// Stores under a randomized name (original extension kept) and returns
    /// the public URL for pasting into a product form.
    pub async fn upload_media(
        &self,
        blobs: &dyn BlobStore,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AdminError> {
        let stem = Uuid::new_v4().simple().to_string();
        let name = match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };
        blobs.upload(MEDIA_BUCKET, &name, bytes).await?;
        tracing::info!(admin = %self.email(), file = %name, "media uploaded");
        Ok(blobs.public_url(MEDIA_BUCKET, &name))
    }

    pub async fn delete_media(
        &self,
        blobs: &dyn BlobStore,
        name: &str,
    ) -> Result<(), AdminError> {
        blobs.remove(MEDIA_BUCKET, name).await?;
        Ok(())
    }
}
