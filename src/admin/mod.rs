//! Embedded admin console
//!
//! Privileged operations live on [`AdminContext`], which can only be
//! constructed through a successful sign-in. Bulk edit screens stage their
//! changes in [`PendingChanges`] and commit per record.

mod console;
mod cross_sell;
mod hot_deals;
mod inventory;
mod pending;
mod session;

pub use console::{CategoryDraft, PaymentMethodDraft, ProductDraft};
pub use cross_sell::CrossSellEditor;
pub use hot_deals::{HotDealEditor, HotDealUpdate};
pub use inventory::InventoryEditor;
pub use pending::PendingChanges;
pub use session::{AdminContext, AdminError};
