//! Flamemart storefront core
//!
//! Business-rule layer for a digital-goods marketplace with an embedded
//! admin console. Persistence, authentication and file storage are provided
//! by a hosted backend, consumed through the [`gateway`] traits.
//!
//! ## Features
//! - Catalog snapshot with wholesale refresh and static fallback
//! - Shopping cart with per-tier stock ceilings
//! - Order placement (denormalized snapshots, no inventory reconcile)
//! - Staged admin edits: inventory, hot deals, cross-sell
//! - Review subsystem with device-local like/ownership tracking

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod domain;
pub mod fallback;
pub mod gateway;
pub mod reviews;
pub mod router;
pub mod sanitize;

pub use cart::{Cart, CartError, CartItem};
pub use catalog::CatalogStore;
pub use checkout::{place_order, CheckoutDetails, CheckoutError};
pub use domain::{Category, Order, OrderStatus, PaymentMethod, PricingOption, Product, Review};
pub use gateway::{
    BlobStore, Collection, GatewayError, MemoryGateway, RecordGateway, Select, Session,
    SessionAuthority, SortDir,
};
pub use router::Route;
