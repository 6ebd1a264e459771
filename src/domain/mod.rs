//! Domain types
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;

pub use category::{slugify, Category};
pub use order::{Order, OrderStatus};
pub use payment::PaymentMethod;
pub use product::{PricingOption, Product};
pub use review::Review;
