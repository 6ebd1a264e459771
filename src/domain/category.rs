//! Product categories

use serde::Serialize;

/// Referenced by products through the denormalized `category` name string,
/// not a foreign key. Renaming a category does not cascade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub icon: String,
}

/// Slug generation used by both category and product writers.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
