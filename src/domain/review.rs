//! Customer reviews

use serde::Serialize;

/// Rating/comment/name/timestamp come from the backend; like counts are
/// adjusted device-locally on display and never written back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Review {
    pub id: u32,
    pub product_id: u32,
    pub customer_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub likes: u32,
}
