//! Customer reviews and device-local preferences
//!
//! Reviews live on the backend; likes and review ownership are tracked in a
//! small JSON file on the device. Like counts shown to the user are the
//! stored count plus the device's own like, which is cosmetic and never
//! written back.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::Review;
use crate::gateway::{Collection, GatewayError, RecordGateway, Select, SortDir};
use crate::sanitize;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Invalid(String),

    /// The device has no ownership record for this review.
    #[error("You can only change your own review.")]
    NotYours,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Clone, Debug, Validate)]
pub struct ReviewDraft {
    pub product_id: u32,

    #[validate(custom(function = "non_blank", message = "Please fill all fields."))]
    pub customer_name: String,

    #[validate(range(min = 1, max = 5, message = "Please select a rating."))]
    pub rating: u8,

    #[validate(custom(function = "non_blank", message = "Please fill all fields."))]
    pub comment: String,
}

fn first_message(draft: &ReviewDraft) -> Option<String> {
    let report = draft.validate().err()?;
    report
        .field_errors()
        .into_values()
        .flatten()
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .or_else(|| Some("Please fill all fields.".to_string()))
}

/// Newest first.
pub async fn fetch_for_product(
    gateway: &dyn RecordGateway,
    product_id: u32,
) -> Result<Vec<Review>, GatewayError> {
    let rows = gateway
        .select(
            Collection::Reviews,
            Select::all()
                .eq("product_id", product_id)
                .order("created_at", SortDir::Desc),
        )
        .await?;
    Ok(rows.iter().map(sanitize::review_from_record).collect())
}

/// Validates, persists (the payload deliberately omits `likes`; the backend
/// column default covers it), and marks the stored review as this device's.
pub async fn submit(
    gateway: &dyn RecordGateway,
    prefs: &mut DevicePrefs,
    draft: &ReviewDraft,
) -> Result<Review, ReviewError> {
    if let Some(message) = first_message(draft) {
        return Err(ReviewError::Invalid(message));
    }
    let stored = gateway
        .insert(
            Collection::Reviews,
            json!({
                "product_id": draft.product_id,
                "customer_name": draft.customer_name.trim(),
                "rating": draft.rating,
                "comment": draft.comment.trim(),
            }),
        )
        .await?;
    let review = sanitize::review_from_record(&stored);
    prefs.remember_mine(review.id);
    tracing::debug!(review = review.id, product = draft.product_id, "review submitted");
    Ok(review)
}

pub async fn update_own(
    gateway: &dyn RecordGateway,
    prefs: &DevicePrefs,
    review_id: u32,
    rating: u8,
    comment: &str,
) -> Result<(), ReviewError> {
    if !prefs.is_mine(review_id) {
        return Err(ReviewError::NotYours);
    }
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::Invalid("Please select a rating.".to_string()));
    }
    if comment.trim().is_empty() {
        return Err(ReviewError::Invalid("Please fill all fields.".to_string()));
    }
    gateway
        .update(
            Collection::Reviews,
            json!(review_id),
            json!({"rating": rating, "comment": comment.trim()}),
        )
        .await?;
    Ok(())
}

pub async fn delete_own(
    gateway: &dyn RecordGateway,
    prefs: &mut DevicePrefs,
    review_id: u32,
) -> Result<(), ReviewError> {
    if !prefs.is_mine(review_id) {
        return Err(ReviewError::NotYours);
    }
    gateway.delete(Collection::Reviews, json!(review_id)).await?;
    prefs.forget_mine(review_id);
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    my_reviews: BTreeSet<u32>,
    likes: BTreeSet<u32>,
}

/// Device-local review preferences. Which reviews this device wrote and
/// which it liked; both purely cosmetic, neither visible to other devices.
#[derive(Debug, Default)]
pub struct DevicePrefs {
    path: Option<PathBuf>,
    state: PrefsFile,
}

impl DevicePrefs {
    /// Loads from a JSON file, starting empty when the file is missing or
    /// unreadable. Writes back after every mutation.
    pub fn load(path: PathBuf) -> Self {
        let state = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self {
            path: Some(path),
            state,
        }
    }

    /// No file backing; preferences last for the process lifetime.
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let text = match serde_json::to_string_pretty(&self.state) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "could not encode device preferences");
                return;
            }
        };
        if let Err(err) = std::fs::write(path, text) {
            tracing::warn!(%err, path = %path.display(), "could not persist device preferences");
        }
    }

    pub fn is_mine(&self, review_id: u32) -> bool {
        self.state.my_reviews.contains(&review_id)
    }

    pub fn remember_mine(&mut self, review_id: u32) {
        self.state.my_reviews.insert(review_id);
        self.persist();
    }

    pub fn forget_mine(&mut self, review_id: u32) {
        self.state.my_reviews.remove(&review_id);
        self.persist();
    }

    pub fn has_liked(&self, review_id: u32) -> bool {
        self.state.likes.contains(&review_id)
    }

    /// Flips the like state and returns (now_liked, adjusted display count)
    /// for the given stored count. The backend count is never touched.
    pub fn toggle_like(&mut self, review_id: u32, stored_likes: u32) -> (bool, u32) {
        let now_liked = if self.state.likes.remove(&review_id) {
            false
        } else {
            self.state.likes.insert(review_id);
            true
        };
        self.persist();
        (now_liked, Self::display_likes(stored_likes, now_liked))
    }

    pub fn display_likes(stored: u32, liked: bool) -> u32 {
        if liked {
            stored + 1
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    fn draft() -> ReviewDraft {
        ReviewDraft {
            product_id: 101,
            customer_name: "Karim".into(),
            rating: 5,
            comment: "Works perfectly.".into(),
        }
    }

    #[tokio::test]
    async fn submit_marks_ownership_and_omits_likes() {
        let gw = MemoryGateway::new();
        let mut prefs = DevicePrefs::in_memory();
        let review = submit(&gw, &mut prefs, &draft()).await.unwrap();
        assert!(prefs.is_mine(review.id));

        let rows = gw.select(Collection::Reviews, Select::all()).await.unwrap();
        assert!(rows[0].get("likes").is_none());
        // ...but the sanitized view still reads a count
        assert_eq!(review.likes, 0);
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_gateway() {
        let gw = MemoryGateway::new();
        let mut prefs = DevicePrefs::in_memory();

        let mut unrated = draft();
        unrated.rating = 0;
        let err = submit(&gw, &mut prefs, &unrated).await;
        assert!(matches!(err, Err(ReviewError::Invalid(ref m)) if m == "Please select a rating."));

        let mut blank = draft();
        blank.comment = "   ".into();
        let err = submit(&gw, &mut prefs, &blank).await;
        assert!(matches!(err, Err(ReviewError::Invalid(ref m)) if m == "Please fill all fields."));

        assert!(gw.select(Collection::Reviews, Select::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_own_reviews_can_be_edited_or_deleted() {
        let gw = MemoryGateway::new();
        let mut prefs = DevicePrefs::in_memory();
        let review = submit(&gw, &mut prefs, &draft()).await.unwrap();

        let stranger = DevicePrefs::in_memory();
        assert!(matches!(
            update_own(&gw, &stranger, review.id, 4, "edited").await,
            Err(ReviewError::NotYours)
        ));

        update_own(&gw, &prefs, review.id, 4, "edited").await.unwrap();
        let fetched = fetch_for_product(&gw, 101).await.unwrap();
        assert_eq!(fetched[0].rating, 4);
        assert_eq!(fetched[0].comment, "edited");

        delete_own(&gw, &mut prefs, review.id).await.unwrap();
        assert!(!prefs.is_mine(review.id));
        assert!(fetch_for_product(&gw, 101).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_filters_by_product_newest_first() {
        let gw = MemoryGateway::new();
        gw.seed(
            Collection::Reviews,
            vec![
                json!({"id": 1, "product_id": 101, "rating": 4, "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": 2, "product_id": 102, "rating": 5, "created_at": "2024-01-02T00:00:00Z"}),
                json!({"id": 3, "product_id": 101, "rating": 3, "created_at": "2024-01-03T00:00:00Z"}),
            ],
        )
        .await;
        let reviews = fetch_for_product(&gw, 101).await.unwrap();
        assert_eq!(reviews.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn toggle_like_round_trips_the_display_count() {
        let mut prefs = DevicePrefs::in_memory();
        let (liked, shown) = prefs.toggle_like(7, 12);
        assert!(liked);
        assert_eq!(shown, 13);
        assert!(prefs.has_liked(7));

        let (liked, shown) = prefs.toggle_like(7, 12);
        assert!(!liked);
        assert_eq!(shown, 12);
        assert!(!prefs.has_liked(7));
    }

    #[test]
    fn prefs_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut prefs = DevicePrefs::load(path.clone());
            prefs.remember_mine(9);
            prefs.toggle_like(3, 0);
        }
        let prefs = DevicePrefs::load(path);
        assert!(prefs.is_mine(9));
        assert!(prefs.has_liked(3));
    }
}
