//! Product review entities.

use serde::{Deserialize, Serialize};

/// Moderation status of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// A buyer's review of a purchased product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub user_id: String,
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
}

/// Body of a review submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Whether the current user may review a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEligibility {
    pub eligible: bool,
    #[serde(default)]
    pub message: String,
}

/// Aggregate rating of approved reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub product_id: String,
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    #[serde(rename = "reviewCount")]
    pub review_count: u64,
}
