use crate::config::ReviewsConfig;
use crate::model::{sort_newest_first, Review};

/// Size limits and eviction counts for product blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityPolicy {
    /// Encoded size above which the blob is truncated before writing.
    pub byte_budget: usize,
    pub truncate_keep: usize,
    pub reduced_keep: usize,
    pub minimal_keep: usize,
    pub mock_id_ceiling: u64,
    pub placeholder_avatar: String,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::from(&ReviewsConfig::default())
    }
}

impl From<&ReviewsConfig> for CapacityPolicy {
    fn from(config: &ReviewsConfig) -> Self {
        Self {
            byte_budget: config.max_blob_bytes,
            truncate_keep: config.truncate_keep,
            reduced_keep: config.reduced_keep,
            minimal_keep: config.minimal_keep,
            mock_id_ceiling: config.mock_id_ceiling,
            placeholder_avatar: config.placeholder_avatar.clone(),
        }
    }
}

impl CapacityPolicy {
    /// Last-resort copy: id, author, comment and timestamp only.
    pub fn minimal_copy(&self, review: &Review) -> Review {
        Review {
            id: review.id,
            author: review.author.clone(),
            author_id: None,
            avatar: self.placeholder_avatar.clone(),
            comment: review.comment.clone(),
            likes: 0,
            dislikes: 0,
            has_liked: false,
            has_disliked: false,
            replies: Vec::new(),
            created_at: review.created_at,
        }
    }
}

/// How much of a save reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Everything was written.
    Full,
    /// Over the byte budget; only the newest reviews were written.
    Truncated { kept: usize },
    /// Quota exceeded; other products were purged and the user's newest reviews written.
    Reduced { kept: usize },
    /// Quota exceeded again; a stripped copy of the newest reviews was written.
    Minimal { kept: usize },
    /// Nothing could be written.
    Dropped,
}

impl SaveOutcome {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, SaveOutcome::Full)
    }
}

/// Keep the `keep` most recently created reviews, newest first.
pub fn keep_newest(reviews: &mut Vec<Review>, keep: usize) {
    sort_newest_first(reviews);
    reviews.truncate(keep);
}
