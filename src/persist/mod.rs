//! Capacity-aware write path for product review blobs.
//!
//! Only real content is written: records authored in this browser, seed
//! reviews that carry user replies, and an interaction map for every id this
//! browser has voted on. Writes follow one policy:
//!
//! 1. encode the blob; over the byte budget, keep the newest
//!    [`CapacityPolicy::truncate_keep`] reviews,
//! 2. on a quota failure, purge every other product's blob and retry with the
//!    user's own reviews (newest [`CapacityPolicy::reduced_keep`]),
//! 3. then retry with a minimal copy of the newest
//!    [`CapacityPolicy::minimal_keep`] (id, author, comment, timestamp),
//! 4. then give up. Quota failures never surface as errors; the
//!    [`SaveOutcome`] says how much survived.

mod policy;

use std::collections::BTreeMap;

use crate::avatar::sanitize_reviews;
use crate::error::StoreError;
use crate::identity::{is_owned_by, names_match, CurrentUser};
use crate::model::{Comment, Interaction, Review, ReviewBlob, ReviewId};
use crate::store::{KeyValueStore, ProductReviewStore};

pub use policy::{keep_newest, CapacityPolicy, SaveOutcome};

/// True for records that belong in the blob rather than the seed layer.
fn is_user_record(review: &Review, user: &CurrentUser, ceiling: u64) -> bool {
    if review.author_id.as_ref() == Some(&user.id) || review.id > ceiling {
        return true;
    }
    if review.created_at.is_some() && names_match(&review.author, &user.full_name()) {
        return true;
    }
    review
        .replies
        .iter()
        .any(|reply| reply.id > ceiling || reply.author_id.as_ref() == Some(&user.id))
}

/// Records from the render list that must be persisted.
pub fn select_user_records(reviews: &[Review], user: &CurrentUser, ceiling: u64) -> Vec<Review> {
    reviews
        .iter()
        .filter(|review| is_user_record(review, user, ceiling))
        .cloned()
        .collect()
}

/// Every review or reply with a like/dislike flag set, keyed by id.
pub fn collect_interactions(reviews: &[Review]) -> BTreeMap<ReviewId, Interaction> {
    let mut interactions = BTreeMap::new();
    for review in reviews {
        if let Some(interaction) = review.interaction() {
            interactions.insert(review.id, interaction);
        }
        for reply in &review.replies {
            if let Some(interaction) = reply.interaction() {
                interactions.insert(reply.id, interaction);
            }
        }
    }
    interactions
}

/// Writes product blobs under a [`CapacityPolicy`].
pub struct Persister<'a, S> {
    products: &'a ProductReviewStore<S>,
    policy: CapacityPolicy,
}

impl<'a, S: KeyValueStore> Persister<'a, S> {
    pub fn new(products: &'a ProductReviewStore<S>, policy: CapacityPolicy) -> Self {
        Self { products, policy }
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    /// Persist the real records of a render list.
    pub fn save(
        &self,
        product_id: u64,
        reviews: &[Review],
        user: &CurrentUser,
        now_millis: i64,
    ) -> Result<SaveOutcome, StoreError> {
        let blob = ReviewBlob {
            reviews: select_user_records(reviews, user, self.policy.mock_id_ceiling),
            interactions: collect_interactions(reviews),
            timestamp: now_millis,
        };
        self.write_blob(product_id, blob, user)
    }

    /// Write a prepared blob, degrading it until it fits.
    pub fn write_blob(
        &self,
        product_id: u64,
        mut blob: ReviewBlob,
        user: &CurrentUser,
    ) -> Result<SaveOutcome, StoreError> {
        sanitize_reviews(&mut blob.reviews, &self.policy.placeholder_avatar);

        let mut outcome = SaveOutcome::Full;
        let mut encoded = serde_json::to_string(&blob)?;
        if encoded.len() > self.policy.byte_budget {
            let before = blob.reviews.len();
            keep_newest(&mut blob.reviews, self.policy.truncate_keep);
            tracing::warn!(
                product_id,
                bytes = encoded.len(),
                budget = self.policy.byte_budget,
                before,
                kept = blob.reviews.len(),
                "review blob over budget, keeping newest reviews"
            );
            outcome = SaveOutcome::Truncated {
                kept: blob.reviews.len(),
            };
            encoded = serde_json::to_string(&blob)?;
        }

        if self.attempt(product_id, encoded)? {
            return Ok(outcome);
        }

        let purged = self.products.purge_except(product_id)?;
        tracing::warn!(
            product_id,
            purged,
            "storage quota exceeded, purged other products' reviews"
        );

        let mut reduced: Vec<Review> = blob
            .reviews
            .iter()
            .filter(|r| r.id > self.policy.mock_id_ceiling && is_owned_by(*r, user))
            .cloned()
            .collect();
        keep_newest(&mut reduced, self.policy.reduced_keep);
        let kept = reduced.len();
        let reduced_blob = ReviewBlob {
            reviews: reduced.clone(),
            interactions: blob.interactions.clone(),
            timestamp: blob.timestamp,
        };
        if self.attempt(product_id, serde_json::to_string(&reduced_blob)?)? {
            return Ok(SaveOutcome::Reduced { kept });
        }

        reduced.truncate(self.policy.minimal_keep);
        let minimal = ReviewBlob {
            reviews: reduced
                .iter()
                .map(|r| self.policy.minimal_copy(r))
                .collect(),
            interactions: BTreeMap::new(),
            timestamp: blob.timestamp,
        };
        let kept = minimal.reviews.len();
        if self.attempt(product_id, serde_json::to_string(&minimal)?)? {
            tracing::warn!(product_id, kept, "stored minimal review blob");
            return Ok(SaveOutcome::Minimal { kept });
        }

        tracing::warn!(product_id, "storage quota exhausted, reviews not saved");
        Ok(SaveOutcome::Dropped)
    }

    /// Ok(false) when the store is out of space.
    fn attempt(&self, product_id: u64, encoded: String) -> Result<bool, StoreError> {
        match self.products.write_raw(product_id, encoded) {
            Ok(()) => Ok(true),
            Err(err) if err.is_quota_exceeded() => {
                tracing::debug!(product_id, %err, "review blob write rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
