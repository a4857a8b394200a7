//! Reconciliation of seed content with persisted user content.
//!
//! The render list is resolved in layers, lowest priority first:
//!
//! 1. seed reviews synthesized for the product,
//! 2. this browser's interaction overrides (likes/dislikes by id),
//! 3. persisted records, which replace a seed record with the same id or are
//!    appended otherwise.
//!
//! Before merging, persisted records are repaired: embedded avatars are
//! replaced (and the repaired blob is written back), and records that predate
//! author ids are claimed for the current user by exact name. The result is an
//! immutable [`ReconciledReviews`] view, newest first.

use std::collections::BTreeMap;

use crate::avatar::sanitize_reviews;
use crate::catalog::ProductSummary;
use crate::identity::{claim_ownership, CurrentUser};
use crate::model::{sort_newest_first, Comment, Interaction, Review, ReviewBlob, ReviewId};
use crate::seed::mock_reviews;
use crate::store::{KeyValueStore, ProductReviewStore};

/// Where a reconciled list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSource {
    /// No blob exists; seed reviews only.
    Seed,
    /// Seed reviews merged with a persisted blob.
    Merged,
    /// The blob could not be read or parsed; seed reviews only.
    Fallback,
}

/// The resolved review list for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledReviews {
    product_id: u64,
    reviews: Vec<Review>,
    source: ReviewSource,
    repaired_avatars: usize,
    claimed: usize,
}

impl ReconciledReviews {
    pub fn product_id(&self) -> u64 {
        self.product_id
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn get(&self, id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn source(&self) -> ReviewSource {
        self.source
    }

    /// Avatars replaced while reading the blob.
    pub fn repaired_avatars(&self) -> usize {
        self.repaired_avatars
    }

    /// Records claimed for the current user while reading the blob.
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }
}

/// Apply interaction overrides to seed records (reviews and replies).
///
/// Seed counters exclude this browser's vote, so an applied override also
/// counts it.
pub fn apply_interactions(seed: &mut [Review], interactions: &BTreeMap<ReviewId, Interaction>) {
    fn apply<C: Comment>(record: &mut C, interactions: &BTreeMap<ReviewId, Interaction>) {
        let Some(interaction) = interactions.get(&record.id()) else {
            return;
        };
        let mut votes = record.votes();
        if interaction.has_liked {
            votes.has_liked = true;
            votes.has_disliked = false;
            votes.likes += 1;
        } else if interaction.has_disliked {
            votes.has_liked = false;
            votes.has_disliked = true;
            votes.dislikes += 1;
        }
        record.set_votes(votes);
    }

    for review in seed.iter_mut() {
        apply(review, interactions);
        for reply in review.replies.iter_mut() {
            apply(reply, interactions);
        }
    }
}

/// Resolve the layers into one newest-first list. Returns the list and the
/// number of records claimed for `user`.
pub fn resolve(
    mut seed: Vec<Review>,
    blob: ReviewBlob,
    user: Option<&CurrentUser>,
) -> (Vec<Review>, usize) {
    apply_interactions(&mut seed, &blob.interactions);

    let mut persisted = blob.reviews;
    let claimed = match user {
        Some(user) => claim_ownership(&mut persisted, user),
        None => 0,
    };

    for record in persisted {
        match seed.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => seed.push(record),
        }
    }

    sort_newest_first(&mut seed);
    (seed, claimed)
}

/// Loads and reconciles the review list of a product.
pub struct Reconciler<'a, S> {
    products: &'a ProductReviewStore<S>,
    placeholder_avatar: &'a str,
}

impl<'a, S: KeyValueStore> Reconciler<'a, S> {
    pub fn new(products: &'a ProductReviewStore<S>, placeholder_avatar: &'a str) -> Self {
        Self {
            products,
            placeholder_avatar,
        }
    }

    /// Never fails: unreadable or malformed blobs fall back to seed reviews.
    pub fn load(&self, product: &ProductSummary, user: Option<&CurrentUser>) -> ReconciledReviews {
        let mut seed = mock_reviews(product);

        let raw = match self.products.read_raw(product.id) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                sort_newest_first(&mut seed);
                return self.view(product.id, seed, ReviewSource::Seed, 0, 0);
            }
            Err(err) => {
                tracing::warn!(product_id = product.id, %err, "failed to read review blob");
                sort_newest_first(&mut seed);
                return self.view(product.id, seed, ReviewSource::Fallback, 0, 0);
            }
        };

        let mut blob: ReviewBlob = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(
                    product_id = product.id,
                    %err,
                    "malformed review blob, showing seed reviews"
                );
                sort_newest_first(&mut seed);
                return self.view(product.id, seed, ReviewSource::Fallback, 0, 0);
            }
        };

        let repaired = sanitize_reviews(&mut blob.reviews, self.placeholder_avatar);
        if repaired > 0 {
            match self.products.write(product.id, &blob) {
                Ok(()) => tracing::info!(
                    product_id = product.id,
                    repaired,
                    "rewrote review blob without embedded avatars"
                ),
                Err(err) => tracing::warn!(
                    product_id = product.id,
                    %err,
                    "failed to write repaired review blob"
                ),
            }
        }

        let (reviews, claimed) = resolve(seed, blob, user);
        tracing::debug!(
            product_id = product.id,
            reviews = reviews.len(),
            claimed,
            "reconciled reviews"
        );
        self.view(product.id, reviews, ReviewSource::Merged, repaired, claimed)
    }

    fn view(
        &self,
        product_id: u64,
        reviews: Vec<Review>,
        source: ReviewSource,
        repaired_avatars: usize,
        claimed: usize,
    ) -> ReconciledReviews {
        ReconciledReviews {
            product_id,
            reviews,
            source,
            repaired_avatars,
            claimed,
        }
    }
}
