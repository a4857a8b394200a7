//! "My comments" - every review and reply the signed-in user wrote, across
//! all products.
//!
//! The profile page does not share state with open product threads: it scans
//! every product blob on each call and derives its own view. Edits and
//! deletes made here are written straight back to the product blob with the
//! same rules a product thread applies.

mod query;
mod time_ago;

use chrono::{DateTime, Utc};

use crate::catalog::ProductCatalog;
use crate::clock::Clock;
use crate::config::ReviewsConfig;
use crate::error::StoreError;
use crate::identity::{is_unclaimed_by, CurrentUser};
use crate::model::{Comment, CommentRef, Review, ReviewBlob, ReviewId};
use crate::persist::{select_user_records, CapacityPolicy, Persister, SaveOutcome};
use crate::store::{KeyValueStore, ProductReviewStore};
use crate::thread::{ops, ReviewError};

pub use query::{paginate, CommentPage, CommentQuery, KindFilter, ProductGroup};
pub use time_ago::time_ago;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentKind {
    Review,
    Reply {
        parent_id: ReviewId,
        /// Start of the parent comment, for context.
        parent_preview: String,
    },
}

/// One of the user's reviews or replies, flattened for the profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyComment {
    pub kind: CommentKind,
    pub id: ReviewId,
    pub product_id: u64,
    pub product_name: String,
    pub comment: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub time_ago: String,
}

impl MyComment {
    pub fn target(&self) -> CommentRef {
        match &self.kind {
            CommentKind::Review => CommentRef::Review(self.id),
            CommentKind::Reply { parent_id, .. } => CommentRef::Reply {
                review_id: *parent_id,
                reply_id: self.id,
            },
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self.kind, CommentKind::Reply { .. })
    }

    fn created_millis(&self) -> i64 {
        self.created_at.map(|at| at.timestamp_millis()).unwrap_or(0)
    }
}

/// Ids that disappear when `target` is deleted: a reply, or a review with all its replies.
fn removed_ids(reviews: &[Review], target: CommentRef) -> Vec<ReviewId> {
    match target {
        CommentRef::Reply { reply_id, .. } => vec![reply_id],
        CommentRef::Review(id) => reviews
            .iter()
            .filter(|review| review.id == id)
            .flat_map(|review| {
                std::iter::once(review.id).chain(review.replies.iter().map(|reply| reply.id))
            })
            .collect(),
    }
}

/// Listed on the profile: the author id is the user's, or there is no author
/// id and the name is exactly the user's full name.
fn is_listed_for<C: Comment>(record: &C, user: &CurrentUser) -> bool {
    record.author_id() == Some(&user.id) || is_unclaimed_by(record, user)
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    }
}

pub struct MyComments<'a, S, P, C> {
    products: ProductReviewStore<S>,
    catalog: &'a P,
    config: ReviewsConfig,
    clock: C,
}

impl<'a, S: KeyValueStore, P: ProductCatalog, C: Clock> MyComments<'a, S, P, C> {
    pub fn new(store: S, catalog: &'a P, config: ReviewsConfig, clock: C) -> Self {
        let products = ProductReviewStore::new(store, config.product_key_prefix.clone());
        Self {
            products,
            catalog,
            config,
            clock,
        }
    }

    /// Every review and reply by `user`, newest first. Malformed blobs are skipped.
    pub fn collect(&self, user: &CurrentUser) -> Result<Vec<MyComment>, StoreError> {
        let now = self.clock.now();
        let mut items = Vec::new();

        for product_id in self.products.product_ids()? {
            let blob = match self.products.read(product_id) {
                Ok(Some(blob)) => blob,
                Ok(None) => continue,
                Err(StoreError::Serde(err)) => {
                    tracing::warn!(product_id, %err, "skipping malformed review blob");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let product_name = self.catalog.product_name(product_id);
            self.flatten(product_id, &product_name, &blob, user, now, &mut items);
        }

        items.sort_by_key(|item| std::cmp::Reverse(item.created_millis()));
        tracing::debug!(user = %user.id, items = items.len(), "collected profile comments");
        Ok(items)
    }

    /// One page of the user's comments.
    pub fn page(
        &self,
        user: &CurrentUser,
        query: &CommentQuery,
    ) -> Result<CommentPage, StoreError> {
        let items = self.collect(user)?;
        Ok(paginate(
            items,
            query,
            self.config.groups_per_page,
            self.config.group_item_limit,
        ))
    }

    /// Replace the text of one of the user's comments on `product_id`.
    pub fn edit(
        &self,
        user: &CurrentUser,
        product_id: u64,
        target: CommentRef,
        text: &str,
    ) -> Result<SaveOutcome, ReviewError> {
        let mut blob = self.load_for_write(product_id, target)?;
        ops::edit_in(&mut blob.reviews, target, text, user)?;
        self.write(product_id, blob, user)
    }

    /// Delete one of the user's comments on `product_id`.
    pub fn delete(
        &self,
        user: &CurrentUser,
        product_id: u64,
        target: CommentRef,
    ) -> Result<SaveOutcome, ReviewError> {
        let mut blob = self.load_for_write(product_id, target)?;
        let removed = removed_ids(&blob.reviews, target);
        ops::delete_in(&mut blob.reviews, target, user)?;
        for id in removed {
            blob.interactions.remove(&id);
        }
        self.write(product_id, blob, user)
    }

    fn load_for_write(
        &self,
        product_id: u64,
        target: CommentRef,
    ) -> Result<ReviewBlob, ReviewError> {
        match self.products.read(product_id) {
            Ok(Some(blob)) => Ok(blob),
            Ok(None) => Err(ReviewError::NotFound(target)),
            Err(StoreError::Serde(err)) => {
                tracing::warn!(product_id, %err, "cannot edit malformed review blob");
                Err(ReviewError::NotFound(target))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write(
        &self,
        product_id: u64,
        mut blob: ReviewBlob,
        user: &CurrentUser,
    ) -> Result<SaveOutcome, ReviewError> {
        let policy = CapacityPolicy::from(&self.config);
        // seed reviews left without user replies go back to the seed layer
        blob.reviews = select_user_records(&blob.reviews, user, policy.mock_id_ceiling);
        blob.timestamp = self.clock.now_millis();
        let persister = Persister::new(&self.products, policy);
        Ok(persister.write_blob(product_id, blob, user)?)
    }

    fn flatten(
        &self,
        product_id: u64,
        product_name: &str,
        blob: &ReviewBlob,
        user: &CurrentUser,
        now: DateTime<Utc>,
        out: &mut Vec<MyComment>,
    ) {
        let describe = |created_at: Option<DateTime<Utc>>| {
            created_at
                .map(|at| time_ago(at, now))
                .unwrap_or_else(|| "nepoznato".to_string())
        };

        for review in &blob.reviews {
            if is_listed_for(review, user) {
                out.push(MyComment {
                    kind: CommentKind::Review,
                    id: review.id,
                    product_id,
                    product_name: product_name.to_string(),
                    comment: review.comment.clone(),
                    likes: review.likes,
                    dislikes: review.dislikes,
                    created_at: review.created_at,
                    time_ago: describe(review.created_at),
                });
            }
            for reply in &review.replies {
                if !is_listed_for(reply, user) {
                    continue;
                }
                out.push(MyComment {
                    kind: CommentKind::Reply {
                        parent_id: review.id,
                        parent_preview: preview(&review.comment, self.config.parent_preview_chars),
                    },
                    id: reply.id,
                    product_id,
                    product_name: product_name.to_string(),
                    comment: reply.comment.clone(),
                    likes: reply.likes,
                    dislikes: reply.dislikes,
                    created_at: reply.created_at,
                    time_ago: describe(reply.created_at),
                });
            }
        }
    }
}
