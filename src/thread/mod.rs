//! ReviewThread - the review list of one product and everything a user can do to it.
//!
//! A thread is opened for a product and a session. It reconciles seed and
//! persisted content once, then applies user actions to the in-memory list and
//! writes the real records back after every change.
//!
//! ## Example
//!
//! ```ignore
//! use hive_reviews::{CurrentUser, InMemoryStore, ProductSummary, ReviewThread, ReviewsConfig, SystemClock};
//!
//! let user = CurrentUser::new(42u64, "Ana", "Babić");
//! let mut thread = ReviewThread::open(
//!     InMemoryStore::new(),
//!     ReviewsConfig::default(),
//!     SystemClock,
//!     ProductSummary::new(3, "Kaduljin med", 7),
//!     &Some(user),
//! );
//! let id = thread.create_review("Odličan med!")?;
//! thread.toggle_like(CommentRef::Review(id))?;
//! ```

mod error;
pub(crate) mod ops;
mod widget;

use crate::catalog::ProductSummary;
use crate::clock::Clock;
use crate::config::ReviewsConfig;
use crate::identity::{is_owned_by, CurrentUser, Session};
use crate::model::{Comment, CommentRef, Reply, Review, ReviewId};
use crate::persist::{CapacityPolicy, Persister, SaveOutcome};
use crate::reconcile::{Reconciler, ReviewSource};
use crate::store::{KeyValueStore, ProductReviewStore};

pub use error::ReviewError;
pub use ops::validate_text;
pub use widget::EditState;

pub struct ReviewThread<S, C> {
    product: ProductSummary,
    products: ProductReviewStore<S>,
    config: ReviewsConfig,
    clock: C,
    user: Option<CurrentUser>,
    reviews: Vec<Review>,
    source: ReviewSource,
    edit: EditState,
    last_save: Option<SaveOutcome>,
}

impl<S: KeyValueStore, C: Clock> ReviewThread<S, C> {
    /// Open the thread for `product` and reconcile its reviews.
    pub fn open(
        store: S,
        config: ReviewsConfig,
        clock: C,
        product: ProductSummary,
        session: &impl Session,
    ) -> Self {
        let products = ProductReviewStore::new(store, config.product_key_prefix.clone());
        let mut thread = Self {
            product,
            products,
            config,
            clock,
            user: session.current_user().cloned(),
            reviews: Vec::new(),
            source: ReviewSource::Seed,
            edit: EditState::Idle,
            last_save: None,
        };
        thread.reload();
        thread
    }

    /// Re-read the store and rebuild the list. Pending edit state is dropped.
    pub fn reload(&mut self) {
        let view = Reconciler::new(&self.products, &self.config.placeholder_avatar)
            .load(&self.product, self.user.as_ref());
        self.source = view.source();
        self.reviews = view.into_reviews();
        self.edit = EditState::Idle;
    }

    /// The signed-in user changed; rebuild the list for the new session.
    pub fn switch_session(&mut self, session: &impl Session) {
        self.user = session.current_user().cloned();
        self.reload();
    }

    pub fn product(&self) -> &ProductSummary {
        &self.product
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn review(&self, id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn source(&self) -> ReviewSource {
        self.source
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Outcome of the most recent write-back.
    pub fn last_save(&self) -> Option<SaveOutcome> {
        self.last_save
    }

    pub fn is_own_review(&self, review: &Review) -> bool {
        self.user
            .as_ref()
            .map(|user| is_owned_by(review, user))
            .unwrap_or(false)
    }

    pub fn is_own_reply(&self, reply: &Reply) -> bool {
        self.user
            .as_ref()
            .map(|user| is_owned_by(reply, user))
            .unwrap_or(false)
    }

    pub fn create_review(&mut self, text: &str) -> Result<ReviewId, ReviewError> {
        let user = self.require_user()?;
        let comment = validate_text(text)?;
        let id = self.next_id();

        let review = Review {
            id,
            author: user.full_name(),
            author_id: Some(user.id.clone()),
            avatar: user.avatar_or(&self.config.placeholder_avatar).to_string(),
            comment,
            likes: 0,
            dislikes: 0,
            has_liked: false,
            has_disliked: false,
            replies: Vec::new(),
            created_at: Some(self.clock.now()),
        };
        self.reviews.insert(0, review);
        tracing::debug!(product_id = self.product.id, id, "review created");

        self.persist(&user)?;
        Ok(id)
    }

    pub fn reply(&mut self, review_id: ReviewId, text: &str) -> Result<ReviewId, ReviewError> {
        let user = self.require_user()?;
        let comment = validate_text(text)?;
        let id = self.next_id();
        let now = self.clock.now();
        let avatar = user.avatar_or(&self.config.placeholder_avatar).to_string();

        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or(ReviewError::NotFound(CommentRef::Review(review_id)))?;
        review.replies.push(Reply {
            id,
            parent_id: Some(review_id),
            author: user.full_name(),
            author_id: Some(user.id.clone()),
            avatar,
            comment,
            likes: 0,
            dislikes: 0,
            has_liked: false,
            has_disliked: false,
            created_at: Some(now),
        });
        tracing::debug!(product_id = self.product.id, review_id, id, "reply created");

        self.persist(&user)?;
        Ok(id)
    }

    pub fn edit(&mut self, target: CommentRef, text: &str) -> Result<(), ReviewError> {
        let user = self.require_user()?;
        ops::edit_in(&mut self.reviews, target, text, &user)?;
        self.persist(&user)
    }

    pub fn edit_review(&mut self, id: ReviewId, text: &str) -> Result<(), ReviewError> {
        self.edit(CommentRef::Review(id), text)
    }

    pub fn edit_reply(
        &mut self,
        review_id: ReviewId,
        reply_id: ReviewId,
        text: &str,
    ) -> Result<(), ReviewError> {
        self.edit(
            CommentRef::Reply {
                review_id,
                reply_id,
            },
            text,
        )
    }

    pub fn delete(&mut self, target: CommentRef) -> Result<(), ReviewError> {
        let user = self.require_user()?;
        ops::delete_in(&mut self.reviews, target, &user)?;
        self.edit = EditState::Idle;
        self.persist(&user)
    }

    pub fn delete_review(&mut self, id: ReviewId) -> Result<(), ReviewError> {
        self.delete(CommentRef::Review(id))
    }

    pub fn delete_reply(
        &mut self,
        review_id: ReviewId,
        reply_id: ReviewId,
    ) -> Result<(), ReviewError> {
        self.delete(CommentRef::Reply {
            review_id,
            reply_id,
        })
    }

    pub fn toggle_like(&mut self, target: CommentRef) -> Result<(), ReviewError> {
        self.vote(target, Vote::Like)
    }

    pub fn toggle_dislike(&mut self, target: CommentRef) -> Result<(), ReviewError> {
        self.vote(target, Vote::Dislike)
    }

    /// Start editing `target`, seeding the draft with its current text.
    pub fn begin_edit(&mut self, target: CommentRef) -> Result<(), ReviewError> {
        self.require_user()?;
        let (body, owned) = {
            let (review, reply) = self.find(target)?;
            match reply {
                Some(reply) => (reply.comment.clone(), self.is_own_reply(reply)),
                None => (review.comment.clone(), self.is_own_review(review)),
            }
        };
        if !owned {
            return Err(ReviewError::NotOwner(target));
        }
        self.edit = EditState::Editing {
            target,
            draft: body,
        };
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.edit.set_draft(text);
    }

    /// Save the pending edit. Blank drafts are refused and stay in edit mode.
    pub fn save_edit(&mut self) -> Result<(), ReviewError> {
        let (target, draft) = match &self.edit {
            EditState::Editing { target, draft } => (*target, draft.clone()),
            _ => return Ok(()),
        };
        self.edit(target, &draft)?;
        self.edit = EditState::Idle;
        Ok(())
    }

    /// Ask for delete confirmation of `target`.
    pub fn request_delete(&mut self, target: CommentRef) -> Result<(), ReviewError> {
        self.require_user()?;
        let owned = {
            let (review, reply) = self.find(target)?;
            match reply {
                Some(reply) => self.is_own_reply(reply),
                None => self.is_own_review(review),
            }
        };
        if !owned {
            return Err(ReviewError::NotOwner(target));
        }
        self.edit = EditState::ConfirmingDelete { target };
        Ok(())
    }

    /// Delete the record awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Result<(), ReviewError> {
        match self.edit {
            EditState::ConfirmingDelete { target } => self.delete(target),
            _ => Ok(()),
        }
    }

    /// Leave edit or delete-confirmation mode without changes.
    pub fn cancel(&mut self) {
        self.edit.cancel();
    }

    fn vote(&mut self, target: CommentRef, vote: Vote) -> Result<(), ReviewError> {
        let user = self.require_user()?;
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.id == target.review_id())
            .ok_or(ReviewError::NotFound(target))?;
        match target {
            CommentRef::Review(_) => vote.cast(review),
            CommentRef::Reply { reply_id, .. } => {
                let reply = review
                    .reply_mut(reply_id)
                    .ok_or(ReviewError::NotFound(target))?;
                vote.cast(reply)
            }
        }
        self.persist(&user)
    }

    fn find(&self, target: CommentRef) -> Result<(&Review, Option<&Reply>), ReviewError> {
        let review = self
            .review(target.review_id())
            .ok_or(ReviewError::NotFound(target))?;
        match target {
            CommentRef::Review(_) => Ok((review, None)),
            CommentRef::Reply { reply_id, .. } => {
                let reply = review.reply(reply_id).ok_or(ReviewError::NotFound(target))?;
                Ok((review, Some(reply)))
            }
        }
    }

    fn require_user(&self) -> Result<CurrentUser, ReviewError> {
        self.user.clone().ok_or(ReviewError::AuthenticationRequired)
    }

    /// Millisecond timestamp, bumped past the largest id already in the list.
    fn next_id(&self) -> ReviewId {
        let now = self.clock.now_millis().max(0) as ReviewId;
        let max = self
            .reviews
            .iter()
            .flat_map(|r| std::iter::once(r.id).chain(r.replies.iter().map(|reply| reply.id)))
            .max()
            .unwrap_or(0);
        if now > max {
            now
        } else {
            max + 1
        }
    }

    fn persist(&mut self, user: &CurrentUser) -> Result<(), ReviewError> {
        let persister = Persister::new(&self.products, CapacityPolicy::from(&self.config));
        let outcome = persister.save(
            self.product.id,
            &self.reviews,
            user,
            self.clock.now_millis(),
        )?;
        if outcome.is_degraded() {
            tracing::warn!(product_id = self.product.id, ?outcome, "reviews saved partially");
        }
        self.last_save = Some(outcome);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Vote {
    Like,
    Dislike,
}

impl Vote {
    fn cast<C: Comment>(self, record: &mut C) {
        match self {
            Vote::Like => record.toggle_like(),
            Vote::Dislike => record.toggle_dislike(),
        }
    }
}
