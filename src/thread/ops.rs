//! Edit and delete over a list of reviews. Shared by the product thread and
//! the profile page so both apply the same replace/filter rules.

use super::ReviewError;
use crate::identity::{is_owned_by, names_match, CurrentUser};
use crate::model::{Comment, CommentRef, Review};

/// Trimmed comment text, or `EmptyComment`.
pub fn validate_text(text: &str) -> Result<String, ReviewError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ReviewError::EmptyComment)
    } else {
        Ok(trimmed.to_string())
    }
}

fn rewrite<C: Comment>(
    record: &mut C,
    target: CommentRef,
    text: String,
    user: &CurrentUser,
) -> Result<(), ReviewError> {
    if !is_owned_by(record, user) {
        return Err(ReviewError::NotOwner(target));
    }
    record.set_body(text);
    if record.author_id().is_none() && names_match(record.author(), &user.full_name()) {
        record.set_author_id(user.id.clone());
    }
    Ok(())
}

/// Replace the body of the targeted record. The record must belong to `user`;
/// an id-less record matched by name gets the user's id.
pub fn edit_in(
    reviews: &mut [Review],
    target: CommentRef,
    text: &str,
    user: &CurrentUser,
) -> Result<(), ReviewError> {
    let text = validate_text(text)?;
    let review = reviews
        .iter_mut()
        .find(|r| r.id == target.review_id())
        .ok_or(ReviewError::NotFound(target))?;

    match target {
        CommentRef::Review(_) => rewrite(review, target, text, user),
        CommentRef::Reply { reply_id, .. } => {
            let reply = review
                .reply_mut(reply_id)
                .ok_or(ReviewError::NotFound(target))?;
            rewrite(reply, target, text, user)
        }
    }
}

/// Remove the targeted record. A reply is removed from its parent only.
pub fn delete_in(
    reviews: &mut Vec<Review>,
    target: CommentRef,
    user: &CurrentUser,
) -> Result<(), ReviewError> {
    let position = reviews
        .iter()
        .position(|r| r.id == target.review_id())
        .ok_or(ReviewError::NotFound(target))?;

    match target {
        CommentRef::Review(_) => {
            if !is_owned_by(&reviews[position], user) {
                return Err(ReviewError::NotOwner(target));
            }
            reviews.remove(position);
        }
        CommentRef::Reply { reply_id, .. } => {
            let replies = &mut reviews[position].replies;
            let index = replies
                .iter()
                .position(|r| r.id == reply_id)
                .ok_or(ReviewError::NotFound(target))?;
            if !is_owned_by(&replies[index], user) {
                return Err(ReviewError::NotOwner(target));
            }
            replies.remove(index);
        }
    }
    Ok(())
}
