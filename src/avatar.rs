//! Avatar hygiene. Embedded `data:` images bloat blobs past the storage quota,
//! so they are swapped for the placeholder path whenever a blob is read or written.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::model::{Comment, Review};

pub const DATA_URI_PREFIX: &str = "data:";

pub fn is_data_uri(avatar: &str) -> bool {
    avatar
        .get(..DATA_URI_PREFIX.len())
        .map(|head| head.eq_ignore_ascii_case(DATA_URI_PREFIX))
        .unwrap_or(false)
}

/// Size of the image embedded in a data URI.
fn embedded_bytes(avatar: &str) -> usize {
    match avatar.split_once(";base64,") {
        Some((_, payload)) => STANDARD
            .decode(payload.trim())
            .map(|bytes| bytes.len())
            .unwrap_or(payload.len() * 3 / 4),
        None => avatar.len(),
    }
}

/// Replace a data-URI avatar with `placeholder`. Returns whether it changed.
pub fn sanitize_avatar<C: Comment>(record: &mut C, placeholder: &str) -> bool {
    let id = record.id();
    let avatar = record.avatar_mut();
    if !is_data_uri(avatar) {
        return false;
    }
    tracing::debug!(
        id,
        embedded_bytes = embedded_bytes(avatar),
        "replacing embedded avatar with placeholder"
    );
    *avatar = placeholder.to_string();
    true
}

/// Sanitize every review and reply. Returns the number of avatars replaced.
pub fn sanitize_reviews(reviews: &mut [Review], placeholder: &str) -> usize {
    let mut replaced = 0;
    for review in reviews.iter_mut() {
        if sanitize_avatar(review, placeholder) {
            replaced += 1;
        }
        for reply in review.replies.iter_mut() {
            if sanitize_avatar(reply, placeholder) {
                replaced += 1;
            }
        }
    }
    replaced
}
