//! Review and reply records as stored in per-product blobs.
//!
//! The JSON shape matches what the storefront has always written:
//!
//! ```json
//! {
//!   "reviews": [{ "id": 1718000000000, "author": "Ana Babić", "authorId": 42,
//!                 "avatar": "/images/avatars/ana.jpg", "comment": "Odličan med!",
//!                 "likes": 0, "dislikes": 0, "hasLiked": false, "hasDisliked": false,
//!                 "replies": [], "createdAt": "2024-06-10T08:53:20.000Z" }],
//!   "interactions": { "3": { "hasLiked": true, "hasDisliked": false } },
//!   "timestamp": 1718000000000
//! }
//! ```

pub(crate) mod timestamp;
mod user_id;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use user_id::UserId;

/// Review and reply identifier. Seed records use small fixed values, records
/// created by a user use the creation time in milliseconds.
pub type ReviewId = u64;

/// Like/dislike counters together with this browser's vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Votes {
    pub likes: i64,
    pub dislikes: i64,
    pub has_liked: bool,
    pub has_disliked: bool,
}

impl Votes {
    /// Toggle the like flag. A pending dislike is withdrawn first.
    pub fn toggle_like(self) -> Votes {
        let mut next = self;
        if next.has_disliked {
            next.has_disliked = false;
            next.dislikes -= 1;
        }
        next.has_liked = !self.has_liked;
        next.likes += if next.has_liked { 1 } else { -1 };
        next
    }

    /// Toggle the dislike flag. A pending like is withdrawn first.
    pub fn toggle_dislike(self) -> Votes {
        let mut next = self;
        if next.has_liked {
            next.has_liked = false;
            next.likes -= 1;
        }
        next.has_disliked = !self.has_disliked;
        next.dislikes += if next.has_disliked { 1 } else { -1 };
        next
    }
}

/// Behaviour shared by reviews and replies.
pub trait Comment {
    fn id(&self) -> ReviewId;
    fn author(&self) -> &str;
    fn author_id(&self) -> Option<&UserId>;
    fn set_author_id(&mut self, id: UserId);
    fn body(&self) -> &str;
    fn set_body(&mut self, body: String);
    fn avatar_mut(&mut self) -> &mut String;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn votes(&self) -> Votes;
    fn set_votes(&mut self, votes: Votes);

    fn toggle_like(&mut self) {
        let votes = self.votes().toggle_like();
        self.set_votes(votes);
    }

    fn toggle_dislike(&mut self) {
        let votes = self.votes().toggle_dislike();
        self.set_votes(votes);
    }

    /// The interaction this browser has recorded, if any flag is set.
    fn interaction(&self) -> Option<Interaction> {
        let votes = self.votes();
        if votes.has_liked || votes.has_disliked {
            Some(Interaction {
                has_liked: votes.has_liked,
                has_disliked: votes.has_disliked,
            })
        } else {
            None
        }
    }

    /// Sort key for newest-first ordering. Missing timestamps sort as the epoch.
    fn created_millis(&self) -> i64 {
        self.created_at().map(|dt| dt.timestamp_millis()).unwrap_or(0)
    }
}

/// A top-level review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub has_liked: bool,
    #[serde(default)]
    pub has_disliked: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn reply(&self, reply_id: ReviewId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }

    pub fn reply_mut(&mut self, reply_id: ReviewId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }
}

/// A reply nested one level under a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReviewId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ReviewId>,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub has_liked: bool,
    #[serde(default)]
    pub has_disliked: bool,
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

macro_rules! impl_comment {
    ($ty:ty) => {
        impl Comment for $ty {
            fn id(&self) -> ReviewId {
                self.id
            }

            fn author(&self) -> &str {
                &self.author
            }

            fn author_id(&self) -> Option<&UserId> {
                self.author_id.as_ref()
            }

            fn set_author_id(&mut self, id: UserId) {
                self.author_id = Some(id);
            }

            fn body(&self) -> &str {
                &self.comment
            }

            fn set_body(&mut self, body: String) {
                self.comment = body;
            }

            fn avatar_mut(&mut self) -> &mut String {
                &mut self.avatar
            }

            fn created_at(&self) -> Option<DateTime<Utc>> {
                self.created_at
            }

            fn votes(&self) -> Votes {
                Votes {
                    likes: self.likes,
                    dislikes: self.dislikes,
                    has_liked: self.has_liked,
                    has_disliked: self.has_disliked,
                }
            }

            fn set_votes(&mut self, votes: Votes) {
                self.likes = votes.likes;
                self.dislikes = votes.dislikes;
                self.has_liked = votes.has_liked;
                self.has_disliked = votes.has_disliked;
            }
        }
    };
}

impl_comment!(Review);
impl_comment!(Reply);

/// This browser's like/dislike state for one review or reply id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(default)]
    pub has_liked: bool,
    #[serde(default)]
    pub has_disliked: bool,
}

/// Everything persisted for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewBlob {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub interactions: BTreeMap<ReviewId, Interaction>,
    /// Write time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// Sort newest first by creation time. Stable, so equal timestamps keep
/// their relative order.
pub fn sort_newest_first<C: Comment>(items: &mut [C]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.created_millis()));
}

/// Addresses a review or one of its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentRef {
    Review(ReviewId),
    Reply {
        review_id: ReviewId,
        reply_id: ReviewId,
    },
}

impl CommentRef {
    pub fn review_id(&self) -> ReviewId {
        match self {
            CommentRef::Review(id) => *id,
            CommentRef::Reply { review_id, .. } => *review_id,
        }
    }
}

impl std::fmt::Display for CommentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentRef::Review(id) => write!(f, "review {}", id),
            CommentRef::Reply {
                review_id,
                reply_id,
            } => write!(f, "reply {} on review {}", reply_id, review_id),
        }
    }
}
