use chrono::{Duration, TimeZone, Utc};
use hive_reviews::{CurrentUser, InMemoryStore, ProductReviewStore, Review, UserId};

pub const BASE_ID: u64 = 1_700_000_000_000;

pub fn ana() -> CurrentUser {
    CurrentUser::new(42u64, "Ana", "Babić")
}

pub fn products(store: &InMemoryStore) -> ProductReviewStore<InMemoryStore> {
    ProductReviewStore::new(store.clone(), "productReviews_")
}

/// A user review `n` minutes after the base time, with a body of `size` characters.
pub fn review(n: u64, author: &str, author_id: impl Into<UserId>, size: usize) -> Review {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64);
    Review {
        id: BASE_ID + n,
        author: author.to_string(),
        author_id: Some(author_id.into()),
        avatar: "/images/avatars/user.jpg".to_string(),
        comment: "x".repeat(size),
        likes: 1,
        dislikes: 0,
        has_liked: false,
        has_disliked: false,
        replies: Vec::new(),
        created_at: Some(created),
    }
}

/// `count` reviews by Ana starting at minute `from`.
pub fn anas(from: u64, count: u64, size: usize) -> Vec<Review> {
    (from..from + count)
        .map(|n| review(n, "Ana Babić", 42u64, size))
        .collect()
}

/// `count` reviews by another shopper starting at minute `from`.
pub fn others(from: u64, count: u64, size: usize) -> Vec<Review> {
    (from..from + count)
        .map(|n| review(n, "Ivo Perić", "u-7", size))
        .collect()
}
