//! Seed reviews shown until real users have written anything.
//!
//! Seed content is synthesized on every load from the product id and its
//! catalog review count and is never written back to the store.

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::ProductSummary;
use crate::model::{Reply, Review, ReviewId, UserId};

/// How many seed reviews a product gets, by advertised review count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBucket {
    /// Fewer than 5 reviews.
    Sparse,
    /// 5 to 9 reviews.
    Few,
    /// 10 to 19 reviews.
    Several,
    /// 20 to 30 reviews.
    Many,
    /// More than 30 reviews.
    Popular,
}

impl ReviewBucket {
    pub fn from_count(count: u32) -> Self {
        match count {
            0..=4 => ReviewBucket::Sparse,
            5..=9 => ReviewBucket::Few,
            10..=19 => ReviewBucket::Several,
            20..=30 => ReviewBucket::Many,
            _ => ReviewBucket::Popular,
        }
    }

    pub fn mock_count(self) -> usize {
        match self {
            ReviewBucket::Sparse => 0,
            ReviewBucket::Few => 1,
            ReviewBucket::Several => 2,
            ReviewBucket::Many => 3,
            ReviewBucket::Popular => 4,
        }
    }
}

const DEFAULT_AVATAR: &str = "/images/default-avatar.png";

struct SeedReply {
    author: &'static str,
    comment: &'static str,
    likes: i64,
    at: (i32, u32, u32, u32, u32),
}

struct SeedReview {
    author: &'static str,
    avatar: &'static str,
    comment: &'static str,
    likes: i64,
    dislikes: i64,
    at: (i32, u32, u32, u32, u32),
    replies: &'static [SeedReply],
}

const POOL: &[SeedReview] = &[
    SeedReview {
        author: "Marija Horvat",
        avatar: "/images/avatars/marija.jpg",
        comment: "Najbolji med koji sam ikad probala, gust i mirisan. Naručujem opet!",
        likes: 14,
        dislikes: 0,
        at: (2024, 2, 14, 10, 30),
        replies: &[SeedReply {
            author: "Ivan Kovačević",
            comment: "Slažem se, pogotovo uz čaj.",
            likes: 3,
            at: (2024, 2, 15, 8, 5),
        }],
    },
    SeedReview {
        author: "Ivan Kovačević",
        avatar: "/images/avatars/ivan.jpg",
        comment: "Dostava brza, staklenka dobro zapakirana. Okus odličan.",
        likes: 9,
        dislikes: 1,
        at: (2024, 3, 2, 17, 45),
        replies: &[],
    },
    SeedReview {
        author: "Petra Novak",
        avatar: "/images/avatars/petra.jpg",
        comment: "Malo preslatko za moj ukus, ali djeca ga obožavaju.",
        likes: 5,
        dislikes: 2,
        at: (2024, 1, 20, 9, 0),
        replies: &[],
    },
    SeedReview {
        author: "Luka Smajlović",
        avatar: "/images/avatars/luka.jpg",
        comment: "Pravi domaći med, vidi se da pčelar zna svoj posao. Preporuka!",
        likes: 21,
        dislikes: 0,
        at: (2024, 4, 8, 12, 15),
        replies: &[SeedReply {
            author: "Marija Horvat",
            comment: "Potvrđujem, kupujem već treću godinu.",
            likes: 4,
            at: (2024, 4, 9, 7, 40),
        }],
    },
    SeedReview {
        author: "Tomislav Marić",
        avatar: "/images/avatars/tomislav.jpg",
        comment: "Kristalizirao se nakon mjesec dana, ali to je znak da je prirodan.",
        likes: 11,
        dislikes: 1,
        at: (2023, 12, 3, 19, 20),
        replies: &[],
    },
    SeedReview {
        author: "Ivana Knežević",
        avatar: "/images/avatars/ivana.jpg",
        comment: "Cijena je malo viša, ali kvaliteta to opravdava.",
        likes: 7,
        dislikes: 3,
        at: (2024, 5, 1, 11, 10),
        replies: &[],
    },
    SeedReview {
        author: "Marko Perić",
        avatar: "/images/avatars/marko.jpg",
        comment: "Koristim ga za kolače i palačinke, savršen je.",
        likes: 6,
        dislikes: 0,
        at: (2024, 2, 27, 15, 55),
        replies: &[],
    },
    SeedReview {
        author: "Maja Pavlović",
        avatar: "/images/avatars/maja.jpg",
        comment: "Lijep, blag okus. Stiglo za dva dana.",
        likes: 4,
        dislikes: 0,
        at: (2024, 3, 19, 20, 0),
        replies: &[SeedReply {
            author: "Petra Novak",
            comment: "Kod mene isto, brza dostava.",
            likes: 1,
            at: (2024, 3, 20, 9, 30),
        }],
    },
];

fn at((y, mo, d, h, mi): (i32, u32, u32, u32, u32)) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single()
}

/// Seed reviews for a product.
///
/// The pool is read from offset `product_id % pool size`, wrapping. Review
/// ids are `1..=4`, reply ids `review_id * 100 + n`; both stay below the
/// mock-id ceiling.
pub fn mock_reviews(product: &ProductSummary) -> Vec<Review> {
    let count = ReviewBucket::from_count(product.review_count).mock_count();
    let offset = (product.id % POOL.len() as u64) as usize;

    (0..count)
        .map(|position| {
            let seed = &POOL[(offset + position) % POOL.len()];
            let id = position as ReviewId + 1;
            Review {
                id,
                author: seed.author.to_string(),
                author_id: Some(seed_author_id(seed.author)),
                avatar: seed.avatar.to_string(),
                comment: seed.comment.to_string(),
                likes: seed.likes,
                dislikes: seed.dislikes,
                has_liked: false,
                has_disliked: false,
                replies: seed
                    .replies
                    .iter()
                    .enumerate()
                    .map(|(n, reply)| Reply {
                        id: id * 100 + n as ReviewId + 1,
                        parent_id: Some(id),
                        author: reply.author.to_string(),
                        author_id: Some(seed_author_id(reply.author)),
                        avatar: pool_avatar(reply.author).to_string(),
                        comment: reply.comment.to_string(),
                        likes: reply.likes,
                        dislikes: 0,
                        has_liked: false,
                        has_disliked: false,
                        created_at: at(reply.at),
                    })
                    .collect(),
                created_at: at(seed.at),
            }
        })
        .collect()
}

/// Reply authors reuse their pool avatar.
fn pool_avatar(author: &str) -> &'static str {
    POOL.iter()
        .find(|seed| seed.author == author)
        .map(|seed| seed.avatar)
        .unwrap_or(DEFAULT_AVATAR)
}

/// Seed authors get a stable synthetic id so they never match a real account.
fn seed_author_id(author: &str) -> UserId {
    let slug: String = author
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    UserId::new(format!("seed-{}", slug))
}

/// True for ids in the seed range.
pub fn is_mock_id(id: ReviewId, ceiling: u64) -> bool {
    id <= ceiling
}
