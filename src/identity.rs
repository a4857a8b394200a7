//! The signed-in user and ownership resolution.
//!
//! Ownership is decided in this order: the record's author id equals the
//! user's id, then the author name matches the user's full name, otherwise the
//! record belongs to someone else. Records written before author ids existed
//! are migrated once at load time by [`claim_ownership`]; the predicates here
//! never mutate.

use crate::model::{Comment, Review, UserId};

/// The user the current session is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl CurrentUser {
    pub fn new(
        id: impl Into<UserId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            avatar: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Avatar to stamp on new records, or `placeholder` when the user has none.
    pub fn avatar_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.avatar
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(placeholder)
    }
}

/// Authentication context consumed by the review subsystem.
pub trait Session {
    fn current_user(&self) -> Option<&CurrentUser>;
}

impl Session for CurrentUser {
    fn current_user(&self) -> Option<&CurrentUser> {
        Some(self)
    }
}

impl Session for Option<CurrentUser> {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.as_ref()
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case- and whitespace-insensitive name comparison.
pub fn names_match(author: &str, full_name: &str) -> bool {
    let author = normalize_name(author);
    !author.is_empty() && author == normalize_name(full_name)
}

/// True when `record` belongs to `user`: matching author id, or matching name.
pub fn is_owned_by<C: Comment>(record: &C, user: &CurrentUser) -> bool {
    if record.author_id() == Some(&user.id) {
        return true;
    }
    names_match(record.author(), &user.full_name())
}

/// True when `record` has no author id and its name is exactly the user's full name.
pub fn is_unclaimed_by<C: Comment>(record: &C, user: &CurrentUser) -> bool {
    record.author_id().is_none() && record.author() == user.full_name()
}

/// Assign the user's id to every review and reply that predates author ids
/// and carries the user's exact full name. Returns how many records changed.
pub fn claim_ownership(reviews: &mut [Review], user: &CurrentUser) -> usize {
    let mut claimed = 0;
    for review in reviews.iter_mut() {
        if is_unclaimed_by(review, user) {
            review.set_author_id(user.id.clone());
            claimed += 1;
        }
        for reply in review.replies.iter_mut() {
            if is_unclaimed_by(reply, user) {
                reply.set_author_id(user.id.clone());
                claimed += 1;
            }
        }
    }
    claimed
}
