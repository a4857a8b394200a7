use std::fmt;

use crate::error::StoreError;
use crate::model::CommentRef;

/// Why a review operation was refused.
///
/// `AuthenticationRequired` and `EmptyComment` are user-facing notices: the
/// operation is aborted and nothing changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    AuthenticationRequired,
    EmptyComment,
    NotFound(CommentRef),
    NotOwner(CommentRef),
    Store(StoreError),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::AuthenticationRequired => {
                write!(f, "you must be signed in to do that")
            }
            ReviewError::EmptyComment => write!(f, "comment text must not be empty"),
            ReviewError::NotFound(target) => write!(f, "{} not found", target),
            ReviewError::NotOwner(target) => {
                write!(f, "{} belongs to another user", target)
            }
            ReviewError::Store(err) => write!(f, "review storage error: {}", err),
        }
    }
}

impl std::error::Error for ReviewError {}

impl From<StoreError> for ReviewError {
    fn from(err: StoreError) -> Self {
        ReviewError::Store(err)
    }
}
