extern crate self as hive_reviews;

mod account;
mod avatar;
mod catalog;
mod clock;
mod config;
mod error;
mod identity;
mod model;
mod persist;
mod profile;
mod reconcile;
mod seed;
mod store;
mod thread;

pub use account::{
    AccountError, AccountRecord, AccountRecordsExt, CredentialStore, NotificationSettings, Order,
    OrderHistory, OrderLine, OrderStatus, RecordRepository, SavedCard, SavedCards,
    ShippingAddress, MIN_PASSWORD_LEN, PASSWORD_OVERRIDES_KEY,
};
pub use avatar::{is_data_uri, sanitize_avatar, sanitize_reviews, DATA_URI_PREFIX};
pub use catalog::{ProductCatalog, ProductSummary, StaticCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ReviewsConfig, CONFIG_KEY};
pub use error::StoreError;
pub use identity::{
    claim_ownership, is_owned_by, is_unclaimed_by, names_match, CurrentUser, Session,
};
pub use model::{
    sort_newest_first, Comment, CommentRef, Interaction, Reply, Review, ReviewBlob, ReviewId,
    UserId, Votes,
};
pub use persist::{
    collect_interactions, keep_newest, select_user_records, CapacityPolicy, Persister,
    SaveOutcome,
};
pub use profile::{
    paginate, time_ago, CommentKind, CommentPage, CommentQuery, KindFilter, MyComment,
    MyComments, ProductGroup,
};
pub use reconcile::{apply_interactions, resolve, ReconciledReviews, Reconciler, ReviewSource};
pub use seed::{is_mock_id, mock_reviews, ReviewBucket};
pub use store::{InMemoryStore, KeyValueStore, ProductReviewStore, STORAGE_EVENT};
pub use thread::{validate_text, EditState, ReviewError, ReviewThread};

// Derive macro for per-user account records
pub use hive_reviews_macros::AccountRecord;

// Re-export the EventEmitter behind storage-change notifications
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
