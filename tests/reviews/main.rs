//! Integration tests for ReviewThread: seeding, reconciliation and user actions.


use chrono::Duration;
use fixtures::{ana, clock, ivo, open, quiet_product, sage_honey};
use hive_reviews::{
    CommentRef, EditState, InMemoryStore, KeyValueStore, ProductSummary, ReviewBlob,
    ReviewError, ReviewSource, UserId,
};

#[test]
fn product_three_shows_one_seed_review() {
    let store = InMemoryStore::new();
    let thread = open(&store, &clock(), sage_honey(), None);

    assert_eq!(thread.source(), ReviewSource::Seed);
    assert_eq!(thread.reviews().len(), 1);
    assert_eq!(thread.reviews()[0].author, "Luka Smajlović");
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn sparse_products_have_no_seed_reviews() {
    let store = InMemoryStore::new();
    let thread = open(&store, &clock(), quiet_product(), None);
    assert!(thread.reviews().is_empty());
}

#[test]
fn new_review_goes_first_with_user_identity() {
    let store = InMemoryStore::new();
    let mut thread = open(&store, &clock(), sage_honey(), Some(ana()));

    let id = thread.create_review("Odličan med!").unwrap();

    let first = &thread.reviews()[0];
    assert_eq!(first.id, id);
    assert_eq!(first.author, "Ana Babić");
    assert_eq!(first.author_id, Some(UserId::from(42)));
    assert_eq!(first.comment, "Odličan med!");
    assert_eq!((first.likes, first.dislikes), (0, 0));
    assert!(id > 1000);

    let raw = store.get("productReviews_3").unwrap().unwrap();
    let blob: ReviewBlob = serde_json::from_str(&raw).unwrap();
    assert_eq!(blob.reviews.len(), 1);
    assert_eq!(blob.reviews[0].id, id);
}

#[test]
fn created_review_survives_reload() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    let id = thread.create_review("Odličan med!").unwrap();

    let reopened = open(&store, &clock, sage_honey(), Some(ana()));
    assert_eq!(reopened.source(), ReviewSource::Merged);
    assert_eq!(reopened.reviews().len(), 2);
    assert_eq!(reopened.reviews()[0].id, id);
    assert_eq!(reopened.reviews()[1].author, "Luka Smajlović");
}

#[test]
fn reconciling_twice_is_stable() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    thread.create_review("Prvi").unwrap();
    clock.advance(Duration::minutes(5));
    thread.create_review("Drugi").unwrap();
    thread.toggle_like(CommentRef::Review(1)).unwrap();

    let first = open(&store, &clock, sage_honey(), Some(ana()));
    let second = open(&store, &clock, sage_honey(), Some(ana()));
    assert_eq!(first.reviews(), second.reviews());

    let mut reloaded = first;
    reloaded.reload();
    assert_eq!(reloaded.reviews(), second.reviews());
}

#[test]
fn blank_or_anonymous_posts_are_refused() {
    let store = InMemoryStore::new();
    let clock = clock();

    let mut anonymous = open(&store, &clock, sage_honey(), None);
    assert_eq!(
        anonymous.create_review("Fino"),
        Err(ReviewError::AuthenticationRequired)
    );
    assert_eq!(
        anonymous.toggle_like(CommentRef::Review(1)),
        Err(ReviewError::AuthenticationRequired)
    );

    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    assert_eq!(thread.create_review("   "), Err(ReviewError::EmptyComment));
    assert_eq!(thread.reviews().len(), 1);
    assert!(store.get("productReviews_3").unwrap().is_none());
}

#[test]
fn like_twice_restores_counts() {
    let store = InMemoryStore::new();
    let mut thread = open(&store, &clock(), sage_honey(), Some(ana()));
    let before = thread.reviews()[0].clone();

    thread.toggle_like(CommentRef::Review(before.id)).unwrap();
    let liked = thread.review(before.id).unwrap();
    assert!(liked.has_liked);
    assert_eq!(liked.likes, before.likes + 1);

    thread.toggle_like(CommentRef::Review(before.id)).unwrap();
    let after = thread.review(before.id).unwrap();
    assert!(!after.has_liked);
    assert_eq!(after.likes, before.likes);
}

#[test]
fn liking_a_disliked_review_moves_the_vote() {
    let store = InMemoryStore::new();
    let mut thread = open(&store, &clock(), sage_honey(), Some(ana()));
    let before = thread.reviews()[0].clone();
    let target = CommentRef::Review(before.id);

    thread.toggle_dislike(target).unwrap();
    thread.toggle_like(target).unwrap();

    let review = thread.review(before.id).unwrap();
    assert!(review.has_liked);
    assert!(!review.has_disliked);
    assert_eq!(review.likes, before.likes + 1);
    assert_eq!(review.dislikes, before.dislikes);
}

#[test]
fn seed_votes_persist_as_interactions() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    let before = thread.reviews()[0].clone();
    thread.toggle_like(CommentRef::Review(before.id)).unwrap();

    let raw = store.get("productReviews_3").unwrap().unwrap();
    let blob: ReviewBlob = serde_json::from_str(&raw).unwrap();
    assert!(blob.reviews.is_empty());
    assert!(blob.interactions[&before.id].has_liked);

    let reopened = open(&store, &clock, sage_honey(), Some(ana()));
    let review = reopened.review(before.id).unwrap();
    assert!(review.has_liked);
    assert_eq!(review.likes, before.likes + 1);
}

#[test]
fn replies_attach_to_their_review() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    let seed_id = thread.reviews()[0].id;
    let seed_replies = thread.reviews()[0].replies.len();

    let reply_id = thread.reply(seed_id, "Slažem se!").unwrap();
    let review = thread.review(seed_id).unwrap();
    assert_eq!(review.replies.len(), seed_replies + 1);
    let reply = review.reply(reply_id).unwrap();
    assert_eq!(reply.parent_id, Some(seed_id));
    assert_eq!(reply.author_id, Some(UserId::from(42)));

    // the seed review now carries a user reply and is persisted with it
    let reopened = open(&store, &clock, sage_honey(), Some(ana()));
    assert!(reopened.review(seed_id).unwrap().reply(reply_id).is_some());

    assert_eq!(
        thread.reply(999_999, "Nema"),
        Err(ReviewError::NotFound(CommentRef::Review(999_999)))
    );
}

#[test]
fn ids_stay_unique_within_one_millisecond() {
    let store = InMemoryStore::new();
    let mut thread = open(&store, &clock(), quiet_product(), Some(ana()));
    let first = thread.create_review("Jedan").unwrap();
    let second = thread.create_review("Dva").unwrap();
    let reply = thread.reply(first, "Tri").unwrap();
    assert!(second > first);
    assert!(reply > second);
}

#[test]
fn edit_backfills_author_id_for_name_matches() {
    let store = InMemoryStore::new();
    let legacy = r#"{"reviews":[{"id":1700000000000,"author":"ana  BABIĆ","avatar":"","comment":"Stari komentar","likes":2,"dislikes":0,"replies":[]}],"interactions":{},"timestamp":1700000000000}"#;
    store.set("productReviews_2", legacy.to_string()).unwrap();

    let mut thread = open(&store, &clock(), quiet_product(), Some(ana()));
    let target = CommentRef::Review(1_700_000_000_000);
    assert!(thread.is_own_review(thread.review(1_700_000_000_000).unwrap()));

    thread.edit(target, "Novi komentar").unwrap();
    let review = thread.review(1_700_000_000_000).unwrap();
    assert_eq!(review.comment, "Novi komentar");
    assert_eq!(review.author_id, Some(UserId::from(42)));
}

#[test]
fn exact_name_records_are_claimed_on_load() {
    let store = InMemoryStore::new();
    let legacy = r#"{"reviews":[{"id":1700000000000,"author":"Ana Babić","comment":"Stari","replies":[{"id":1700000000001,"author":"Ana Babić","comment":"Odgovor"}]}]}"#;
    store.set("productReviews_2", legacy.to_string()).unwrap();

    let thread = open(&store, &clock(), quiet_product(), Some(ana()));
    let review = &thread.reviews()[0];
    assert_eq!(review.author_id, Some(UserId::from(42)));
    assert_eq!(review.replies[0].author_id, Some(UserId::from(42)));
}

#[test]
fn foreign_records_cannot_be_changed() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut ivos = open(&store, &clock, quiet_product(), Some(ivo()));
    let id = ivos.create_review("Ivin komentar").unwrap();

    let mut thread = open(&store, &clock, quiet_product(), Some(ana()));
    let target = CommentRef::Review(id);
    assert_eq!(thread.edit(target, "Tuđe"), Err(ReviewError::NotOwner(target)));
    assert_eq!(thread.delete(target), Err(ReviewError::NotOwner(target)));
    assert_eq!(thread.begin_edit(target), Err(ReviewError::NotOwner(target)));
    assert_eq!(thread.review(id).unwrap().comment, "Ivin komentar");
}

#[test]
fn deleting_a_reply_keeps_its_siblings() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, quiet_product(), Some(ana()));
    let review_id = thread.create_review("Pitanje?").unwrap();
    let keep = thread.reply(review_id, "Prvi odgovor").unwrap();
    let drop = thread.reply(review_id, "Drugi odgovor").unwrap();

    thread.delete_reply(review_id, drop).unwrap();

    let review = thread.review(review_id).unwrap();
    assert_eq!(review.replies.len(), 1);
    assert_eq!(review.replies[0].id, keep);

    let reopened = open(&store, &clock, quiet_product(), Some(ana()));
    assert_eq!(reopened.review(review_id).unwrap().replies.len(), 1);
}

#[test]
fn deleting_a_review_removes_it_from_storage() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, quiet_product(), Some(ana()));
    let id = thread.create_review("Kratko").unwrap();
    thread.delete_review(id).unwrap();

    assert!(thread.reviews().is_empty());
    let reopened = open(&store, &clock, quiet_product(), Some(ana()));
    assert!(reopened.reviews().is_empty());
}

#[test]
fn edit_widget_flow() {
    let store = InMemoryStore::new();
    let mut thread = open(&store, &clock(), quiet_product(), Some(ana()));
    let id = thread.create_review("Prva verzija").unwrap();
    let target = CommentRef::Review(id);

    thread.begin_edit(target).unwrap();
    assert_eq!(thread.edit_state().draft(), Some("Prva verzija"));

    thread.set_draft("   ");
    assert_eq!(thread.save_edit(), Err(ReviewError::EmptyComment));
    assert!(thread.edit_state().is_editing(target));

    thread.set_draft("Druga verzija");
    thread.save_edit().unwrap();
    assert_eq!(thread.edit_state(), &EditState::Idle);
    assert_eq!(thread.review(id).unwrap().comment, "Druga verzija");

    thread.request_delete(target).unwrap();
    assert!(thread.edit_state().is_confirming_delete(target));
    thread.cancel();
    assert!(thread.edit_state().is_idle());
    assert!(thread.review(id).is_some());

    thread.request_delete(target).unwrap();
    thread.confirm_delete().unwrap();
    assert!(thread.review(id).is_none());
    assert!(thread.edit_state().is_idle());
}

#[test]
fn embedded_avatars_are_replaced_on_load_and_save() {
    let store = InMemoryStore::new();
    let raw = r#"{"reviews":[{"id":1700000000000,"author":"Ivo Perić","authorId":"u-7","avatar":"data:image/png;base64,iVBORw0KGgo=","comment":"Super","replies":[{"id":1700000000001,"author":"Ivo Perić","avatar":"DATA:image/png;base64,AAAA","comment":"Još"}]}]}"#;
    store.set("productReviews_2", raw.to_string()).unwrap();

    let clock = clock();
    let thread = open(&store, &clock, quiet_product(), Some(ana()));
    let review = &thread.reviews()[0];
    assert_eq!(review.avatar, "/images/default-avatar.png");
    assert_eq!(review.replies[0].avatar, "/images/default-avatar.png");

    let rewritten = store.get("productReviews_2").unwrap().unwrap();
    assert!(!rewritten.to_lowercase().contains("data:"));

    let user = ana().with_avatar("data:image/jpeg;base64,/9j/4AAQ");
    let mut thread = open(&store, &clock, quiet_product(), Some(user));
    thread.create_review("Sa slikom").unwrap();
    let saved = store.get("productReviews_2").unwrap().unwrap();
    assert!(!saved.contains("data:"));
}

#[test]
fn malformed_blob_falls_back_to_seed() {
    let store = InMemoryStore::new();
    store
        .set("productReviews_3", "{not json".to_string())
        .unwrap();

    let thread = open(&store, &clock(), sage_honey(), Some(ana()));
    assert_eq!(thread.source(), ReviewSource::Fallback);
    assert_eq!(thread.reviews().len(), 1);
    assert_eq!(thread.reviews()[0].author, "Luka Smajlović");
}

#[test]
fn switching_session_rebuilds_ownership() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, quiet_product(), Some(ana()));
    let id = thread.create_review("Moj").unwrap();
    assert!(thread.is_own_review(thread.review(id).unwrap()));

    thread.switch_session(&Some(ivo()));
    assert!(!thread.is_own_review(thread.review(id).unwrap()));

    thread.switch_session(&None::<hive_reviews::CurrentUser>);
    assert!(thread.user().is_none());
    assert_eq!(thread.reviews().len(), 1);
}

#[test]
fn popular_products_get_four_seed_reviews_newest_first() {
    let store = InMemoryStore::new();
    let product = ProductSummary::new(5, "Lipov med", 41);
    let thread = open(&store, &clock(), product, None);

    let reviews = thread.reviews();
    assert_eq!(reviews.len(), 4);
    assert!(reviews.iter().all(|r| r.id <= 4));
    assert!(reviews
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[test]
fn votes_on_seed_replies_move_by_one_and_persist() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut thread = open(&store, &clock, sage_honey(), Some(ana()));
    let target = CommentRef::Reply {
        review_id: 1,
        reply_id: 101,
    };
    let before = thread.review(1).unwrap().reply(101).unwrap().clone();

    thread.toggle_like(target).unwrap();
    let liked = thread.review(1).unwrap().reply(101).unwrap().clone();
    assert!(liked.has_liked && !liked.has_disliked);
    assert_eq!(liked.likes, before.likes + 1);
    assert_eq!(liked.dislikes, before.dislikes);

    thread.toggle_dislike(target).unwrap();
    let disliked = thread.review(1).unwrap().reply(101).unwrap().clone();
    assert!(!disliked.has_liked && disliked.has_disliked);
    assert_eq!(disliked.likes, before.likes);
    assert_eq!(disliked.dislikes, before.dislikes + 1);

    let raw = store.get("productReviews_3").unwrap().unwrap();
    let blob: ReviewBlob = serde_json::from_str(&raw).unwrap();
    assert!(blob.reviews.is_empty());
    assert!(blob.interactions[&101].has_disliked);
    assert!(!blob.interactions[&101].has_liked);

    let reopened = open(&store, &clock, sage_honey(), Some(ana()));
    let restored = reopened.review(1).unwrap().reply(101).unwrap();
    assert!(restored.has_disliked && !restored.has_liked);
    assert_eq!(restored.dislikes, before.dislikes + 1);
    assert_eq!(restored.likes, before.likes);
}

#[test]
fn liking_a_user_reply_stores_its_parent() {
    let store = InMemoryStore::new();
    let clock = clock();
    let mut ivos = open(&store, &clock, quiet_product(), Some(ivo()));
    let review_id = ivos.create_review("Ima li tko iskustva?").unwrap();
    let reply_id = ivos.reply(review_id, "Ja imam.").unwrap();

    let mut thread = open(&store, &clock, quiet_product(), Some(ana()));
    thread
        .toggle_like(CommentRef::Reply {
            review_id,
            reply_id,
        })
        .unwrap();

    let raw = store.get("productReviews_2").unwrap().unwrap();
    let blob: ReviewBlob = serde_json::from_str(&raw).unwrap();
    let parent = blob.reviews.iter().find(|r| r.id == review_id).unwrap();
    let reply = parent.reply(reply_id).unwrap();
    assert!(reply.has_liked);
    assert_eq!(reply.likes, 1);
    assert!(blob.interactions[&reply_id].has_liked);

    let reopened = open(&store, &clock, quiet_product(), Some(ana()));
    assert_eq!(reopened.review(review_id).unwrap().reply(reply_id).unwrap().likes, 1);
}
