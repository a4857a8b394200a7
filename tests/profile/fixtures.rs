use chrono::{DateTime, Duration, TimeZone, Utc};
use hive_reviews::{
    CommentRef, CurrentUser, FixedClock, InMemoryStore, KeyValueStore, ProductCatalog,
    ReviewThread, ReviewsConfig, StaticCatalog,
};

pub fn ana() -> CurrentUser {
    CurrentUser::new(42u64, "Ana", "Babić")
}

pub fn ivo() -> CurrentUser {
    CurrentUser::new("u-7", "Ivo", "Perić")
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
}

pub fn thread(
    store: &InMemoryStore,
    clock: &FixedClock,
    product_id: u64,
    user: &CurrentUser,
) -> ReviewThread<InMemoryStore, FixedClock> {
    let product = StaticCatalog::honey()
        .product(product_id)
        .expect("product in catalog");
    ReviewThread::open(
        store.clone(),
        ReviewsConfig::default(),
        clock.clone(),
        product,
        &Some(user.clone()),
    )
}

/// Ana's activity across the honey range, one minute apart:
///
/// - minutes 0-6: one review on each of products 1-7
/// - minutes 7-10: four more reviews on product 4
/// - minute 11: a like and a reply on product 5's first seed review
/// - minute 12: Ivo reviews product 1
/// - product 8 holds a legacy review signed "Ana Babić" without an author id
///   or date, and one signed "ana babić"
///
/// Returns the id of Ana's reply on product 5.
pub fn populate(store: &InMemoryStore, clock: &FixedClock) -> u64 {
    let ana = ana();
    for product_id in 1..=7 {
        thread(store, clock, product_id, &ana)
            .create_review(&format!("Recenzija proizvoda {}", product_id))
            .unwrap();
        clock.advance(Duration::minutes(1));
    }

    let mut chestnut = thread(store, clock, 4, &ana);
    for n in 1..=4 {
        chestnut
            .create_review(&format!("Još o kestenu {}", n))
            .unwrap();
        clock.advance(Duration::minutes(1));
    }

    let mut linden = thread(store, clock, 5, &ana);
    linden.toggle_like(CommentRef::Review(1)).unwrap();
    let reply = linden.reply(1, "Potpuno se slažem").unwrap();
    clock.advance(Duration::minutes(1));

    thread(store, clock, 1, &ivo())
        .create_review("Ivin komentar")
        .unwrap();

    let legacy = r#"{"reviews":[
        {"id":1600000000000,"author":"Ana Babić","comment":"Stara recenzija"},
        {"id":1600000000001,"author":"ana babić","comment":"Tuđa ili moja?"}
    ]}"#;
    store
        .set("productReviews_8", legacy.to_string())
        .unwrap();

    reply
}
