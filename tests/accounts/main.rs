//! Integration tests for per-user account records and password overrides.

use hive_reviews::{
    AccountError, AccountRecord, AccountRecordsExt, InMemoryStore, KeyValueStore,
    NotificationSettings, Order, OrderHistory, OrderLine, OrderStatus, SavedCard, SavedCards,
    ShippingAddress, UserId, PASSWORD_OVERRIDES_KEY,
};
use serde::{Deserialize, Serialize};

fn address(user_id: impl Into<UserId>) -> ShippingAddress {
    ShippingAddress {
        user_id: user_id.into(),
        full_name: "Ana Babić".into(),
        street: "Ilica 10".into(),
        city: "Zagreb".into(),
        postal_code: "10000".into(),
        country: "Hrvatska".into(),
        phone: String::new(),
    }
}

#[test]
fn records_are_keyed_by_owner() {
    let store = InMemoryStore::new();
    store.records::<ShippingAddress>().save(&address(42u64)).unwrap();
    store.records::<ShippingAddress>().save(&address("u-7")).unwrap();

    assert!(store.get("userAddress_42").unwrap().is_some());
    assert!(store.get("userAddress_u-7").unwrap().is_some());

    let loaded = store
        .records::<ShippingAddress>()
        .get(&UserId::from(42))
        .unwrap()
        .unwrap();
    assert_eq!(loaded, address(42u64));
    assert!(store
        .records::<ShippingAddress>()
        .get(&UserId::from(1))
        .unwrap()
        .is_none());
}

#[test]
fn numeric_and_string_ids_share_a_key() {
    let store = InMemoryStore::new();
    store
        .records::<NotificationSettings>()
        .save(&NotificationSettings::new(UserId::from(42)))
        .unwrap();

    let by_string = store
        .records::<NotificationSettings>()
        .get(&UserId::from("42"))
        .unwrap();
    assert!(by_string.is_some());
}

#[test]
fn delete_removes_only_that_record() {
    let store = InMemoryStore::new();
    let owner = UserId::from(42);
    store.records::<ShippingAddress>().save(&address(42u64)).unwrap();
    store
        .records::<NotificationSettings>()
        .save(&NotificationSettings::new(owner.clone()))
        .unwrap();

    assert!(store.records::<ShippingAddress>().delete(&owner).unwrap());
    assert!(!store.records::<ShippingAddress>().delete(&owner).unwrap());
    assert!(store
        .records::<NotificationSettings>()
        .get(&owner)
        .unwrap()
        .is_some());
}

#[test]
fn saved_cards_never_store_full_numbers() {
    let store = InMemoryStore::new();
    let mut cards = SavedCards::new(UserId::from(42));
    cards.add(SavedCard::from_number("4111-1111-1111-1111", "Ana Babić", "08/27"));
    cards.add(SavedCard::from_number("5500 0000 0000 0004", "Ana Babić", "01/28"));
    store.records::<SavedCards>().save(&cards).unwrap();

    let raw = store.get("userCards_42").unwrap().unwrap();
    assert!(!raw.contains("4111"));
    assert!(!raw.contains("5500"));

    let mut loaded = store
        .records::<SavedCards>()
        .get(&UserId::from(42))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.cards.len(), 2);
    assert!(loaded.remove("0004"));
    assert!(!loaded.remove("9999"));
    assert_eq!(loaded.cards[0].last4, "1111");
}

#[test]
fn order_history_round_trips() {
    let store = InMemoryStore::new();
    let mut history = OrderHistory::new(UserId::from(42));
    history.record(Order {
        id: "HR-1001".into(),
        placed_at: 1_714_000_000_000,
        status: OrderStatus::Shipped,
        lines: vec![
            OrderLine {
                product_id: 4,
                name: "Kestenov med".into(),
                quantity: 2,
                unit_price_cents: 1_490,
            },
            OrderLine {
                product_id: 8,
                name: "Medljikovac".into(),
                quantity: 1,
                unit_price_cents: 1_890,
            },
        ],
        shipping_cents: 350,
    });
    store.records::<OrderHistory>().save(&history).unwrap();

    let loaded = store
        .records::<OrderHistory>()
        .get(&UserId::from(42))
        .unwrap()
        .unwrap();
    assert_eq!(loaded, history);
    assert_eq!(loaded.orders[0].total_cents(), 5_220);
    assert_eq!(loaded.lifetime_spend_cents(), 5_220);
}

#[test]
fn malformed_record_is_a_serde_error() {
    let store = InMemoryStore::new();
    store.set("userOrders_42", "[1,2".to_string()).unwrap();
    let err = store
        .records::<OrderHistory>()
        .get(&UserId::from(42))
        .unwrap_err();
    assert!(matches!(err, AccountError::Serde(_)));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, hive_reviews::AccountRecord)]
#[serde(rename_all = "camelCase")]
struct Wishlist {
    #[record(owner)]
    shopper: UserId,
    product_ids: Vec<u64>,
}

#[test]
fn derived_records_default_their_prefix() {
    assert_eq!(Wishlist::PREFIX, "userWishlist");

    let store = InMemoryStore::new();
    let wishlist = Wishlist {
        shopper: UserId::from("u-7"),
        product_ids: vec![1, 5],
    };
    store.records::<Wishlist>().save(&wishlist).unwrap();
    assert!(store.get("userWishlist_u-7").unwrap().is_some());
}

#[test]
fn first_password_change_needs_no_current_password() {
    let store = InMemoryStore::new();
    let credentials = store.credentials();

    credentials
        .change_password("Ana@Example.com", "", "saće-i-med")
        .unwrap();
    assert!(credentials.has_override("ana@example.com").unwrap());
    assert!(credentials.verify("ANA@example.com", "saće-i-med").unwrap());

    let raw = store.get(PASSWORD_OVERRIDES_KEY).unwrap().unwrap();
    assert!(!raw.contains("saće-i-med"));
}

#[test]
fn later_changes_require_the_current_password() {
    let store = InMemoryStore::new();
    let credentials = store.credentials();
    credentials
        .change_password("ana@example.com", "", "prva-lozinka")
        .unwrap();

    assert_eq!(
        credentials.change_password("ana@example.com", "pogresna", "druga-lozinka"),
        Err(AccountError::InvalidPassword)
    );
    credentials
        .change_password("ana@example.com", "prva-lozinka", "druga-lozinka")
        .unwrap();

    assert!(credentials.verify("ana@example.com", "druga-lozinka").unwrap());
    assert!(!credentials.verify("ana@example.com", "prva-lozinka").unwrap());
    assert!(credentials.clear("ana@example.com").unwrap());
    assert!(!credentials.has_override("ana@example.com").unwrap());
}

#[test]
fn overrides_are_kept_per_email() {
    let store = InMemoryStore::new();
    let credentials = store.credentials();
    credentials
        .change_password("ana@example.com", "", "anina-lozinka")
        .unwrap();
    credentials
        .change_password("ivo@example.com", "", "ivina-lozinka")
        .unwrap();

    assert!(credentials.verify("ana@example.com", "anina-lozinka").unwrap());
    assert!(!credentials.verify("ana@example.com", "ivina-lozinka").unwrap());
    assert!(!credentials.verify("maja@example.com", "anina-lozinka").unwrap());
}
