use serde::{Deserialize, Serialize};

use hive_reviews_macros::AccountRecord;

use crate::model::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AccountRecord)]
#[serde(rename_all = "camelCase")]
#[record(prefix = "userAddress")]
pub struct ShippingAddress {
    pub user_id: UserId,
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// A saved payment card. Only the last four digits are ever kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCard {
    pub brand: String,
    pub holder: String,
    pub last4: String,
    /// `MM/YY`.
    pub expiry: String,
}

impl SavedCard {
    /// Build a card from a full number, dropping everything but the last four digits.
    pub fn from_number(
        number: &str,
        holder: impl Into<String>,
        expiry: impl Into<String>,
    ) -> SavedCard {
        let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        SavedCard {
            brand: card_brand(&digits).to_string(),
            holder: holder.into(),
            last4,
            expiry: expiry.into(),
        }
    }

    pub fn masked(&self) -> String {
        format!("**** **** **** {}", self.last4)
    }
}

fn card_brand(digits: &[char]) -> &'static str {
    match digits {
        ['4', ..] => "Visa",
        ['5', '1'..='5', ..] => "Mastercard",
        ['3', '4' | '7', ..] => "American Express",
        ['6', ..] => "Maestro",
        _ => "Kartica",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AccountRecord)]
#[serde(rename_all = "camelCase")]
#[record(prefix = "userCards")]
pub struct SavedCards {
    #[record(owner)]
    pub owner: UserId,
    #[serde(default)]
    pub cards: Vec<SavedCard>,
}

impl SavedCards {
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card: SavedCard) {
        self.cards.push(card);
    }

    /// Remove the card ending in `last4`. Returns true if one was removed.
    pub fn remove(&mut self, last4: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.last4 != last4);
        self.cards.len() != before
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl OrderLine {
    pub fn total_cents(&self) -> u64 {
        self.unit_price_cents * u64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Epoch milliseconds.
    pub placed_at: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_cents: u64,
}

impl Order {
    pub fn total_cents(&self) -> u64 {
        self.lines.iter().map(OrderLine::total_cents).sum::<u64>() + self.shipping_cents
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AccountRecord)]
#[serde(rename_all = "camelCase")]
#[record(prefix = "userOrders")]
pub struct OrderHistory {
    pub user_id: UserId,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl OrderHistory {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            orders: Vec::new(),
        }
    }

    pub fn record(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Orders, most recently placed first.
    pub fn recent(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().collect();
        orders.sort_by_key(|order| std::cmp::Reverse(order.placed_at));
        orders
    }

    pub fn lifetime_spend_cents(&self) -> u64 {
        self.orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .map(Order::total_cents)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AccountRecord)]
#[serde(rename_all = "camelCase")]
#[record(prefix = "userNotifications")]
pub struct NotificationSettings {
    pub user_id: UserId,
    #[serde(default = "enabled")]
    pub order_updates: bool,
    #[serde(default = "enabled")]
    pub review_replies: bool,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub promotions: bool,
}

fn enabled() -> bool {
    true
}

impl NotificationSettings {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            order_updates: true,
            review_replies: true,
            newsletter: false,
            promotions: false,
        }
    }
}
