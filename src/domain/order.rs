use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ReservedStock, UserSummary};

/// Lifecycle of an order. `Delivered` and `Cancelled` are terminal for customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the owner may still cancel an order in this status.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Shipped)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A line item frozen at purchase time. Later catalog edits never reach it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: String,
    pub name: String,
    pub price: Decimal,
    pub qty: u32,
}

impl From<ReservedStock> for LineItem {
    fn from(reserved: ReservedStock) -> Self {
        Self {
            product: reserved.product_id,
            name: reserved.name,
            price: reserved.price,
            qty: reserved.qty,
        }
    }
}

impl LineItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Case-insensitive substring match over address, city and postal code.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.address, &self.city, &self.postal_code]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    /// Bumped on every status change; orders revenue events for the same order.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One requested line at checkout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItemRequest {
    pub product: String,
    pub qty: u32,
}

/// Checkout payload submitted by a customer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
}

impl PlaceOrder {
    pub fn new(items: Vec<(&str, u32)>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|(product, qty)| OrderItemRequest { product: product.to_string(), qty })
                .collect(),
            shipping_address: ShippingAddress::default(),
        }
    }
}

/// An order together with a summary of its customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<UserSummary>,
}

/// Params for persisting a new order. Items are already reserved snapshots.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
}

impl Order {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!(" SHIPPED ".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert_eq!(
            "Lost".parse::<OrderStatus>(),
            Err(UnknownStatus("Lost".to_string()))
        );
    }

    #[test]
    fn test_cancellable_statuses() {
        let cancellable: Vec<_> = OrderStatus::ALL.into_iter().filter(|s| s.is_cancellable()).collect();
        assert_eq!(cancellable, vec![OrderStatus::Processing]);
    }

    #[test]
    fn test_shipping_address_search() {
        let address = ShippingAddress {
            address: "12 Harbour Road".into(),
            city: "Lisbon".into(),
            postal_code: "1100-148".into(),
            country: "PT".into(),
        };
        assert!(address.matches("harbour"));
        assert!(address.matches("LISB"));
        assert!(address.matches("1100"));
        assert!(!address.matches("PT"));
    }
}
