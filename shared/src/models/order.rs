//! Order Model
//!
//! Orders reference one menu and one client. Line items are stored as a JSONB
//! snapshot so later dish edits never rewrite order history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Delivered and cancelled orders no longer change status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order originator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// Dine-in, identified by table number
    Internal,
    /// Delivery, identified by address and phone
    External,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "internal" => Some(Self::Internal),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}

/// Client details submitted with an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_client_info"))]
pub struct ClientInfo {
    pub client_type: ClientType,
    #[validate(length(min = 1, max = 20, message = "Table number is too long"))]
    pub table_number: Option<String>,
    #[validate(length(max = 120, message = "Name is too long"))]
    pub name: Option<String>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address is too long"))]
    pub address: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn validate_client_info(info: &ClientInfo) -> Result<(), ValidationError> {
    let ok = match info.client_type {
        ClientType::Internal => present(&info.table_number),
        ClientType::External => present(&info.address) && present(&info.phone),
    };
    if ok {
        Ok(())
    } else {
        let msg = match info.client_type {
            ClientType::Internal => "Dine-in orders require a table number",
            ClientType::External => "Delivery orders require an address and phone",
        };
        Err(ValidationError::new("client_info_missing").with_message(msg.into()))
    }
}

/// One requested line item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub dish_id: i64,
    #[validate(range(min = 1, max = 999, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(max = 255, message = "Item notes are too long"))]
    pub notes: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub menu_id: i64,
    #[validate(nested)]
    pub client: ClientInfo,
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Stored line item snapshot (price at order time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order entity as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub menu_id: i64,
    pub client_id: i64,
    pub client_type: ClientType,
    pub table_number: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub notes: Option<String>,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Order list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
    pub menu_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dine_in(table: Option<&str>) -> ClientInfo {
        ClientInfo {
            client_type: ClientType::Internal,
            table_number: table.map(String::from),
            name: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn status_parse_and_terminal() {
        assert_eq!(OrderStatus::parse("ready"), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::parse("READY"), None);
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn internal_client_requires_table() {
        assert!(dine_in(Some("12")).validate().is_ok());
        assert!(dine_in(None).validate().is_err());
        assert!(dine_in(Some("")).validate().is_err());
    }

    #[test]
    fn external_client_requires_address_and_phone() {
        let mut info = ClientInfo {
            client_type: ClientType::External,
            table_number: None,
            name: Some("Ana".into()),
            phone: Some("555-0101".into()),
            address: None,
        };
        assert!(info.validate().is_err());
        info.address = Some("1 Main St".into());
        assert!(info.validate().is_ok());
    }

    #[test]
    fn order_rejects_empty_items_and_zero_quantity() {
        let mut order = OrderCreate {
            menu_id: 1,
            client: dine_in(Some("3")),
            items: vec![],
            notes: None,
        };
        let errors = order.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));

        order.items.push(OrderItemInput {
            dish_id: 4,
            quantity: 0,
            notes: None,
        });
        assert!(order.validate().is_err());

        order.items[0].quantity = 2;
        assert!(order.validate().is_ok());
    }
}
