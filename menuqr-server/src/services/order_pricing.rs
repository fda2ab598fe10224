//! Server-side order pricing
//!
//! Line prices always come from the dish table; anything the client sends
//! besides dish id and quantity is ignored.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderItem, OrderItemInput};

/// Exclusive upper bound of `orders.total NUMERIC(10,2)`
const TOTAL_LIMIT: i64 = 100_000_000;

/// Build priced line snapshots and the order total.
///
/// `prices` maps dish id to (name, unit price) for dishes of the order's menu;
/// an item whose dish is missing there is rejected.
pub fn price_items(
    items: &[OrderItemInput],
    prices: &HashMap<i64, (String, Decimal)>,
) -> Result<(Vec<OrderItem>, Decimal), AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        if item.quantity < 1 {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                "Quantity must be at least 1",
            )
            .with_detail("dish_id", item.dish_id));
        }
        let (name, unit_price) = prices.get(&item.dish_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Dish {} is not on this menu", item.dish_id),
            )
            .with_detail("dish_id", item.dish_id)
        })?;

        let line_total = (*unit_price * Decimal::from(item.quantity)).round_dp(2);
        total += line_total;
        lines.push(OrderItem {
            dish_id: item.dish_id,
            name: name.clone(),
            unit_price: *unit_price,
            quantity: item.quantity,
            line_total,
            notes: item.notes.clone(),
        });
    }

    let total = total.round_dp(2);
    if total >= Decimal::from(TOTAL_LIMIT) {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is too large")
                .with_detail("total", total.to_string()),
        );
    }
    Ok((lines, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn prices() -> HashMap<i64, (String, Decimal)> {
        HashMap::from([
            (1, ("Soup".to_string(), Decimal::from_str("6.50").unwrap())),
            (2, ("Steak".to_string(), Decimal::from_str("21.00").unwrap())),
        ])
    }

    fn item(dish_id: i64, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            dish_id,
            quantity,
            notes: None,
        }
    }

    #[test]
    fn totals_from_server_prices() {
        let (lines, total) = price_items(&[item(1, 2), item(2, 1)], &prices()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_total, Decimal::from_str("13.00").unwrap());
        assert_eq!(lines[1].name, "Steak");
        assert_eq!(total, Decimal::from_str("34.00").unwrap());
    }

    #[test]
    fn rejects_empty_order() {
        let err = price_items(&[], &prices()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn rejects_dish_from_other_menu() {
        let err = price_items(&[item(99, 1)], &prices()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
    }

    #[test]
    fn rejects_total_beyond_storage_bound() {
        let mut prices = prices();
        prices.insert(3, ("Caviar".to_string(), Decimal::from(99_999_999)));
        let err = price_items(&[item(3, 2)], &prices).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let (_, total) = price_items(&[item(3, 1)], &prices).unwrap();
        assert_eq!(total, Decimal::from(99_999_999));
    }

    #[test]
    fn rejects_zero_quantity() {
        let err = price_items(&[item(1, 0)], &prices()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
    }
}
