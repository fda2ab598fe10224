//! Day bucketing for the orders-by-day dashboard
//!
//! Range bounds and bucket labels are computed in the same timezone, so an
//! order never lands in a day outside the requested range.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use shared::models::{DailyOrders, OrderStatus};
use shared::util::format_date;

/// One order in the requested window
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderStamp {
    pub created_at: i64,
    pub total: Decimal,
    pub status: String,
}

/// Midnight at the start of `day` in `tz`, in epoch milliseconds
pub fn day_start_millis<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Group orders by their calendar day in `tz`, oldest day first.
/// Cancelled orders are counted but add nothing to revenue.
pub fn bucket_by_day<Tz: TimeZone>(stamps: &[OrderStamp], tz: &Tz) -> Vec<DailyOrders> {
    let mut days: BTreeMap<NaiveDate, (i64, Decimal)> = BTreeMap::new();

    for stamp in stamps {
        let Some(at) = tz.timestamp_millis_opt(stamp.created_at).single() else {
            tracing::warn!(created_at = stamp.created_at, "Order timestamp out of range");
            continue;
        };
        let entry = days.entry(at.date_naive()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        if OrderStatus::parse(&stamp.status) != Some(OrderStatus::Cancelled) {
            entry.1 += stamp.total;
        }
    }

    days.into_iter()
        .map(|(date, (orders, revenue))| DailyOrders {
            date: format_date(date),
            orders,
            revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use std::str::FromStr;

    fn paris_summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stamp(rfc3339: &str, total: &str, status: &str) -> OrderStamp {
        OrderStamp {
            created_at: chrono::DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .timestamp_millis(),
            total: Decimal::from_str(total).unwrap(),
            status: status.to_string(),
        }
    }

    #[test]
    fn just_after_midnight_stays_in_its_local_day() {
        let tz = paris_summer();
        let order = stamp("2025-06-11T00:30:00+02:00", "12.50", "pending");

        let from = day_start_millis(day("2025-06-11"), &tz);
        let to = day_start_millis(day("2025-06-12"), &tz);
        assert!(order.created_at >= from && order.created_at < to);

        let buckets = bucket_by_day(&[order], &tz);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, "2025-06-11");
        assert_eq!(buckets[0].orders, 1);
    }

    #[test]
    fn same_instant_differs_by_zone() {
        let order = stamp("2025-06-11T00:30:00+02:00", "10.00", "pending");
        assert_eq!(bucket_by_day(std::slice::from_ref(&order), &Utc)[0].date, "2025-06-10");
        assert_eq!(bucket_by_day(&[order], &paris_summer())[0].date, "2025-06-11");
    }

    #[test]
    fn cancelled_orders_count_without_revenue() {
        let buckets = bucket_by_day(
            &[
                stamp("2025-06-10T12:00:00Z", "20.00", "delivered"),
                stamp("2025-06-10T13:00:00Z", "5.00", "cancelled"),
                stamp("2025-06-09T09:00:00Z", "7.25", "pending"),
            ],
            &Utc,
        );
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, "2025-06-09");
        assert_eq!(buckets[1].orders, 2);
        assert_eq!(buckets[1].revenue, Decimal::from_str("20.00").unwrap());
    }

    #[test]
    fn day_boundaries_are_one_day_apart() {
        let tz = paris_summer();
        let start = day_start_millis(day("2025-06-10"), &tz);
        let next = day_start_millis(day("2025-06-11"), &tz);
        assert_eq!(next - start, 86_400_000);
    }
}
