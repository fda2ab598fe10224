use rust_decimal::Decimal;
use shared::models::{ClientInfo, ClientType, Order, OrderItem, OrderStatus};
use sqlx::PgPool;
use sqlx::types::Json;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    menu_id: i64,
    client_id: i64,
    client_type: String,
    table_number: Option<String>,
    client_name: Option<String>,
    client_phone: Option<String>,
    client_address: Option<String>,
    status: String,
    items: Json<Vec<OrderItem>>,
    notes: Option<String>,
    total: Decimal,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = BoxError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let client_type = ClientType::parse(&row.client_type)
            .ok_or_else(|| format!("unknown client_type {:?}", row.client_type))?;
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown order status {:?}", row.status))?;
        Ok(Order {
            id: row.id,
            menu_id: row.menu_id,
            client_id: row.client_id,
            client_type,
            table_number: row.table_number,
            client_name: row.client_name,
            client_phone: row.client_phone,
            client_address: row.client_address,
            status,
            items: row.items.0,
            notes: row.notes,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.menu_id, o.client_id, o.client_type,
           c.table_number, c.name AS client_name, c.phone AS client_phone,
           c.address AS client_address,
           o.status, o.items, o.notes, o.total, o.created_at, o.updated_at
    FROM orders o
    JOIN clients c ON c.id = o.client_id
    JOIN menus m ON m.id = o.menu_id
"#;

/// Owner restaurant of a menu, if the menu exists
pub async fn menu_owner(pool: &PgPool, menu_id: i64) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT restaurant_id FROM menus WHERE id = $1")
        .bind(menu_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}

pub struct NewOrder<'a> {
    pub menu_id: i64,
    pub client: &'a ClientInfo,
    pub items: &'a [OrderItem],
    pub notes: Option<&'a str>,
    pub total: Decimal,
}

/// Insert client + order in one transaction
pub async fn create(pool: &PgPool, new: &NewOrder<'_>, now: i64) -> Result<Order, BoxError> {
    let mut tx = pool.begin().await?;

    let (client_id,): (i64,) = sqlx::query_as(
        "INSERT INTO clients (client_type, table_number, name, phone, address, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(new.client.client_type.as_str())
    .bind(new.client.table_number.as_deref())
    .bind(new.client.name.as_deref())
    .bind(new.client.phone.as_deref())
    .bind(new.client.address.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (menu_id, client_id, client_type, status, items, notes, total, created_at, updated_at)
         VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $7)
         RETURNING id",
    )
    .bind(new.menu_id)
    .bind(client_id)
    .bind(new.client.client_type.as_str())
    .bind(Json(new.items))
    .bind(new.notes)
    .bind(new.total)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let row: OrderRow = sqlx::query_as(&format!("{ORDER_SELECT} WHERE o.id = $1"))
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    row.try_into()
}

/// Orders of the owner's menus, newest first
pub async fn list(
    pool: &PgPool,
    restaurant_id: i64,
    status: Option<OrderStatus>,
    menu_id: Option<i64>,
) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "{ORDER_SELECT}
         WHERE m.restaurant_id = $1
           AND ($2::TEXT IS NULL OR o.status = $2)
           AND ($3::BIGINT IS NULL OR o.menu_id = $3)
         ORDER BY o.created_at DESC, o.id DESC"
    ))
    .bind(restaurant_id)
    .bind(status.map(|s| s.as_str()))
    .bind(menu_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

pub async fn find_owned(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
) -> Result<Option<Order>, BoxError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "{ORDER_SELECT} WHERE o.id = $1 AND m.restaurant_id = $2"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

/// Change status unless the order is already terminal. Returns rows affected.
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = $1, updated_at = $2
         WHERE id = $3 AND status NOT IN ('delivered', 'cancelled')",
    )
    .bind(status.as_str())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
