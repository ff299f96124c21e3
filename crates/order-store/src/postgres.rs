use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, OrderNumber};
use domain::{LineItem, NewOrder, Order, SkuCode};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::Result;
use crate::store::OrderStore;

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_line_item(row: PgRow) -> std::result::Result<LineItem, sqlx::Error> {
        let sku_code: String = row.try_get("sku_code")?;
        let quantity: i32 = row.try_get("quantity")?;
        Ok(LineItem {
            sku_code: SkuCode::new(sku_code),
            quantity: quantity as u32,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn save(&self, order: NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query("INSERT INTO orders (order_number) VALUES ($1) RETURNING id, created_at")
                .bind(order.order_number.as_uuid())
                .fetch_one(&mut *tx)
                .await?;

        let id: i64 = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        for (position, item) in order.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_line_items (order_id, position, sku_code, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(position as i32)
            .bind(item.sku_code.as_str())
            .bind(item.quantity as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(order_id = id, order_number = %order.order_number, "order committed");

        Ok(Order {
            id: OrderId::new(id),
            order_number: order.order_number,
            line_items: order.line_items,
            created_at,
        })
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let order_rows =
            sqlx::query("SELECT id, order_number, created_at FROM orders ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let id: i64 = row.try_get("id")?;
            let order_number: Uuid = row.try_get("order_number")?;
            let created_at: DateTime<Utc> = row.try_get("created_at")?;

            let item_rows = sqlx::query(
                r#"
                SELECT sku_code, quantity
                FROM order_line_items
                WHERE order_id = $1
                ORDER BY position ASC
                "#,
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

            let line_items = item_rows
                .into_iter()
                .map(Self::row_to_line_item)
                .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;

            orders.push(Order {
                id: OrderId::new(id),
                order_number: OrderNumber::from_uuid(order_number),
                line_items,
                created_at,
            });
        }

        Ok(orders)
    }
}
