//! PostgreSQL-backed order store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::OrderId;
use domain::{LineItem, Order, OrderTotals, StatusTriple};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::error::{OrderStoreError, Result};
use crate::store::{OrderStore, validate_children_for_insert};

const ORDER_COLUMNS: &str = "id, parent_id, store_id, items, subtotal, tax_total, total, \
     original_total, original_tax_total, discount_total, raw_discount_total, gift_card_total, \
     status, payment_status, fulfillment_status, status_version, created_at";

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

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<LineItem> = serde_json::from_value(items_json)?;

        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;
        let fulfillment_status: String = row.try_get("fulfillment_status")?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            parent_id: row
                .try_get::<Option<Uuid>, _>("parent_id")?
                .map(OrderId::from_uuid),
            store_id: row
                .try_get::<Option<Uuid>, _>("store_id")?
                .map(common::SellerId::from_uuid),
            items,
            totals: OrderTotals {
                subtotal: money(&row, "subtotal")?,
                tax_total: money(&row, "tax_total")?,
                total: money(&row, "total")?,
                original_total: money(&row, "original_total")?,
                original_tax_total: money(&row, "original_tax_total")?,
                discount_total: money(&row, "discount_total")?,
                raw_discount_total: money(&row, "raw_discount_total")?,
                gift_card_total: money(&row, "gift_card_total")?,
            },
            status: StatusTriple {
                status: status.parse()?,
                payment_status: payment_status.parse()?,
                fulfillment_status: fulfillment_status.parse()?,
            },
            status_version: row.try_get("status_version")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

fn money(row: &PgRow, column: &str) -> Result<common::Money> {
    Ok(common::Money::from_cents(row.try_get::<i64, _>(column)?))
}

async fn insert_order_tx(tx: &mut Transaction<'_, Postgres>, order: &Order) -> Result<()> {
    let items_json = serde_json::to_value(&order.items)?;

    sqlx::query(
        r#"
        INSERT INTO orders (id, parent_id, store_id, items, subtotal, tax_total, total,
            original_total, original_tax_total, discount_total, raw_discount_total,
            gift_card_total, status, payment_status, fulfillment_status, status_version,
            created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(order.id.as_uuid())
    .bind(order.parent_id.map(|id| id.as_uuid()))
    .bind(order.store_id.map(|id| id.as_uuid()))
    .bind(items_json)
    .bind(order.totals.subtotal.cents())
    .bind(order.totals.tax_total.cents())
    .bind(order.totals.total.cents())
    .bind(order.totals.original_total.cents())
    .bind(order.totals.original_tax_total.cents())
    .bind(order.totals.discount_total.cents())
    .bind(order.totals.raw_discount_total.cents())
    .bind(order.totals.gift_card_total.cents())
    .bind(order.status.status.as_str())
    .bind(order.status.payment_status.as_str())
    .bind(order.status.fulfillment_status.as_str())
    .bind(order.status_version)
    .bind(order.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.constraint() == Some("orders_pkey")
        {
            return OrderStoreError::OrderExists(order.id);
        }
        OrderStoreError::Database(e)
    })?;

    Ok(())
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn insert(&self, order: Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_order_tx(&mut tx, &order).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn children_of(&self, root_id: OrderId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE parent_id = $1 ORDER BY store_id"
        ))
        .bind(root_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn insert_children(&self, root_id: OrderId, children: Vec<Order>) -> Result<()> {
        validate_children_for_insert(root_id, &children)?;

        let mut tx = self.pool.begin().await?;

        // The root must exist and must itself be a root.
        let parent_id: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT parent_id FROM orders WHERE id = $1 FOR UPDATE")
                .bind(root_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        match parent_id {
            None => return Err(OrderStoreError::OrderNotFound(root_id)),
            Some(Some(_)) => return Err(OrderStoreError::ParentIsChild(root_id)),
            Some(None) => {}
        }

        // The root row lock serializes concurrent fan-outs of the same
        // order, so this count cannot go stale before the inserts below.
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE parent_id = $1")
                .bind(root_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;
        if existing > 0 {
            return Err(OrderStoreError::ChildrenExist {
                order_id: root_id,
                children: existing as usize,
            });
        }

        for child in &children {
            insert_order_tx(&mut tx, child).await?;
        }

        tx.commit().await?;
        tracing::debug!(root_id = %root_id, children = children.len(), "child batch committed");
        Ok(())
    }

    async fn update_children_status(
        &self,
        root_id: OrderId,
        status: StatusTriple,
        version: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2, payment_status = $3, fulfillment_status = $4, status_version = $5
            WHERE parent_id = $1 AND status_version < $5
            "#,
        )
        .bind(root_id.as_uuid())
        .bind(status.status.as_str())
        .bind(status.payment_status.as_str())
        .bind(status.fulfillment_status.as_str())
        .bind(version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_status(&self, id: OrderId, status: StatusTriple) -> Result<i64> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE orders
            SET status = $2, payment_status = $3, fulfillment_status = $4,
                status_version = status_version + 1
            WHERE id = $1
            RETURNING status_version
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.status.as_str())
        .bind(status.payment_status.as_str())
        .bind(status.fulfillment_status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        version.ok_or(OrderStoreError::OrderNotFound(id))
    }
}
