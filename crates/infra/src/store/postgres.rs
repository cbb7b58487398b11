//! Postgres-backed inventory store.
//!
//! This is the authoritative write path. Every counter mutation is a single
//! atomic conditional `UPDATE` (never a read-then-write pair), so two
//! reservations whose sum exceeds availability cannot both succeed: the store
//! linearizes them at the row. Multi-item orders run in one transaction; an
//! aborted transaction leaves no partial reservations by construction.
//!
//! ## Error Mapping
//!
//! | Outcome | InventoryError | Scenario |
//! |---------|----------------|----------|
//! | Conditional update affects 0 rows | `InsufficientStock` | Availability below requested quantity (availability re-read after rollback for the payload) |
//! | Row absent | `ProductNotFound` / `ReservationNotFound` | Unknown product id or token |
//! | Duplicate insert (`23505`) | `InvalidInput` | Inventory row already exists |
//! | Any other sqlx error | `ReservationFailed` | Connection, pool, or statement failure; caller may retry with a fresh attempt |
//! | Transaction exceeds the configured timeout | `ReservationFailed` | Attempt aborted, nothing persisted |
//!
//! ## Locking
//!
//! The reservation transaction holds one row lock per distinct product. Line
//! items are processed in ascending `product_id` order so concurrent orders
//! acquire locks in the same sequence and cannot deadlock.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_core::{OrderId, ProductId, ReservationId};
use storefront_inventory::{
    derive_status, AvailabilitySnapshot, Inventory, InventoryError, InventoryResult,
    InventoryService, InventorySummary, LineItem, Reservation, ReservationState,
};

const DEFAULT_RESERVATION_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
    reservation_timeout: Duration,
}

fn store_failure(err: sqlx::Error) -> InventoryError {
    InventoryError::failed(err.to_string())
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            reservation_timeout: DEFAULT_RESERVATION_TIMEOUT,
        }
    }

    pub fn with_reservation_timeout(mut self, timeout: Duration) -> Self {
        self.reservation_timeout = timeout;
        self
    }

    /// Apply schema migrations (idempotent).
    pub async fn run_migrations(&self) -> InventoryResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InventoryError::failed(e.to_string()))
    }

    /// Build the rejection for a line the conditional update refused, reading
    /// current availability for the error payload only (the transaction has
    /// already rolled back).
    async fn shortage_error(&self, item: &LineItem) -> InventoryError {
        let row = sqlx::query(
            r#"
            SELECT quantity - reserved_quantity AS available
            FROM inventory
            WHERE product_id = $1
            "#,
        )
        .bind(*item.product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await;

        match row {
            Ok(Some(row)) => {
                let available = row.try_get::<i64, _>("available").unwrap_or(0);
                InventoryError::insufficient(item.product_id, item.quantity, available)
            }
            Ok(None) => InventoryError::ProductNotFound(item.product_id),
            Err(err) => store_failure(err),
        }
    }

    async fn reserve_order_tx(
        &self,
        order_id: OrderId,
        line_items: &[LineItem],
    ) -> InventoryResult<Vec<Reservation>> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(store_failure)?;

        // Fixed lock order across concurrent orders.
        let mut order: Vec<usize> = (0..line_items.len()).collect();
        order.sort_by_key(|&i| line_items[i].product_id);

        let mut reservations: Vec<Option<Reservation>> = vec![None; line_items.len()];
        for i in order {
            let item = &line_items[i];

            let updated = sqlx::query(
                r#"
                UPDATE inventory
                SET reserved_quantity = reserved_quantity + $2,
                    updated_at = NOW()
                WHERE product_id = $1
                  AND quantity - reserved_quantity >= $2
                "#,
            )
            .bind(*item.product_id.as_uuid())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(store_failure)?;

            if updated.rows_affected() == 0 {
                tx.rollback().await.map_err(store_failure)?;
                return Err(self.shortage_error(item).await);
            }

            let res = Reservation::pending(order_id, item.product_id, item.quantity, now);
            sqlx::query(
                r#"
                INSERT INTO reservations (
                    reservation_id,
                    order_id,
                    product_id,
                    quantity,
                    state,
                    created_at
                )
                VALUES ($1, $2, $3, $4, 'pending', $5)
                "#,
            )
            .bind(*res.reservation_id.as_uuid())
            .bind(*res.order_id.as_uuid())
            .bind(*res.product_id.as_uuid())
            .bind(res.quantity)
            .bind(res.created_at)
            .execute(&mut *tx)
            .await
            .map_err(store_failure)?;

            reservations[i] = Some(res);
        }

        tx.commit().await.map_err(store_failure)?;
        Ok(reservations.into_iter().flatten().collect())
    }

    /// Flip a pending token to `target` and apply the counter update. Returns
    /// the settled reservation, the previously-settled one (no-op), or
    /// `ReservationNotFound`.
    async fn settle(
        &self,
        reservation_id: ReservationId,
        target: ReservationState,
    ) -> InventoryResult<Reservation> {
        let mut tx = self.pool.begin().await.map_err(store_failure)?;

        let row = sqlx::query(
            r#"
            UPDATE reservations
            SET state = $2,
                updated_at = NOW()
            WHERE reservation_id = $1
              AND state = 'pending'
            RETURNING order_id, product_id, quantity, created_at
            "#,
        )
        .bind(*reservation_id.as_uuid())
        .bind(target.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_failure)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(store_failure)?;
            // Settled already, or never existed.
            return self.load_reservation(reservation_id).await;
        };

        let product_id: Uuid = row.try_get("product_id").map_err(store_failure)?;
        let quantity: i64 = row.try_get("quantity").map_err(store_failure)?;

        let counter_update = match target {
            ReservationState::Committed => {
                r#"
                UPDATE inventory
                SET quantity = quantity - $2,
                    reserved_quantity = GREATEST(reserved_quantity - $2, 0),
                    updated_at = NOW()
                WHERE product_id = $1
                "#
            }
            ReservationState::Released => {
                r#"
                UPDATE inventory
                SET reserved_quantity = GREATEST(reserved_quantity - $2, 0),
                    updated_at = NOW()
                WHERE product_id = $1
                "#
            }
            ReservationState::Pending => unreachable!("settle target is never pending"),
        };

        sqlx::query(counter_update)
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .map_err(store_failure)?;

        tx.commit().await.map_err(store_failure)?;

        Ok(Reservation {
            reservation_id,
            order_id: OrderId::from_uuid(row.try_get("order_id").map_err(store_failure)?),
            product_id: ProductId::from_uuid(product_id),
            quantity,
            state: target,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(store_failure)?,
        })
    }

    async fn load_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> InventoryResult<Reservation> {
        let row = sqlx::query(
            r#"
            SELECT order_id, product_id, quantity, state, created_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(*reservation_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure)?
        .ok_or(InventoryError::ReservationNotFound(reservation_id))?;

        let state: String = row.try_get("state").map_err(store_failure)?;
        let state = ReservationState::parse(&state)
            .ok_or_else(|| InventoryError::failed(format!("unknown reservation state: {state}")))?;

        Ok(Reservation {
            reservation_id,
            order_id: OrderId::from_uuid(row.try_get("order_id").map_err(store_failure)?),
            product_id: ProductId::from_uuid(row.try_get("product_id").map_err(store_failure)?),
            quantity: row.try_get("quantity").map_err(store_failure)?,
            state,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(store_failure)?,
        })
    }

    fn summary_from_row(row: &sqlx::postgres::PgRow) -> InventoryResult<InventorySummary> {
        let quantity: i64 = row.try_get("quantity").map_err(store_failure)?;
        let reserved_quantity: i64 = row.try_get("reserved_quantity").map_err(store_failure)?;
        let low_stock_threshold: i64 =
            row.try_get("low_stock_threshold").map_err(store_failure)?;
        let available_quantity = quantity - reserved_quantity;

        Ok(InventorySummary {
            product_id: ProductId::from_uuid(row.try_get("product_id").map_err(store_failure)?),
            quantity,
            reserved_quantity,
            available_quantity,
            status: derive_status(available_quantity, low_stock_threshold),
            low_stock_threshold,
            location: row.try_get("location").map_err(store_failure)?,
            last_restocked_at: row.try_get("last_restocked_at").map_err(store_failure)?,
        })
    }
}

#[async_trait]
impl InventoryService for PostgresInventoryStore {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn create(
        &self,
        product_id: ProductId,
        initial_quantity: i64,
        low_stock_threshold: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        // Validation shared with the in-memory backend.
        let inv = Inventory::new(product_id, initial_quantity, low_stock_threshold, location)?;

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (
                product_id,
                quantity,
                reserved_quantity,
                low_stock_threshold,
                location
            )
            VALUES ($1, $2, 0, $3, $4)
            "#,
        )
        .bind(*product_id.as_uuid())
        .bind(inv.quantity())
        .bind(inv.low_stock_threshold())
        .bind(inv.location())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(inv.summary()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(InventoryError::invalid_input(format!(
                    "inventory already exists for product {product_id}"
                )))
            }
            Err(err) => Err(store_failure(err)),
        }
    }

    #[instrument(skip(self, line_items), fields(order_id = %order_id, lines = line_items.len()))]
    async fn reserve_order(
        &self,
        order_id: OrderId,
        line_items: &[LineItem],
    ) -> InventoryResult<Vec<Reservation>> {
        if line_items.is_empty() {
            return Err(InventoryError::invalid_input("order has no line items"));
        }
        for item in line_items {
            if item.quantity <= 0 {
                return Err(InventoryError::invalid_input(
                    "reserve quantity must be positive",
                ));
            }
        }

        match tokio::time::timeout(
            self.reservation_timeout,
            self.reserve_order_tx(order_id, line_items),
        )
        .await
        {
            Ok(result) => {
                if let Err(InventoryError::InsufficientStock { product_id, .. }) = &result {
                    // Expected business rejection, not an error condition.
                    tracing::debug!(%order_id, %product_id, "order rejected: insufficient stock");
                }
                result
            }
            Err(_) => Err(InventoryError::failed(
                "reservation transaction timed out",
            )),
        }
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id))]
    async fn commit(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        self.settle(reservation_id, ReservationState::Committed)
            .await
    }

    #[instrument(skip(self), fields(reservation_id = %reservation_id))]
    async fn release(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        self.settle(reservation_id, ReservationState::Released)
            .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn restock(
        &self,
        product_id: ProductId,
        delta: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        if delta <= 0 {
            return Err(InventoryError::invalid_input(
                "restock delta must be positive",
            ));
        }

        let row = sqlx::query(
            r#"
            UPDATE inventory
            SET quantity = quantity + $2,
                location = COALESCE($3, location),
                last_restocked_at = NOW(),
                updated_at = NOW()
            WHERE product_id = $1
            RETURNING product_id, quantity, reserved_quantity, low_stock_threshold,
                      location, last_restocked_at
            "#,
        )
        .bind(*product_id.as_uuid())
        .bind(delta)
        .bind(location)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure)?
        .ok_or(InventoryError::ProductNotFound(product_id))?;

        Self::summary_from_row(&row)
    }

    async fn availability(&self, product_id: ProductId) -> InventoryResult<AvailabilitySnapshot> {
        let row = sqlx::query(
            r#"
            SELECT quantity - reserved_quantity AS available, low_stock_threshold
            FROM inventory
            WHERE product_id = $1
            "#,
        )
        .bind(*product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure)?
        .ok_or(InventoryError::ProductNotFound(product_id))?;

        let available: i64 = row.try_get("available").map_err(store_failure)?;
        let low_stock_threshold: i64 =
            row.try_get("low_stock_threshold").map_err(store_failure)?;

        Ok(AvailabilitySnapshot {
            product_id,
            available_quantity: available,
            status: derive_status(available, low_stock_threshold),
            as_of: Utc::now(),
        })
    }
}
