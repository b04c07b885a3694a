//! Postgres-backed stock store.
//!
//! ## Error Mapping
//!
//! | SQLx error | SQLSTATE | StoreError |
//! |------------|----------|------------|
//! | Database (unique violation on `name`) | `23505` | `DuplicateName` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / network / decode | N/A | `Backend` |
//!
//! The `stock` table enforces `UNIQUE (name)` and `quantity <= max_quantity`
//! itself, so writers in other processes cannot break either invariant.
//! `save` on an existing row writes absolute values: two processes
//! incrementing the same row concurrently can lose one of the increments.
//! Within one process the service's write lock serializes them.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use brewstock_core::StockId;
use brewstock_stock::{NewStock, Stock, StockRecord, StockStore, StockType, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stock (
    id           BIGSERIAL PRIMARY KEY,
    name         TEXT      NOT NULL UNIQUE,
    brand        TEXT      NOT NULL,
    max_quantity BIGINT    NOT NULL CHECK (max_quantity >= 1),
    quantity     BIGINT    NOT NULL CHECK (quantity >= 0),
    stock_type   TEXT      NOT NULL,
    CONSTRAINT stock_quantity_within_max CHECK (quantity <= max_quantity)
)
"#;

/// Postgres-backed stock store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store can be
/// shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PostgresStockStore {
    pool: Arc<PgPool>,
}

impl PostgresStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the `stock` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Create the `stock` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn select_by_name(&self, name: &str) -> Result<Option<Stock>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, stock_type
            FROM stock
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_name", e))?;

        row.as_ref().map(stock_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn select_by_id(&self, id: StockId) -> Result<Option<Stock>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, stock_type
            FROM stock
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(stock_from_row).transpose()
    }

    #[instrument(skip(self, new), fields(name = %new.name()), err)]
    async fn insert(&self, new: NewStock) -> Result<Stock, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO stock (name, brand, max_quantity, quantity, stock_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new.name())
        .bind(new.brand())
        .bind(i64::from(new.max()))
        .bind(i64::from(new.quantity()))
        .bind(new.stock_type().as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                StoreError::DuplicateName(new.name().to_string())
            } else {
                map_sqlx_error("insert", e)
            }
        })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(Stock::from_new(StockId::new(id), new))
    }

    #[instrument(skip(self, stock), fields(id = %stock.id_typed()), err)]
    async fn update(&self, stock: Stock) -> Result<Stock, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE stock
            SET name = $2,
                brand = $3,
                max_quantity = $4,
                quantity = $5,
                stock_type = $6
            WHERE id = $1
            "#,
        )
        .bind(stock.id_typed().get())
        .bind(stock.name())
        .bind(stock.brand())
        .bind(i64::from(stock.max()))
        .bind(i64::from(stock.quantity()))
        .bind(stock.stock_type().as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                StoreError::DuplicateName(stock.name().to_string())
            } else {
                map_sqlx_error("update", e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(stock.id_typed()));
        }
        Ok(stock)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: StockId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM stock WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn select_all(&self) -> Result<Vec<Stock>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, brand, max_quantity, quantity, stock_type
            FROM stock
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(stock_from_row).collect()
    }
}

#[async_trait]
impl StockStore for PostgresStockStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Stock>, StoreError> {
        self.select_by_name(name).await
    }

    async fn find_by_id(&self, id: StockId) -> Result<Option<Stock>, StoreError> {
        self.select_by_id(id).await
    }

    async fn save(&self, record: StockRecord) -> Result<Stock, StoreError> {
        match record {
            StockRecord::New(new) => self.insert(new).await,
            StockRecord::Existing(stock) => self.update(stock).await,
        }
    }

    async fn delete_by_id(&self, id: StockId) -> Result<(), StoreError> {
        self.delete(id).await
    }

    async fn find_all(&self) -> Result<Vec<Stock>, StoreError> {
        self.select_all().await
    }
}

fn stock_from_row(row: &PgRow) -> Result<Stock, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let brand: String = row.try_get("brand").map_err(decode)?;
    let max: i64 = row.try_get("max_quantity").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;
    let stock_type: String = row.try_get("stock_type").map_err(decode)?;

    let max = u32::try_from(max)
        .map_err(|_| StoreError::backend(format!("max_quantity out of range for stock {id}")))?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| StoreError::backend(format!("quantity out of range for stock {id}")))?;
    let stock_type: StockType = stock_type
        .parse()
        .map_err(|e| StoreError::backend(format!("stock {id}: {e}")))?;

    Stock::restore(StockId::new(id), name, brand, max, quantity, stock_type)
        .map_err(|e| StoreError::backend(e.to_string()))
}

fn unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
