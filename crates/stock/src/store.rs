//! Stock store boundary.
//!
//! The service only depends on this trait; concrete storage (in-memory map,
//! Postgres) lives in the infra crate.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use brewstock_core::StockId;

use crate::model::{NewStock, Stock};

/// What `save` is asked to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockRecord {
    /// Insert; the store assigns the id.
    New(NewStock),
    /// Update in place; the id must already exist.
    Existing(Stock),
}

impl From<NewStock> for StockRecord {
    fn from(value: NewStock) -> Self {
        Self::New(value)
    }
}

impl From<Stock> for StockRecord {
    fn from(value: Stock) -> Self {
        Self::Existing(value)
    }
}

/// Store operation error.
///
/// These are infrastructure failures, not business outcomes. `DuplicateName`
/// is the store's own uniqueness guard firing (e.g. a concurrent insert).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("a stock named {0} already exists")]
    DuplicateName(String),

    #[error("stock {0} does not exist")]
    Missing(StockId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Durable mapping from id to stock record, with a unique name index.
#[async_trait]
pub trait StockStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Stock>, StoreError>;

    async fn find_by_id(&self, id: StockId) -> Result<Option<Stock>, StoreError>;

    /// Insert a new record (assigning its id) or update an existing one.
    ///
    /// Returns the persisted record.
    async fn save(&self, record: StockRecord) -> Result<Stock, StoreError>;

    /// Delete by id. Deleting an absent id is a no-op.
    async fn delete_by_id(&self, id: StockId) -> Result<(), StoreError>;

    /// All records, in id (insertion) order.
    async fn find_all(&self) -> Result<Vec<Stock>, StoreError>;
}

#[async_trait]
impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    async fn find_by_name(&self, name: &str) -> Result<Option<Stock>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn find_by_id(&self, id: StockId) -> Result<Option<Stock>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, record: StockRecord) -> Result<Stock, StoreError> {
        (**self).save(record).await
    }

    async fn delete_by_id(&self, id: StockId) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Stock>, StoreError> {
        (**self).find_all().await
    }
}
