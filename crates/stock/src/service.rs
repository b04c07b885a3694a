//! Stock service: validation + store calls for the five stock operations.
//!
//! The service owns two invariants:
//! - no two records share a `name` (checked on create)
//! - `quantity <= max` (checked on increment, inclusive)
//!
//! Every failing path returns before the store is written to.
//!
//! Create, delete and increment run under a single write lock so their
//! check-then-write sequences cannot interleave within one process. Reads do
//! not take the lock. Across processes the store's own name uniqueness is the
//! backstop for create.

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use brewstock_core::StockId;

use crate::error::StockError;
use crate::model::{NewStock, Stock};
use crate::store::{StockRecord, StockStore, StoreError};

#[derive(Debug)]
pub struct StockService<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S> StockService<S>
where
    S: StockStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new stock record.
    ///
    /// Fails with `AlreadyRegistered` if the name is taken.
    #[instrument(skip(self, new_stock), fields(name = %new_stock.name()))]
    pub async fn create(&self, new_stock: NewStock) -> Result<Stock, StockError> {
        let _guard = self.write_lock.lock().await;

        if self.store.find_by_name(new_stock.name()).await?.is_some() {
            warn!("stock already registered");
            return Err(StockError::AlreadyRegistered(new_stock.name().to_string()));
        }

        let saved = self
            .store
            .save(StockRecord::New(new_stock))
            .await
            .map_err(|e| match e {
                StoreError::DuplicateName(name) => StockError::AlreadyRegistered(name),
                other => StockError::Store(other),
            })?;

        info!(id = %saved.id_typed(), "stock created");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Stock, StockError> {
        match self.store.find_by_name(name).await? {
            Some(stock) => Ok(stock),
            None => {
                debug!("stock not found");
                Err(StockError::NotFoundByName(name.to_string()))
            }
        }
    }

    /// Every persisted record. An empty store yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Stock>, StockError> {
        let all = self.store.find_all().await?;
        debug!(count = all.len(), "listed stock");
        Ok(all)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: StockId) -> Result<(), StockError> {
        let _guard = self.write_lock.lock().await;

        self.verify_exists(id).await?;
        self.store.delete_by_id(id).await?;

        info!("stock deleted");
        Ok(())
    }

    /// Add `amount` to the quantity of stock `id`.
    ///
    /// Fails with `Exceeded` (and persists nothing) if the result would pass
    /// `max`. Reaching exactly `max` succeeds.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: StockId, amount: u32) -> Result<Stock, StockError> {
        let _guard = self.write_lock.lock().await;

        let mut stock = self.verify_exists(id).await?;

        let Some(new_quantity) = stock.quantity_after(amount) else {
            warn!(
                quantity = stock.quantity(),
                max = stock.max(),
                "increment would exceed capacity"
            );
            return Err(StockError::Exceeded { id, amount });
        };

        stock.set_quantity(new_quantity);
        let saved = self.store.save(StockRecord::Existing(stock)).await?;

        info!(quantity = saved.quantity(), "stock incremented");
        Ok(saved)
    }

    async fn verify_exists(&self, id: StockId) -> Result<Stock, StockError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(StockError::NotFoundById(id))
    }
}
