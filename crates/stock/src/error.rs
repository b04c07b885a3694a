use thiserror::Error;

use brewstock_core::StockId;

use crate::store::StoreError;

/// Failure of a stock service operation.
///
/// `AlreadyRegistered`, `NotFoundByName`, `NotFoundById` and `Exceeded` are
/// expected outcomes of valid but unsatisfiable requests; none of them leaves
/// a partial write behind. `Store` is the internal/unrecoverable category.
/// Input validation happens before the service runs (see `NewStock::new`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("Stock with name {0} already registered in the system.")]
    AlreadyRegistered(String),

    #[error("Stock with name {0} not found in the system.")]
    NotFoundByName(String),

    #[error("Stock with id {0} not found in the system.")]
    NotFoundById(StockId),

    #[error("Stock with id {id} to increment informed exceeds the max stock capacity: {amount}")]
    Exceeded { id: StockId, amount: u32 },

    #[error("stock store failure: {0}")]
    Store(#[from] StoreError),
}

impl StockError {
    /// True for the business rejections (not validation, not store failures).
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            StockError::AlreadyRegistered(_)
                | StockError::NotFoundByName(_)
                | StockError::NotFoundById(_)
                | StockError::Exceeded { .. }
        )
    }
}
