//! Stock domain module.
//!
//! Business rules for beer stock: the `Stock` entity, the store contract the
//! service consumes, and the service that owns name uniqueness and the
//! capacity ceiling. No HTTP and no concrete storage in here.

pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::StockError;
pub use model::{NewStock, Stock, StockType, MAX_TEXT_LEN};
pub use service::StockService;
pub use store::{StockRecord, StockStore, StoreError};
