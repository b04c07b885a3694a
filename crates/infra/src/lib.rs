//! Infrastructure layer: concrete stock stores.

pub mod store;

pub use store::InMemoryStockStore;
#[cfg(feature = "postgres")]
pub use store::PostgresStockStore;
