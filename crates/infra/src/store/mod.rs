//! `StockStore` implementations.
//!
//! - `InMemoryStockStore`: process-local map, for dev/tests and the default server mode
//! - `PostgresStockStore`: durable table (behind the `postgres` feature)

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStockStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStockStore;
