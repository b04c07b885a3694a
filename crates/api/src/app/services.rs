use std::sync::Arc;

use brewstock_infra::InMemoryStockStore;
use brewstock_stock::{StockService, StockStore};

use crate::config::{ApiConfig, StoreBackend};

/// Store handle shared by all requests.
pub type SharedStore = Arc<dyn StockStore>;

/// The service every handler talks to.
pub type AppServices = StockService<SharedStore>;

/// Build the stock service over the store selected in `config`.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store: SharedStore = match &config.store {
        StoreBackend::Memory => {
            tracing::info!("using in-memory stock store");
            Arc::new(InMemoryStockStore::new())
        }
        StoreBackend::Postgres { database_url } => {
            tracing::info!("using postgres stock store");
            connect_postgres(database_url).await?
        }
    };

    Ok(StockService::new(store))
}

/// In-memory service, for tests and local runs.
pub fn in_memory_services() -> AppServices {
    StockService::new(Arc::new(InMemoryStockStore::new()))
}

#[cfg(feature = "postgres")]
async fn connect_postgres(database_url: &str) -> anyhow::Result<SharedStore> {
    let store = brewstock_infra::PostgresStockStore::connect(database_url).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_database_url: &str) -> anyhow::Result<SharedStore> {
    anyhow::bail!("STOCK_STORE=postgres requires building with the `postgres` feature")
}
