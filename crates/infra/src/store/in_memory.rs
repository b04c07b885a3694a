use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use brewstock_core::StockId;
use brewstock_stock::{Stock, StockRecord, StockStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<StockId, Stock>,
    by_name: HashMap<String, StockId>,
    last_id: i64,
}

/// In-memory stock store.
///
/// Rows are keyed by id (so listing follows insertion order) with a
/// secondary unique index on name. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    tables: RwLock<Tables>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.read().map(|t| t.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Stock>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .by_name
            .get(name)
            .and_then(|id| tables.rows.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: StockId) -> Result<Option<Stock>, StoreError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn save(&self, record: StockRecord) -> Result<Stock, StoreError> {
        let mut tables = self.write()?;

        match record {
            StockRecord::New(new) => {
                if tables.by_name.contains_key(new.name()) {
                    return Err(StoreError::DuplicateName(new.name().to_string()));
                }

                tables.last_id += 1;
                let stock = Stock::from_new(StockId::new(tables.last_id), new);

                tables.by_name.insert(stock.name().to_string(), stock.id_typed());
                tables.rows.insert(stock.id_typed(), stock.clone());
                Ok(stock)
            }
            StockRecord::Existing(stock) => {
                let id = stock.id_typed();
                let previous_name = match tables.rows.get(&id) {
                    Some(current) => current.name().to_string(),
                    None => return Err(StoreError::Missing(id)),
                };

                if previous_name != stock.name() {
                    if tables.by_name.contains_key(stock.name()) {
                        return Err(StoreError::DuplicateName(stock.name().to_string()));
                    }
                    tables.by_name.remove(&previous_name);
                    tables.by_name.insert(stock.name().to_string(), id);
                }

                tables.rows.insert(id, stock.clone());
                Ok(stock)
            }
        }
    }

    async fn delete_by_id(&self, id: StockId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if let Some(removed) = tables.rows.remove(&id) {
            tables.by_name.remove(removed.name());
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Stock>, StoreError> {
        Ok(self.read()?.rows.values().cloned().collect())
    }
}
