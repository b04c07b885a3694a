use serde::{Deserialize, Serialize};

use brewstock_core::DomainError;
use brewstock_stock::{NewStock, Stock, StockType};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/v1/stock`.
///
/// Every field is optional at the serde level so that a missing field comes
/// back as a validation error naming it, not a generic body rejection. Any
/// client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub max: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(rename = "type")]
    pub stock_type: Option<StockType>,
}

impl StockRequest {
    /// Field-by-field conversion into a validated creation candidate.
    pub fn into_new_stock(self) -> Result<NewStock, DomainError> {
        let name = self.name.ok_or_else(|| missing("name"))?;
        let brand = self.brand.ok_or_else(|| missing("brand"))?;
        let max = to_u32("max", self.max.ok_or_else(|| missing("max"))?)?;
        let quantity = to_u32("quantity", self.quantity.ok_or_else(|| missing("quantity"))?)?;
        let stock_type = self.stock_type.ok_or_else(|| missing("type"))?;

        NewStock::new(name, brand, max, quantity, stock_type)
    }
}

/// Body of `PATCH /api/v1/stock/{id}/increment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

impl QuantityRequest {
    pub fn amount(&self) -> Result<u32, DomainError> {
        let quantity = self.quantity.ok_or_else(|| missing("quantity"))?;
        to_u32("quantity", quantity)
    }
}

fn missing(field: &str) -> DomainError {
    DomainError::validation(format!("{field} is required"))
}

fn to_u32(field: &str, value: i64) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    u32::try_from(value)
        .map_err(|_| DomainError::validation(format!("{field} is too large")))
}

// -------------------------
// Response DTOs
// -------------------------

/// External representation of a stock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub max: u32,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub stock_type: StockType,
}

impl From<&Stock> for StockResponse {
    fn from(stock: &Stock) -> Self {
        Self {
            id: stock.id_typed().get(),
            name: stock.name().to_string(),
            brand: stock.brand().to_string(),
            max: stock.max(),
            quantity: stock.quantity(),
            stock_type: stock.stock_type(),
        }
    }
}

impl From<Stock> for StockResponse {
    fn from(stock: Stock) -> Self {
        Self::from(&stock)
    }
}
