use core::str::FromStr;

use serde::{Deserialize, Serialize};

use brewstock_core::{DomainError, DomainResult, Entity, StockId};

/// Longest accepted `name` / `brand`, in characters.
pub const MAX_TEXT_LEN: usize = 200;

/// Beer type of a stock record.
///
/// Serialized as the upper-case tag (`"LAGER"`, `"IPA"`, ...). The display
/// label is static metadata, see [`StockType::description`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockType {
    Lager,
    Malzbier,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
}

impl StockType {
    pub const ALL: [StockType; 7] = [
        StockType::Lager,
        StockType::Malzbier,
        StockType::Witbier,
        StockType::Weiss,
        StockType::Ale,
        StockType::Ipa,
        StockType::Stout,
    ];

    /// Wire/storage tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockType::Lager => "LAGER",
            StockType::Malzbier => "MALZBIER",
            StockType::Witbier => "WITBIER",
            StockType::Weiss => "WEISS",
            StockType::Ale => "ALE",
            StockType::Ipa => "IPA",
            StockType::Stout => "STOUT",
        }
    }

    /// Human-readable label.
    pub fn description(&self) -> &'static str {
        match self {
            StockType::Lager => "Lager",
            StockType::Malzbier => "Malzbier",
            StockType::Witbier => "Witbier",
            StockType::Weiss => "Weiss",
            StockType::Ale => "Ale",
            StockType::Ipa => "IPA",
            StockType::Stout => "Stout",
        }
    }
}

impl core::fmt::Display for StockType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StockType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown stock type: {s}")))
    }
}

/// A validated stock candidate that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStock {
    name: String,
    brand: String,
    max: u32,
    quantity: u32,
    stock_type: StockType,
}

impl NewStock {
    /// Validate and build a creation candidate.
    ///
    /// - `name` and `brand` must be non-blank and at most [`MAX_TEXT_LEN`] chars
    /// - `max` must be at least 1
    /// - `quantity` must not exceed `max`
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        max: u32,
        quantity: u32,
        stock_type: StockType,
    ) -> DomainResult<Self> {
        let name = name.into();
        let brand = brand.into();

        validate_text("name", &name)?;
        validate_text("brand", &brand)?;

        if max == 0 {
            return Err(DomainError::validation("max must be at least 1"));
        }
        if quantity > max {
            return Err(DomainError::validation(format!(
                "quantity ({quantity}) cannot exceed max ({max})"
            )));
        }

        Ok(Self {
            name,
            brand,
            max,
            quantity,
            stock_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stock_type(&self) -> StockType {
        self.stock_type
    }
}

fn validate_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "{field} cannot be longer than {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// A persisted stock record.
///
/// Only `quantity` changes after creation, and only through the service's
/// bounded increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stock {
    id: StockId,
    name: String,
    brand: String,
    max: u32,
    quantity: u32,
    stock_type: StockType,
}

impl Stock {
    /// Attach a store-assigned id to a creation candidate.
    pub fn from_new(id: StockId, new: NewStock) -> Self {
        Self {
            id,
            name: new.name,
            brand: new.brand,
            max: new.max,
            quantity: new.quantity,
            stock_type: new.stock_type,
        }
    }

    /// Rehydrate a record read back from storage.
    ///
    /// Rejects rows that break `quantity <= max`.
    pub fn restore(
        id: StockId,
        name: String,
        brand: String,
        max: u32,
        quantity: u32,
        stock_type: StockType,
    ) -> DomainResult<Self> {
        if quantity > max {
            return Err(DomainError::validation(format!(
                "stored quantity ({quantity}) exceeds max ({max}) for stock {id}"
            )));
        }
        Ok(Self {
            id,
            name,
            brand,
            max,
            quantity,
            stock_type,
        })
    }

    pub fn id_typed(&self) -> StockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stock_type(&self) -> StockType {
        self.stock_type
    }

    /// Quantity after adding `amount`, or `None` if it would pass `max`.
    ///
    /// The bound is inclusive: reaching exactly `max` is allowed.
    pub fn quantity_after(&self, amount: u32) -> Option<u32> {
        self.quantity
            .checked_add(amount)
            .filter(|new_quantity| *new_quantity <= self.max)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        debug_assert!(quantity <= self.max);
        self.quantity = quantity;
    }
}

impl Entity for Stock {
    type Id = StockId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
