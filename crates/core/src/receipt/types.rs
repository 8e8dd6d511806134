//! Parsed receipt data.

use std::fmt;

use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReceiptError;
use crate::currency::{CurrencyError, ExchangeRate};
use crate::error::ValidationError;
use crate::member::{Group, Member};

/// Most units a single line item may expand into.
pub const MAX_ITEM_QUANTITY: u32 = 1_000;

/// One line of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name as printed.
    pub name: String,
    /// Number of units bought.
    pub quantity: u32,
    /// Price of one unit, if the parser could read it.
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
}

impl LineItem {
    /// Creates a line item with a known unit cost.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32, unit_cost: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_cost: Some(unit_cost),
        }
    }

    /// Checks that the quantity is between 1 and [`MAX_ITEM_QUANTITY`].
    pub(crate) fn check_quantity(&self, index: usize) -> Result<(), ReceiptError> {
        let reason = match self.quantity {
            0 => "must be at least 1".to_string(),
            q if q > MAX_ITEM_QUANTITY => format!("must be at most {MAX_ITEM_QUANTITY}"),
            _ => return Ok(()),
        };
        Err(ReceiptError::InvalidReceipt {
            field: format!("items[{index}].quantity"),
            reason,
        })
    }
}

/// Tax printed on a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Tax amount.
    pub amount: Decimal,
}

/// A receipt as delivered by the receipt parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Line items in printed order.
    pub items: Vec<LineItem>,
    /// Tax, if the parser could read it.
    #[serde(default)]
    pub tax: Option<Tax>,
    /// Currency the receipt is printed in.
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::USD
}

impl Receipt {
    /// Creates a receipt in USD.
    #[must_use]
    pub fn new(items: Vec<LineItem>, tax: Option<Decimal>) -> Self {
        Self {
            items,
            tax: tax.map(|amount| Tax { amount }),
            currency: default_currency(),
        }
    }

    /// Sets the receipt currency.
    #[must_use]
    pub fn in_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Iterates over the ids of every food unit, item by item.
    pub fn unit_ids(&self) -> impl Iterator<Item = FoodUnitId> + '_ {
        self.items
            .iter()
            .enumerate()
            .flat_map(|(item, line)| (0..line.quantity).map(move |unit| FoodUnitId::new(item, unit)))
    }

    /// Returns true if the unit exists on this receipt.
    #[must_use]
    pub fn contains(&self, id: FoodUnitId) -> bool {
        self.items
            .get(id.item)
            .is_some_and(|line| id.unit < line.quantity)
    }

    /// Expands every line item into priced food units, order preserved.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError::InvalidReceipt` for an out-of-range quantity
    /// and `ReceiptError::IncompleteReceipt` if a unit cost is missing.
    pub fn food_units(&self) -> Result<Vec<FoodUnit>, ReceiptError> {
        let mut units = Vec::new();
        for (index, line) in self.items.iter().enumerate() {
            line.check_quantity(index)?;
            let price = line.unit_cost.ok_or_else(|| ReceiptError::IncompleteReceipt {
                field: format!("items[{index}].unit_cost"),
            })?;
            units.extend((0..line.quantity).map(|unit| FoodUnit {
                id: FoodUnitId::new(index, unit),
                name: line.name.clone(),
                price,
            }));
        }
        Ok(units)
    }

    /// Returns a copy with unit costs and tax converted at `rate`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::ConversionOverflow` if a product does not fit.
    pub fn converted(&self, rate: &ExchangeRate) -> Result<Self, CurrencyError> {
        let items = self
            .items
            .iter()
            .map(|line| {
                Ok(LineItem {
                    unit_cost: line.unit_cost.map(|c| rate.convert(c)).transpose()?,
                    ..line.clone()
                })
            })
            .collect::<Result<Vec<_>, CurrencyError>>()?;
        let tax = self
            .tax
            .map(|tax| rate.convert(tax.amount).map(|amount| Tax { amount }))
            .transpose()?;

        Ok(Self {
            items,
            tax,
            currency: rate.to_currency,
        })
    }
}

/// Identifies one physical unit of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodUnitId {
    /// Index of the line item on the receipt.
    pub item: usize,
    /// Index of the unit within the line item.
    pub unit: u32,
}

impl FoodUnitId {
    /// Creates a unit id.
    #[must_use]
    pub const fn new(item: usize, unit: u32) -> Self {
        Self { item, unit }
    }
}

impl fmt::Display for FoodUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item, self.unit)
    }
}

/// One priced physical unit of a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodUnit {
    /// Position on the receipt.
    pub id: FoodUnitId,
    /// Name of the line item.
    pub name: String,
    /// Unit cost of the line item.
    pub price: Decimal,
}

/// Output of the receipt parser: the receipt plus the member names it
/// suggests for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// The parsed receipt.
    pub receipt: Receipt,
    /// Member names suggested by the parser.
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl ParsedReceipt {
    /// Resolves the suggested names against the group.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownMember` for a name outside the group.
    pub fn candidate_members(&self, group: &Group) -> Result<Vec<Member>, ValidationError> {
        self.candidates
            .iter()
            .map(|name| group.resolve(name))
            .collect()
    }
}
