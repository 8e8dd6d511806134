//! Food unit to member assignment.

use std::collections::BTreeMap;

use super::error::ReceiptError;
use super::types::{FoodUnitId, Receipt};
use crate::error::EngineError;
use crate::member::{Group, Member};

/// Mapping from food unit to the member who consumed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    units: BTreeMap<FoodUnitId, Member>,
}

impl Assignment {
    /// Starts an assignment for a receipt, resolving names against `group`.
    #[must_use]
    pub fn builder<'a>(group: &'a Group, receipt: &'a Receipt) -> AssignmentBuilder<'a> {
        AssignmentBuilder::new(group, receipt)
    }

    /// Member assigned to a unit.
    #[must_use]
    pub fn get(&self, id: FoodUnitId) -> Option<&Member> {
        self.units.get(&id)
    }

    /// Iterates over assignments in receipt order.
    pub fn iter(&self) -> impl Iterator<Item = (FoodUnitId, &Member)> {
        self.units.iter().map(|(id, member)| (*id, member))
    }

    /// Number of assigned units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Unit(FoodUnitId),
    Item(usize),
}

/// Builder for [`Assignment`].
///
/// Later calls override earlier ones for the same unit.
#[derive(Debug)]
pub struct AssignmentBuilder<'a> {
    group: &'a Group,
    receipt: &'a Receipt,
    entries: Vec<(Target, String)>,
}

impl<'a> AssignmentBuilder<'a> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(group: &'a Group, receipt: &'a Receipt) -> Self {
        Self {
            group,
            receipt,
            entries: vec![],
        }
    }

    /// Assigns one unit to a member.
    #[must_use]
    pub fn assign(mut self, unit: FoodUnitId, member: impl Into<String>) -> Self {
        self.entries.push((Target::Unit(unit), member.into()));
        self
    }

    /// Assigns every unit of a line item to a member.
    #[must_use]
    pub fn assign_item(mut self, item: usize, member: impl Into<String>) -> Self {
        self.entries.push((Target::Item(item), member.into()));
        self
    }

    /// Resolves members and units and builds the assignment.
    ///
    /// Coverage is not checked here; an assignment may still leave units
    /// unassigned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a name outside the group,
    /// `ReceiptError::UnknownFoodUnit` for a unit or item the receipt lacks,
    /// and `ReceiptError::InvalidReceipt` for an item whose quantity is out
    /// of range.
    pub fn build(self) -> Result<Assignment, EngineError> {
        let mut units = BTreeMap::new();
        for (target, name) in self.entries {
            let member = self.group.resolve(&name)?;
            match target {
                Target::Unit(id) => {
                    if !self.receipt.contains(id) {
                        return Err(ReceiptError::UnknownFoodUnit { unit: id }.into());
                    }
                    units.insert(id, member);
                }
                Target::Item(item) => {
                    let line = self.receipt.items.get(item).ok_or(ReceiptError::UnknownFoodUnit {
                        unit: FoodUnitId::new(item, 0),
                    })?;
                    line.check_quantity(item)?;
                    for unit in 0..line.quantity {
                        units.insert(FoodUnitId::new(item, unit), member.clone());
                    }
                }
            }
        }
        Ok(Assignment { units })
    }
}
