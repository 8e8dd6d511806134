//! Split request types.

use std::collections::BTreeMap;
use std::fmt;

use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{CurrencyError, ExchangeRate};
use crate::error::ValidationError;
use crate::member::{Group, Member};

/// How a total is divided between participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Shares proportional to the weights.
    Ratio,
    /// Each weight is a percentage of the total.
    Percentage,
    /// Each weight is the share itself.
    #[serde(rename = "amount")]
    FixedAmount,
}

impl SplitMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::Percentage => "percentage",
            Self::FixedAmount => "amount",
        }
    }

    /// Returns true if the method needs a total amount.
    #[must_use]
    pub const fn requires_total(&self) -> bool {
        !matches!(self, Self::FixedAmount)
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated-at-construction request to split an expense.
///
/// Every participant is a member of the group and every weight is
/// non-negative. Fields the calculator requires (payer, method, category,
/// total) may still be missing; `SplitCalculator::validate` reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    group: String,
    payer: Option<Member>,
    method: Option<SplitMethod>,
    total: Option<Decimal>,
    currency: CurrencyCode,
    category: Option<String>,
    explanation: Option<String>,
    participants: BTreeMap<Member, Decimal>,
}

impl SplitRequest {
    /// Starts building a request for a group.
    #[must_use]
    pub fn builder(group: &Group) -> SplitRequestBuilder<'_> {
        SplitRequestBuilder::new(group)
    }

    /// Name of the group the expense belongs to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Member who paid.
    #[must_use]
    pub fn payer(&self) -> Option<&Member> {
        self.payer.as_ref()
    }

    /// Split method.
    #[must_use]
    pub const fn method(&self) -> Option<SplitMethod> {
        self.method
    }

    /// Total amount in `currency`.
    #[must_use]
    pub const fn total(&self) -> Option<Decimal> {
        self.total
    }

    /// Currency of the total and of fixed amounts.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Expense category as entered.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Free-text explanation.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// All participants with their weights, zero weights included.
    #[must_use]
    pub fn participants(&self) -> &BTreeMap<Member, Decimal> {
        &self.participants
    }

    /// Participants with a weight greater than zero.
    pub fn qualifying(&self) -> impl Iterator<Item = (&Member, Decimal)> {
        self.participants
            .iter()
            .filter(|(_, weight)| **weight > Decimal::ZERO)
            .map(|(member, weight)| (member, *weight))
    }

    /// Returns a copy with monetary fields converted at `rate`.
    ///
    /// The total is always converted. Weights are only converted for
    /// `FixedAmount`, where they are amounts rather than proportions.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::ConversionOverflow` if a product does not fit.
    pub fn converted(&self, rate: &ExchangeRate) -> Result<Self, CurrencyError> {
        let total = self.total.map(|t| rate.convert(t)).transpose()?;
        let participants = if self.method == Some(SplitMethod::FixedAmount) {
            self.participants
                .iter()
                .map(|(member, weight)| Ok((member.clone(), rate.convert(*weight)?)))
                .collect::<Result<BTreeMap<_, _>, CurrencyError>>()?
        } else {
            self.participants.clone()
        };

        Ok(Self {
            total,
            participants,
            currency: rate.to_currency,
            ..self.clone()
        })
    }
}

/// Builder for [`SplitRequest`].
///
/// Names are resolved against the group when `build` is called.
#[derive(Debug)]
pub struct SplitRequestBuilder<'g> {
    group: &'g Group,
    payer: Option<String>,
    method: Option<SplitMethod>,
    total: Option<Decimal>,
    currency: CurrencyCode,
    category: Option<String>,
    explanation: Option<String>,
    participants: Vec<(String, Decimal)>,
    equally: bool,
}

impl<'g> SplitRequestBuilder<'g> {
    /// Creates an empty builder. The currency defaults to USD.
    #[must_use]
    pub fn new(group: &'g Group) -> Self {
        Self {
            group,
            payer: None,
            method: None,
            total: None,
            currency: CurrencyCode::USD,
            category: None,
            explanation: None,
            participants: vec![],
            equally: false,
        }
    }

    /// Sets the payer.
    #[must_use]
    pub fn with_payer(mut self, payer: impl Into<String>) -> Self {
        self.payer = Some(payer.into());
        self
    }

    /// Sets the split method.
    #[must_use]
    pub fn with_method(mut self, method: SplitMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the total amount.
    #[must_use]
    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    /// Sets the currency the amounts are entered in.
    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Adds a participant. A later entry for the same member replaces the
    /// earlier one.
    #[must_use]
    pub fn with_participant(mut self, member: impl Into<String>, weight: Decimal) -> Self {
        self.participants.push((member.into(), weight));
        self
    }

    /// Splits equally: every participant with a positive weight gets weight
    /// 1 and the method becomes `Ratio`.
    #[must_use]
    pub fn split_equally(mut self) -> Self {
        self.equally = true;
        self
    }

    /// Resolves every name against the group and builds the request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownMember` for a name outside the group
    /// and `ValidationError::NegativeWeight` for a negative weight.
    pub fn build(self) -> Result<SplitRequest, ValidationError> {
        let payer = self
            .payer
            .as_deref()
            .map(|name| self.group.resolve(name))
            .transpose()?;

        let mut participants = BTreeMap::new();
        for (name, weight) in &self.participants {
            let member = self.group.resolve(name)?;
            if *weight < Decimal::ZERO {
                return Err(ValidationError::NegativeWeight {
                    member: member.to_string(),
                });
            }
            participants.insert(member, *weight);
        }

        let mut method = self.method;
        if self.equally {
            for weight in participants.values_mut() {
                if *weight > Decimal::ZERO {
                    *weight = Decimal::ONE;
                }
            }
            method = Some(SplitMethod::Ratio);
        }

        Ok(SplitRequest {
            group: self.group.name().to_string(),
            payer,
            method,
            total: self.total,
            currency: self.currency,
            category: self.category,
            explanation: self.explanation,
            participants,
        })
    }
}
