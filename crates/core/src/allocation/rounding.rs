//! Cent rounding using the Largest Remainder Method.
//!
//! Rounding every share on its own can lose or invent a cent. The Largest
//! Remainder Method keeps the rounded shares summing to the rounded total:
//! 1. Round the total with banker's rounding
//! 2. Round down each share
//! 3. Calculate the remainder (rounded total - sum of rounded down shares)
//! 4. Hand remainder units to the shares with the largest fractional parts

pub use divvy_shared::types::MAX_DECIMAL_PLACES;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Rounds a single amount to `decimal_places` with banker's rounding.
#[must_use]
pub fn round(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Adds up amounts, returning `None` if the sum leaves the decimal range.
#[must_use]
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Rounds every amount to `decimal_places` so that the results sum exactly to
/// the banker's-rounded sum of the inputs.
///
/// Inputs are expected to be non-negative. Each result differs from its input
/// by less than one unit of the last place. Ties on the fractional part go to
/// the earlier entry. `decimal_places` above [`MAX_DECIMAL_PLACES`] is
/// treated as the maximum.
///
/// Returns `None` if the amounts do not add up within the decimal range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use divvy_core::allocation::round_preserving_sum;
///
/// // 100 / 3 each: [33.34, 33.33, 33.33], sum = 100.00
/// let third = dec!(100) / dec!(3);
/// let result = round_preserving_sum(&[third, third, third], 2);
/// assert_eq!(result, Some(vec![dec!(33.34), dec!(33.33), dec!(33.33)]));
/// ```
#[must_use]
pub fn round_preserving_sum(amounts: &[Decimal], decimal_places: u32) -> Option<Vec<Decimal>> {
    if amounts.is_empty() {
        return Some(vec![]);
    }

    let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
    let unit = Decimal::new(1, decimal_places);
    let target = round(checked_sum(amounts.iter().copied())?, decimal_places);

    // Rescaled so every result prints with exactly `decimal_places` digits.
    let mut rounded: Vec<Decimal> = amounts
        .iter()
        .map(|a| {
            let mut down = a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero);
            down.rescale(decimal_places);
            down
        })
        .collect();

    let sum_rounded = checked_sum(rounded.iter().copied())?;
    let remainder = target.checked_sub(sum_rounded)?;

    let units_to_distribute = remainder
        .checked_div(unit)?
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_u64()
        .unwrap_or(0);
    let units_to_distribute = usize::try_from(units_to_distribute).unwrap_or(0);

    if units_to_distribute == 0 {
        return Some(rounded);
    }

    let mut remainders: Vec<(usize, Decimal)> = amounts
        .iter()
        .zip(rounded.iter())
        .enumerate()
        .map(|(i, (exact, down))| (i, *exact - *down))
        .collect();

    // Largest fraction first; the sort is stable so ties keep input order.
    remainders.sort_by(|a, b| b.1.cmp(&a.1));

    for (idx, _) in remainders.iter().take(units_to_distribute) {
        rounded[*idx] = rounded[*idx].checked_add(unit)?;
    }

    Some(rounded)
}
