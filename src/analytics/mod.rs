//! Reductions over owner-scoped records fetched from the database.
//!
//! Nothing here touches the pool; every function takes the rows (and the current
//! instant where a window matters) and returns the summary the API serializes.

pub mod budgets;
pub mod investments;
pub mod period;
pub mod transactions;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A running total left the range `Decimal` can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Totals are too large to compute")]
pub struct Overflow;

/// `*total += amount`, refusing to wrap or panic.
pub fn add(total: &mut Decimal, amount: Decimal) -> Result<(), Overflow> {
    *total = total.checked_add(amount).ok_or(Overflow)?;
    Ok(())
}

pub fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, Overflow> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(Overflow)
    })
}

/// `part / whole * 100`, zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Relative change from `base` to `value` in percent, zero when `base` is zero.
pub fn percent_change(base: Decimal, value: Decimal) -> Decimal {
    percent_of(value - base, base)
}

/// Two decimal places, halves rounded away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percent_of_guards_zero_whole() {
        assert_eq!(percent_of(dec!(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec!(550), dec!(1000)), dec!(55));
    }

    #[test]
    fn totals_report_overflow_instead_of_panicking() {
        assert_eq!(checked_total([dec!(1.5), dec!(2.5)]), Ok(dec!(4)));
        assert_eq!(checked_total([Decimal::MAX, Decimal::ONE]), Err(Overflow));

        let mut total = Decimal::MAX;
        assert_eq!(add(&mut total, Decimal::MAX), Err(Overflow));
        assert_eq!(total, Decimal::MAX);
    }

    #[test]
    fn round2_rounds_halves_up() {
        assert_eq!(round2(dec!(33.335)), dec!(33.34));
        assert_eq!(round2(dec!(66.666666)), dec!(66.67));
        assert_eq!(round2(dec!(55.0)), dec!(55));
    }
}
