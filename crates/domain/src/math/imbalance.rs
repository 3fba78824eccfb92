use crate::error::MathError;
use crate::value_objects::Percentage;
use rust_decimal::Decimal;

/// Relative growth of `after` over `before`, as a percentage.
///
/// formula: (after / before - 1) * 100
///
/// # Errors
///
/// Returns `MathError::ZeroBaseline` if `before` is zero.
pub fn percent_change(before: Decimal, after: Decimal) -> Result<Decimal, MathError> {
    ratio_percent(before, after)
}

/// Imbalance of a pool whose first side is empty.
const DRAINED_IMBALANCE: Decimal = Decimal::ONE_HUNDRED;

/// Signed imbalance between two amounts, as a percentage.
///
/// Positive when `b` is in excess, negative when `a` is in excess, zero when
/// both are equal. Swapping the inputs only flips the sign.
///
/// # Arguments
///
/// * `a` - Amount of the first side
/// * `b` - Amount of the second side, in the same unit as `a`
///
/// An empty side saturates the imbalance at `-100` or `100` in favor of the
/// other side. Two empty sides are balanced.
///
/// # Errors
///
/// Returns `MathError::Overflow` if the ratio does not fit a `Decimal`.
pub fn percent_imbalance(a: Decimal, b: Decimal) -> Result<Decimal, MathError> {
    match (a.is_zero(), b.is_zero()) {
        (true, true) => return Ok(Decimal::ZERO),
        (true, false) => return Ok(DRAINED_IMBALANCE),
        (false, true) => return Ok(-DRAINED_IMBALANCE),
        (false, false) => {}
    }
    if b >= a {
        ratio_percent(a, b)
    } else {
        Ok(-ratio_percent(b, a)?)
    }
}

/// Human readable sentence naming the side in excess.
///
/// `label_a` names the side that is in excess for a positive imbalance.
#[must_use]
pub fn describe_imbalance(imbalance: Decimal, label_a: &str, label_b: &str) -> String {
    if imbalance > Decimal::ZERO {
        format!(
            "there are {}% more of {} than {} in the pool",
            Percentage(imbalance),
            label_a,
            label_b
        )
    } else {
        format!(
            "there are {}% more of {} than {} in the pool",
            Percentage(-imbalance),
            label_b,
            label_a
        )
    }
}

/// Describes a signed change, e.g. "increased by 30.00".
#[must_use]
pub fn describe_change(change: Decimal) -> String {
    if change > Decimal::ZERO {
        format!("increased by {}", Percentage(change))
    } else {
        format!("decreased by {}", Percentage(-change))
    }
}

fn ratio_percent(base: Decimal, value: Decimal) -> Result<Decimal, MathError> {
    if base.is_zero() {
        return Err(MathError::ZeroBaseline);
    }
    let ratio = value.checked_div(base).ok_or(MathError::Overflow)?;
    (ratio - Decimal::ONE)
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MathError::Overflow)
}
