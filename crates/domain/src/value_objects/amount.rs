use primitive_types::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors converting on-chain integers into decimals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("value {0} does not fit in a decimal")]
    TooLarge(String),

    #[error("scale of {0} decimals is not supported")]
    UnsupportedScale(u32),
}

/// Converts a raw on-chain integer to a decimal without losing digits.
///
/// # Errors
///
/// Returns `AmountError::TooLarge` if the value exceeds the 96-bit decimal mantissa.
pub fn raw_to_decimal(raw: U256) -> Result<Decimal, AmountError> {
    let digits = raw.to_string();
    Decimal::from_str_exact(&digits).map_err(|_| AmountError::TooLarge(digits))
}

/// Divides `value` by `10^decimals`.
///
/// # Errors
///
/// Returns `AmountError::UnsupportedScale` if `decimals` exceeds the decimal precision.
pub fn scale_down(value: Decimal, decimals: u32) -> Result<Decimal, AmountError> {
    if decimals > Decimal::MAX_SCALE {
        return Err(AmountError::UnsupportedScale(decimals));
    }
    value
        .checked_mul(Decimal::new(1, decimals))
        .ok_or(AmountError::UnsupportedScale(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_to_decimal_keeps_all_digits() {
        let raw = U256::from_dec_str("412345678901234567890123").unwrap();
        assert_eq!(
            raw_to_decimal(raw).unwrap(),
            dec!(412345678901234567890123)
        );
    }

    #[test]
    fn test_raw_to_decimal_rejects_huge_values() {
        let raw = U256::MAX;
        assert!(matches!(raw_to_decimal(raw), Err(AmountError::TooLarge(_))));
    }

    #[test]
    fn test_scale_down() {
        assert_eq!(scale_down(dec!(250000000), 8).unwrap(), dec!(2.5));
        assert_eq!(scale_down(dec!(7), 0).unwrap(), dec!(7));
    }
}
