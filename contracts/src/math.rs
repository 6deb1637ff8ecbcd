//! Checked fixed-point helpers.
//!
//! Every division truncates toward zero. Callers rely on that: valuation,
//! bonus and health factor rounding must be consistent, never lenient.

use odra::casper_types::U256;
use crate::errors::DscError;
use crate::types::PRECISION_DECIMALS;

/// `a * b / denominator`, truncating.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, DscError> {
    if denominator.is_zero() {
        return Err(DscError::InternalAccountingError);
    }
    a.checked_mul(b)
        .map(|v| v / denominator)
        .ok_or(DscError::ArithmeticOverflow)
}

/// Factor lifting a `decimals`-scaled answer to 18 decimals.
pub fn scale_to_precision(decimals: u8) -> Result<U256, DscError> {
    if decimals > PRECISION_DECIMALS {
        return Err(DscError::PriceUnavailable);
    }
    Ok(U256::exp10(usize::from(PRECISION_DECIMALS - decimals)))
}

pub fn checked_add(a: U256, b: U256) -> Result<U256, DscError> {
    a.checked_add(b).ok_or(DscError::ArithmeticOverflow)
}
