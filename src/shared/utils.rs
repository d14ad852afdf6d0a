//! Utility functions and helpers

use alloy_primitives::utils::format_units;
use alloy_primitives::U256;

use crate::shared::errors::PoolError;
use crate::shared::types::Amount;

/// Unlimited allowance sentinel.
pub const MAX_UINT: Amount = U256::MAX;

/// One whole unit of an 18-decimal token, in base units.
pub const WEI_PER_UNIT: Amount = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Format amount as a fixed-point decimal string with `decimals` fractional digits
pub fn format_fixed(amount: Amount, decimals: u8) -> Result<String, PoolError> {
    format_units(amount, decimals).map_err(|e| PoolError::Format(e.to_string()))
}

/// Scale `amount / total` to an 18-decimal fixed-point ratio.
///
/// Callers must guarantee `total` is non-zero.
pub fn ratio_wad(amount: Amount, total: Amount) -> Result<Amount, PoolError> {
    let scaled = amount.checked_mul(WEI_PER_UNIT).ok_or(PoolError::Overflow)?;
    Ok(scaled / total)
}
