//! Conversion between human-decimal amounts and base-unit integers.
//!
//! Conversions go through alloy's arbitrary-precision units path, never
//! floating point; an amount representable in the given decimal count
//! round-trips exactly.

use crate::errors::QuoteError;
use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

/// Parses a human-decimal amount string into base units.
///
/// Empty, non-numeric, zero and negative amounts are rejected as
/// `InvalidRequest`; no quote is attempted for them.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, QuoteError> {
	let trimmed = amount.trim();
	if trimmed.is_empty() {
		return Err(QuoteError::InvalidRequest("amount is empty".to_string()));
	}

	let parsed = parse_units(trimmed, decimals)
		.map_err(|e| QuoteError::InvalidRequest(format!("invalid amount {trimmed:?}: {e}")))?;
	if parsed.is_negative() {
		return Err(QuoteError::InvalidRequest(format!(
			"amount must be positive, got {trimmed}"
		)));
	}

	let value = parsed.get_absolute();
	if value.is_zero() {
		return Err(QuoteError::InvalidRequest(
			"amount must be greater than zero".to_string(),
		));
	}
	Ok(value)
}

/// Formats a base-unit amount as a human-decimal string, trimming trailing
/// fractional zeros ("1.500" becomes "1.5", "30.000000" becomes "30").
pub fn from_base_units(value: U256, decimals: u8) -> Result<String, QuoteError> {
	let formatted = format_units(value, decimals)
		.map_err(|e| QuoteError::Config(format!("cannot format with {decimals} decimals: {e}")))?;

	Ok(match formatted.split_once('.') {
		Some((integral, fractional)) => {
			let fractional = fractional.trim_end_matches('0');
			if fractional.is_empty() {
				integral.to_string()
			} else {
				format!("{integral}.{fractional}")
			}
		},
		None => formatted,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip_preserves_value() {
		let raw = to_base_units("1.5", 18).unwrap();
		assert_eq!(raw, U256::from(1_500_000_000_000_000_000u128));
		assert_eq!(from_base_units(raw, 18).unwrap(), "1.5");
	}

	#[test]
	fn test_smallest_unit_survives() {
		let raw = to_base_units("0.000000000000000001", 18).unwrap();
		assert_eq!(raw, U256::from(1u64));
		assert_eq!(from_base_units(raw, 18).unwrap(), "0.000000000000000001");
	}

	#[test]
	fn test_six_decimal_amounts() {
		let raw = to_base_units("30", 6).unwrap();
		assert_eq!(raw, U256::from(30_000_000u64));
		assert_eq!(from_base_units(raw, 6).unwrap(), "30");
	}

	#[test]
	fn test_zero_decimals_not_mangled() {
		assert_eq!(from_base_units(U256::from(1000u64), 0).unwrap(), "1000");
	}

	#[test]
	fn test_rejects_empty_zero_and_negative() {
		assert!(matches!(
			to_base_units("", 18),
			Err(QuoteError::InvalidRequest(_))
		));
		assert!(matches!(
			to_base_units("  ", 18),
			Err(QuoteError::InvalidRequest(_))
		));
		assert!(matches!(
			to_base_units("0", 18),
			Err(QuoteError::InvalidRequest(_))
		));
		assert!(matches!(
			to_base_units("0.0", 6),
			Err(QuoteError::InvalidRequest(_))
		));
		assert!(matches!(
			to_base_units("-1.5", 18),
			Err(QuoteError::InvalidRequest(_))
		));
	}

	#[test]
	fn test_rejects_non_numeric() {
		assert!(to_base_units("abc", 18).is_err());
		assert!(to_base_units("1.2.3", 18).is_err());
	}
}
