//! Quote request and result shapes.

use crate::assets::Asset;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Discrete pool-fee categories supported by the on-chain provider.
///
/// Values are the concentrated-liquidity exchange's fee units (hundredths of
/// a basis point): 500 = 0.05%, 3000 = 0.3%, 10000 = 1%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTier {
	Low,
	Medium,
	High,
}

impl FeeTier {
	/// All supported tiers, in the order they are attempted. Tie-breaking in
	/// the selector is first-seen, so this order is load-bearing.
	pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

	/// The tier value as passed to the pool contracts.
	pub fn fee(&self) -> u32 {
		match self {
			FeeTier::Low => 500,
			FeeTier::Medium => 3000,
			FeeTier::High => 10000,
		}
	}

	/// Human-readable pool fee percentage.
	pub fn label(&self) -> &'static str {
		match self {
			FeeTier::Low => "0.05%",
			FeeTier::Medium => "0.3%",
			FeeTier::High => "1%",
		}
	}
}

/// An ephemeral quote request, constructed fresh per user action.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
	pub input: Asset,
	pub output: Asset,
	/// Input amount as a human-decimal string, e.g. "0.01".
	pub amount: String,
	/// On-chain recipient of the swap proceeds. Without one, providers can
	/// still price the trade but cannot build an executable payload.
	pub recipient: Option<Address>,
	/// Slippage tolerance in basis points.
	pub slippage_bps: u16,
}

/// One fee tier's quote attempt, produced by the quoter client and consumed
/// immediately by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCandidate {
	pub fee_tier: FeeTier,
	/// Raw output amount in the output asset's base units.
	pub amount_out: U256,
	pub gas_estimate: U256,
}

/// Which provider path produced a resolved quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
	/// On-chain quoter contract, executable.
	OnchainUniswapV3,
	/// External aggregator's full quote endpoint.
	AggregatorQuote,
	/// External aggregator's price-only endpoint, never executable.
	AggregatorPrice,
}

/// The subset of a resolved quote needed to submit an on-chain transaction.
/// Immutable once built; consumed exactly once by transaction submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPayload {
	/// Destination contract (the swap router, or the aggregator's entry
	/// point).
	pub to: Address,
	/// Encoded call data.
	pub data: Bytes,
	/// Native value to attach; the input amount when selling the native
	/// asset, zero otherwise.
	pub value: U256,
	/// Quoted gas estimate plus a safety margin.
	pub gas_limit: U256,
}

/// The result of quote resolution, held in caller state until acted on or
/// superseded by a newer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedQuote {
	pub source: QuoteSource,
	/// Route/provider label, e.g. "Uniswap V3 (0.05%)".
	pub route: String,
	/// Chosen fee tier, when the on-chain path won.
	pub fee_tier: Option<FeeTier>,
	/// Output amount, human formatted.
	pub output_amount: String,
	/// Output amount in base units.
	pub output_amount_raw: U256,
	/// Minimum acceptable output after slippage, when executable.
	pub min_output_raw: Option<U256>,
	/// Advisory price impact percentage, derived from amounts.
	pub price_impact_pct: Option<f64>,
	/// Slippage tolerance the quote was built with, in basis points.
	pub slippage_bps: u16,
	/// Price indication only: no executable payload could or should be
	/// built. Callers must refuse to submit a transaction for such a quote.
	pub estimate_only: bool,
	/// The executable transaction, absent for estimate-only quotes.
	pub execution: Option<ExecutionPayload>,
}

impl ResolvedQuote {
	pub fn is_executable(&self) -> bool {
		!self.estimate_only && self.execution.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fee_tier_values() {
		assert_eq!(FeeTier::Low.fee(), 500);
		assert_eq!(FeeTier::Medium.fee(), 3000);
		assert_eq!(FeeTier::High.fee(), 10000);
		assert_eq!(FeeTier::ALL.len(), 3);
	}

	#[test]
	fn test_fee_tier_labels() {
		assert_eq!(FeeTier::Low.label(), "0.05%");
		assert_eq!(FeeTier::Medium.label(), "0.3%");
		assert_eq!(FeeTier::High.label(), "1%");
	}

	#[test]
	fn test_estimate_only_quotes_are_not_executable() {
		let quote = ResolvedQuote {
			source: QuoteSource::AggregatorPrice,
			route: "0x".to_string(),
			fee_tier: None,
			output_amount: "30".to_string(),
			output_amount_raw: U256::from(30_000_000u64),
			min_output_raw: None,
			price_impact_pct: None,
			slippage_bps: 50,
			estimate_only: true,
			execution: None,
		};
		assert!(!quote.is_executable());
	}
}
