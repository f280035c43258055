//! On-chain Uniswap V3 quote provider.
//!
//! Resolves a quote by simulating the DEX's QuoterV2 contract across all
//! supported fee tiers, selecting the best output, and building the exact
//! router call that executes the trade.

mod client;
mod contracts;
mod payload;
mod selector;

use crate::{ProviderError, QuoteProvider};
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use client::QuoterClient;
use payload::{build_execution_payload, execution_deadline, min_output_after_slippage, SwapPlan};
use quoter_config::OnchainConfig;
use quoter_types::{
	from_base_units, to_base_units, Asset, PoolCandidate, QuoteRequest, QuoteSource, ResolvedQuote,
};
use selector::best_pool_candidate;
use std::time::Duration;
use tracing::debug;

/// Fraction of the input amount used as the near-spot baseline when deriving
/// price impact.
const PRICE_IMPACT_PROBE_DIVISOR: u64 = 1000;

pub struct OnchainUniswapV3Provider {
	client: QuoterClient,
	router: Address,
	wrapped_native: Address,
	gas_limit_margin: u64,
	deadline_secs: u64,
}

impl OnchainUniswapV3Provider {
	/// Builds the provider from configuration, connecting a read-only RPC
	/// provider to the configured endpoint.
	pub fn new(config: &OnchainConfig, deadline_secs: u64) -> Result<Self, ProviderError> {
		let url = config
			.rpc_url
			.parse()
			.map_err(|e| ProviderError::Network(format!("Invalid RPC URL: {e}")))?;
		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self {
			client: QuoterClient::new(
				provider,
				config.quoter_address,
				Duration::from_secs(config.rpc_timeout_secs),
			),
			router: config.router_address,
			wrapped_native: config.wrapped_native_address,
			gas_limit_margin: config.gas_limit_margin,
			deadline_secs,
		})
	}

	/// Resolves an asset to the address quoted on-chain; the native asset is
	/// substituted with its wrapped representative.
	fn resolve(&self, asset: &Asset) -> Result<Address, ProviderError> {
		if asset.native {
			return Ok(self.wrapped_native);
		}
		asset.address.ok_or_else(|| {
			ProviderError::InvalidRequest(format!("asset {} has no contract address", asset.symbol))
		})
	}

	/// Re-quotes the winning tier with a small probe amount as a near-spot
	/// baseline and compares the scaled baseline against the full quote.
	async fn estimate_price_impact(
		&self,
		token_in: Address,
		token_out: Address,
		amount_in: U256,
		best: &PoolCandidate,
	) -> Option<f64> {
		let probe = amount_in / U256::from(PRICE_IMPACT_PROBE_DIVISOR);
		if probe.is_zero() {
			return None;
		}
		let spot = self
			.client
			.try_tier(token_in, token_out, probe, best.fee_tier)
			.await?;
		compute_price_impact(spot.amount_out, best.amount_out)
	}
}

#[async_trait]
impl QuoteProvider for OnchainUniswapV3Provider {
	fn name(&self) -> &'static str {
		"uniswap_v3"
	}

	async fn quote(&self, request: &QuoteRequest) -> Result<ResolvedQuote, ProviderError> {
		let token_in = self.resolve(&request.input)?;
		let token_out = self.resolve(&request.output)?;
		if token_in == token_out {
			return Err(ProviderError::InvalidRequest(
				"input and output resolve to the same token".to_string(),
			));
		}

		let amount_in = to_base_units(&request.amount, request.input.decimals)
			.map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;

		debug!(
			token_in = %token_in,
			token_out = %token_out,
			amount_in = %amount_in,
			"Quoting on-chain"
		);

		let best = best_pool_candidate(&self.client, token_in, token_out, amount_in)
			.await
			.ok_or_else(|| {
				ProviderError::NoLiquidity("no fee tier returned a usable quote".to_string())
			})?;

		let price_impact = self
			.estimate_price_impact(token_in, token_out, amount_in, &best)
			.await;

		assemble_quote(
			request,
			token_in,
			token_out,
			amount_in,
			best,
			price_impact,
			self.router,
			execution_deadline(self.deadline_secs),
			self.gas_limit_margin,
		)
	}
}

/// Price impact from the amounts alone: how far the full-size quote falls
/// short of the probe-implied spot output, in percent, floored at zero.
pub(crate) fn compute_price_impact(probe_out: U256, amount_out: U256) -> Option<f64> {
	if probe_out.is_zero() {
		return None;
	}
	let baseline = probe_out.checked_mul(U256::from(PRICE_IMPACT_PROBE_DIVISOR))?;
	let baseline: f64 = baseline.to_string().parse().ok()?;
	let out: f64 = amount_out.to_string().parse().ok()?;
	if baseline <= 0.0 {
		return None;
	}
	Some(((baseline - out) / baseline * 100.0).max(0.0))
}

/// Assembles the resolved quote for a winning candidate. Without a recipient
/// there is nowhere to send proceeds, so the result degrades to an
/// estimate-only quote instead of encoding a payload with a placeholder
/// taker.
#[allow(clippy::too_many_arguments)]
fn assemble_quote(
	request: &QuoteRequest,
	token_in: Address,
	token_out: Address,
	amount_in: U256,
	best: PoolCandidate,
	price_impact: Option<f64>,
	router: Address,
	deadline: U256,
	gas_margin: u64,
) -> Result<ResolvedQuote, ProviderError> {
	let min_out = min_output_after_slippage(best.amount_out, request.slippage_bps);
	let output_amount = from_base_units(best.amount_out, request.output.decimals)
		.map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
	let route = format!("Uniswap V3 ({})", best.fee_tier.label());

	let execution = request.recipient.map(|recipient| {
		let plan = SwapPlan {
			token_in,
			token_out,
			amount_in,
			recipient,
			native_input: request.input.native,
			native_output: request.output.native,
		};
		build_execution_payload(&plan, &best, min_out, router, deadline, gas_margin)
	});

	Ok(ResolvedQuote {
		source: QuoteSource::OnchainUniswapV3,
		route,
		fee_tier: Some(best.fee_tier),
		output_amount,
		output_amount_raw: best.amount_out,
		min_output_raw: Some(min_out),
		price_impact_pct: price_impact,
		slippage_bps: request.slippage_bps,
		estimate_only: execution.is_none(),
		execution,
	})
}

#[cfg(test)]
mod tests {
	use super::contracts::ISwapRouter02;
	use super::*;
	use alloy::primitives::address;
	use alloy::sol_types::SolCall;
	use quoter_types::FeeTier;

	const ROUTER: Address = address!("2626664c2603336E57B271c5C0b26F421741e481");
	const WETH: Address = address!("4200000000000000000000000000000000000006");
	const USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
	const TAKER: Address = address!("00000000000000000000000000000000000a11ce");

	fn eth() -> Asset {
		Asset {
			symbol: "ETH".to_string(),
			name: "Ether".to_string(),
			decimals: 18,
			address: None,
			native: true,
		}
	}

	fn usdc() -> Asset {
		Asset {
			symbol: "USDC".to_string(),
			name: "USD Coin".to_string(),
			decimals: 6,
			address: Some(USDC),
			native: false,
		}
	}

	/// input=ETH (native), output=USDC, amount 0.01, 50 bps. The quoter found
	/// 30 USDC at the 0.05% tier.
	#[test]
	fn test_native_input_scenario() {
		let request = QuoteRequest {
			input: eth(),
			output: usdc(),
			amount: "0.01".to_string(),
			recipient: Some(TAKER),
			slippage_bps: 50,
		};
		let amount_in = to_base_units("0.01", 18).unwrap();
		let best = PoolCandidate {
			fee_tier: FeeTier::Low,
			amount_out: U256::from(30_000_000u64),
			gas_estimate: U256::from(120_000u64),
		};

		let quote = assemble_quote(
			&request,
			WETH,
			USDC,
			amount_in,
			best,
			None,
			ROUTER,
			U256::from(1_900_000_000u64),
			50_000,
		)
		.unwrap();

		assert_eq!(quote.source, QuoteSource::OnchainUniswapV3);
		assert_eq!(quote.output_amount, "30");
		assert_eq!(quote.min_output_raw, Some(U256::from(29_850_000u64)));
		assert_eq!(quote.route, "Uniswap V3 (0.05%)");
		assert_eq!(quote.fee_tier, Some(FeeTier::Low));
		assert!(quote.is_executable());

		let payload = quote.execution.unwrap();
		assert_eq!(payload.to, ROUTER);
		assert_eq!(payload.value, U256::from(10_000_000_000_000_000u64));
		assert_eq!(payload.gas_limit, U256::from(170_000u64));

		// Output is not native, so the batch carries exactly one instruction.
		let batch = ISwapRouter02::multicallCall::abi_decode(&payload.data).unwrap();
		assert_eq!(batch.data.len(), 1);
	}

	#[test]
	fn test_missing_recipient_degrades_to_estimate() {
		let request = QuoteRequest {
			input: eth(),
			output: usdc(),
			amount: "0.01".to_string(),
			recipient: None,
			slippage_bps: 50,
		};
		let best = PoolCandidate {
			fee_tier: FeeTier::Medium,
			amount_out: U256::from(29_000_000u64),
			gas_estimate: U256::from(120_000u64),
		};

		let quote = assemble_quote(
			&request,
			WETH,
			USDC,
			U256::from(10_000_000_000_000_000u64),
			best,
			None,
			ROUTER,
			U256::ZERO,
			50_000,
		)
		.unwrap();

		assert!(quote.estimate_only);
		assert!(quote.execution.is_none());
		assert_eq!(quote.route, "Uniswap V3 (0.3%)");
	}

	#[test]
	fn test_price_impact_from_amounts() {
		// Probe of 1000 units implies a spot output of 1_000_000; the full
		// quote only achieved 990_000, a 1% impact.
		let impact = compute_price_impact(U256::from(1_000u64), U256::from(990_000u64)).unwrap();
		assert!((impact - 1.0).abs() < 1e-9);

		// Better-than-spot output floors at zero.
		let impact = compute_price_impact(U256::from(1_000u64), U256::from(1_001_000u64)).unwrap();
		assert_eq!(impact, 0.0);

		assert!(compute_price_impact(U256::ZERO, U256::from(1u64)).is_none());
	}
}
