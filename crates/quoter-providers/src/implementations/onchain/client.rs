//! Quoter contract client.
//!
//! One read-only simulation per (pair, amount, fee tier). A missing pool, a
//! reverted simulation, an undecodable response or a timeout all mean the
//! same thing to the caller: no quote at this tier. They are logged and
//! swallowed here so other tiers can still be tried.

use super::contracts::IQuoterV2;
use alloy::network::TransactionBuilder;
use alloy::primitives::aliases::{U160, U24};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use quoter_types::{FeeTier, PoolCandidate};
use std::time::Duration;
use tracing::debug;

pub(crate) struct QuoterClient {
	provider: DynProvider,
	quoter: Address,
	timeout: Duration,
}

impl QuoterClient {
	pub(crate) fn new(provider: DynProvider, quoter: Address, timeout: Duration) -> Self {
		Self {
			provider,
			quoter,
			timeout,
		}
	}

	/// Attempts an exact-input single-hop quote at one fee tier. Returns
	/// `None` when the tier has no usable quote.
	pub(crate) async fn try_tier(
		&self,
		token_in: Address,
		token_out: Address,
		amount_in: U256,
		tier: FeeTier,
	) -> Option<PoolCandidate> {
		debug_assert_ne!(token_in, token_out);

		let call = IQuoterV2::quoteExactInputSingleCall {
			params: IQuoterV2::QuoteExactInputSingleParams {
				tokenIn: token_in,
				tokenOut: token_out,
				fee: U24::from(tier.fee()),
				amountIn: amount_in,
				sqrtPriceLimitX96: U160::ZERO,
			},
		};
		let request = TransactionRequest::default()
			.with_to(self.quoter)
			.with_input(call.abi_encode());

		let simulated = tokio::time::timeout(self.timeout, async {
			self.provider.call(request).await
		})
		.await;

		let raw = match simulated {
			Ok(Ok(raw)) => raw,
			Ok(Err(e)) => {
				debug!(fee = tier.fee(), "Fee tier unavailable: {}", e);
				return None;
			},
			Err(_) => {
				debug!(fee = tier.fee(), timeout = ?self.timeout, "Quoter call timed out");
				return None;
			},
		};

		match IQuoterV2::quoteExactInputSingleCall::abi_decode_returns(&raw) {
			Ok(ret) => Some(PoolCandidate {
				fee_tier: tier,
				amount_out: ret.amountOut,
				gas_estimate: ret.gasEstimate,
			}),
			Err(e) => {
				debug!(fee = tier.fee(), "Undecodable quoter response: {}", e);
				None
			},
		}
	}
}
