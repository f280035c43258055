//! Execution payload building.
//!
//! Turns a winning pool candidate into the exact router call that executes
//! the trade: slippage-bounded minimum output, recipient routing for native
//! unwrapping, and the batched `multicall` envelope with a deadline.

use super::contracts::ISwapRouter02;
use alloy::primitives::aliases::{U160, U24};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use quoter_types::{ExecutionPayload, PoolCandidate};
use std::time::{SystemTime, UNIX_EPOCH};

/// The resolved shape of a swap, after asset addresses and amounts have been
/// pinned down.
pub(crate) struct SwapPlan {
	pub token_in: Address,
	pub token_out: Address,
	pub amount_in: U256,
	/// The real recipient of the proceeds.
	pub recipient: Address,
	pub native_input: bool,
	pub native_output: bool,
}

/// `amountOut * (10000 - slippageBps) / 10000`, integer arithmetic on base
/// units. Floating point would drift the on-chain minimum-output check.
pub(crate) fn min_output_after_slippage(amount_out: U256, slippage_bps: u16) -> U256 {
	let keep = U256::from(10_000u64.saturating_sub(u64::from(slippage_bps)));
	amount_out * keep / U256::from(10_000u64)
}

/// Unix deadline `window_secs` from now for the batched call.
pub(crate) fn execution_deadline(window_secs: u64) -> U256 {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs();
	U256::from(now + window_secs)
}

/// Builds the submittable transaction for a selected pool candidate.
///
/// When the output asset is native, the swap proceeds land at the router
/// (which holds the wrapped representative) and a second `unwrapWETH9`
/// instruction forwards the unwrapped amount to the real recipient; the
/// batch then carries exactly two instructions, otherwise exactly one. The
/// pool's own price limit is left unconstrained; the minimum-output check is
/// the only execution bound.
pub(crate) fn build_execution_payload(
	plan: &SwapPlan,
	candidate: &PoolCandidate,
	min_out: U256,
	router: Address,
	deadline: U256,
	gas_margin: u64,
) -> ExecutionPayload {
	let swap_recipient = if plan.native_output {
		router
	} else {
		plan.recipient
	};

	let swap_call = ISwapRouter02::exactInputSingleCall {
		params: ISwapRouter02::ExactInputSingleParams {
			tokenIn: plan.token_in,
			tokenOut: plan.token_out,
			fee: U24::from(candidate.fee_tier.fee()),
			recipient: swap_recipient,
			amountIn: plan.amount_in,
			amountOutMinimum: min_out,
			sqrtPriceLimitX96: U160::ZERO,
		},
	};

	let mut calls: Vec<Bytes> = vec![swap_call.abi_encode().into()];
	if plan.native_output {
		let unwrap_call = ISwapRouter02::unwrapWETH9Call {
			amountMinimum: min_out,
			recipient: plan.recipient,
		};
		calls.push(unwrap_call.abi_encode().into());
	}

	let data = ISwapRouter02::multicallCall {
		deadline,
		data: calls,
	}
	.abi_encode();

	ExecutionPayload {
		to: router,
		data: data.into(),
		value: if plan.native_input {
			plan.amount_in
		} else {
			U256::ZERO
		},
		gas_limit: candidate.gas_estimate + U256::from(gas_margin),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;
	use quoter_types::FeeTier;

	const ROUTER: Address = address!("2626664c2603336E57B271c5C0b26F421741e481");
	const WETH: Address = address!("4200000000000000000000000000000000000006");
	const USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
	const TAKER: Address = address!("00000000000000000000000000000000000a11ce");

	fn plan(native_input: bool, native_output: bool) -> SwapPlan {
		SwapPlan {
			token_in: if native_output { USDC } else { WETH },
			token_out: if native_output { WETH } else { USDC },
			amount_in: U256::from(10_000_000_000_000_000u64),
			recipient: TAKER,
			native_input,
			native_output,
		}
	}

	fn candidate() -> PoolCandidate {
		PoolCandidate {
			fee_tier: FeeTier::Low,
			amount_out: U256::from(30_000_000u64),
			gas_estimate: U256::from(120_000u64),
		}
	}

	fn decode_batch(payload: &ExecutionPayload) -> ISwapRouter02::multicallCall {
		ISwapRouter02::multicallCall::abi_decode(&payload.data).unwrap()
	}

	#[test]
	fn test_min_output_integer_math() {
		assert_eq!(
			min_output_after_slippage(U256::from(1_000_000u64), 300),
			U256::from(970_000u64)
		);
		assert_eq!(
			min_output_after_slippage(U256::from(30_000_000u64), 50),
			U256::from(29_850_000u64)
		);
		assert_eq!(
			min_output_after_slippage(U256::from(7u64), 0),
			U256::from(7u64)
		);
	}

	#[test]
	fn test_token_output_builds_single_instruction() {
		let payload = build_execution_payload(
			&plan(true, false),
			&candidate(),
			U256::from(29_850_000u64),
			ROUTER,
			U256::from(1_900_000_000u64),
			50_000,
		);

		let batch = decode_batch(&payload);
		assert_eq!(batch.data.len(), 1);
		assert_eq!(batch.deadline, U256::from(1_900_000_000u64));

		let swap = ISwapRouter02::exactInputSingleCall::abi_decode(&batch.data[0]).unwrap();
		assert_eq!(swap.params.recipient, TAKER);
		assert_eq!(swap.params.amountOutMinimum, U256::from(29_850_000u64));
		assert_eq!(swap.params.sqrtPriceLimitX96, U160::ZERO);
	}

	#[test]
	fn test_native_output_appends_unwrap_instruction() {
		let payload = build_execution_payload(
			&plan(false, true),
			&candidate(),
			U256::from(29_850_000u64),
			ROUTER,
			U256::from(1_900_000_000u64),
			50_000,
		);

		let batch = decode_batch(&payload);
		assert_eq!(batch.data.len(), 2);

		// Proceeds land at the router first so it can unwrap.
		let swap = ISwapRouter02::exactInputSingleCall::abi_decode(&batch.data[0]).unwrap();
		assert_eq!(swap.params.recipient, ROUTER);

		let unwrap = ISwapRouter02::unwrapWETH9Call::abi_decode(&batch.data[1]).unwrap();
		assert_eq!(unwrap.recipient, TAKER);
		assert_eq!(unwrap.amountMinimum, U256::from(29_850_000u64));
	}

	#[test]
	fn test_native_input_attaches_value() {
		let native = build_execution_payload(
			&plan(true, false),
			&candidate(),
			U256::ZERO,
			ROUTER,
			U256::ZERO,
			50_000,
		);
		assert_eq!(native.value, U256::from(10_000_000_000_000_000u64));

		let erc20 = build_execution_payload(
			&plan(false, false),
			&candidate(),
			U256::ZERO,
			ROUTER,
			U256::ZERO,
			50_000,
		);
		assert_eq!(erc20.value, U256::ZERO);
	}

	#[test]
	fn test_gas_limit_carries_margin() {
		let payload = build_execution_payload(
			&plan(false, false),
			&candidate(),
			U256::ZERO,
			ROUTER,
			U256::ZERO,
			50_000,
		);
		assert_eq!(payload.to, ROUTER);
		assert_eq!(payload.gas_limit, U256::from(170_000u64));
	}
}
