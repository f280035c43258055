//! Contract bindings for the on-chain quoting and execution path.

use alloy::sol;

sol! {
	/// Read-only quoting contract. The parameter and return ordering here is
	/// wire format for the deployed contract and must not be rearranged.
	interface IQuoterV2 {
		struct QuoteExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint24 fee;
			uint256 amountIn;
			uint160 sqrtPriceLimitX96;
		}

		function quoteExactInputSingle(QuoteExactInputSingleParams params)
			external
			returns (
				uint256 amountOut,
				uint160 sqrtPriceX96After,
				uint32 initializedTicksCrossed,
				uint256 gasEstimate
			);
	}

	/// Swap router. Calls are always batched through `multicall` so a
	/// post-swap unwrap step can share the same deadline.
	interface ISwapRouter02 {
		struct ExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint24 fee;
			address recipient;
			uint256 amountIn;
			uint256 amountOutMinimum;
			uint160 sqrtPriceLimitX96;
		}

		function exactInputSingle(ExactInputSingleParams params)
			external
			payable
			returns (uint256 amountOut);

		function multicall(uint256 deadline, bytes[] data)
			external
			payable
			returns (bytes[] results);

		function unwrapWETH9(uint256 amountMinimum, address recipient) external payable;
	}
}
