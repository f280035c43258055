//! Error taxonomy for quote resolution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Classified outcome of a failed quote resolution.
///
/// Per-attempt failures (a single fee tier reverting, one provider timing
/// out) are handled inside the components that observe them and never reach
/// the caller directly; only these classified variants do.
#[derive(Error, Debug)]
pub enum QuoteError {
	/// Caller error: malformed amount, identical or unresolvable assets,
	/// out-of-range slippage. Never retried.
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	/// Every fee tier and every fallback provider was exhausted. Carries a
	/// per-provider diagnostic of what failed and why.
	#[error("No liquidity: {0}")]
	NoLiquidity(String),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
