//! Quote providers for the swap resolver.
//!
//! This crate defines the [`QuoteProvider`] strategy interface and its two
//! implementations: the on-chain Uniswap V3 path (quoter client, best-quote
//! selection, execution payload building) and the external aggregator API
//! fallback. The orchestrator in `quoter-core` chains providers in order, so
//! future provider changes are additive rather than replacing whole modules.

pub mod implementations;
pub mod retry;

pub use implementations::aggregator::AggregatorApiProvider;
pub use implementations::onchain::OnchainUniswapV3Provider;
pub use retry::with_retry;

use async_trait::async_trait;
use quoter_types::{QuoteRequest, ResolvedQuote};
use thiserror::Error;

/// A single provider attempt failing. `InvalidRequest` aborts the fallback
/// chain; everything else is recovered by trying the next provider.
#[derive(Error, Debug)]
pub enum ProviderError {
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	#[error("No liquidity: {0}")]
	NoLiquidity(String),

	#[error("Network error: {0}")]
	Network(String),
}

/// A source of swap quotes, tried in order by the orchestrator's fallback
/// chain.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
	/// Short identifier used in logs and failure diagnostics.
	fn name(&self) -> &'static str;

	/// Resolves a single quote request.
	///
	/// Read-only: no state is mutated, so callers may abandon the future at
	/// any time. Per-attempt failures inside the provider (a single fee
	/// tier, a single endpoint) are handled internally; the returned error
	/// describes the provider's overall outcome.
	async fn quote(&self, request: &QuoteRequest) -> Result<ResolvedQuote, ProviderError>;
}
