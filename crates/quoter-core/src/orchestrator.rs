//! Quote resolution orchestrator.
//!
//! Validates a request once, then walks the provider chain in configured
//! order. The first provider to produce a quote wins; everything a provider
//! could not serve is carried forward as a diagnostic so an exhausted chain
//! can say exactly what failed where. An invalid request aborts the chain
//! immediately since no provider can do better with the same input.

use crate::cache::QuoteCache;
use quoter_providers::{ProviderError, QuoteProvider};
use quoter_types::{to_base_units, QuoteError, QuoteRequest, ResolvedQuote, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct QuoteResolver {
	providers: Vec<Arc<dyn QuoteProvider>>,
	cache: QuoteCache,
}

impl QuoteResolver {
	/// Builds a resolver over an ordered provider chain. The order is the
	/// fallback order.
	pub fn new(providers: Vec<Arc<dyn QuoteProvider>>, cache_ttl: Duration) -> Self {
		Self {
			providers,
			cache: QuoteCache::new(cache_ttl),
		}
	}

	/// Resolves a quote, consulting the cache first.
	pub async fn resolve(&self, request: &QuoteRequest) -> Result<ResolvedQuote> {
		validate(request)?;

		if let Some(cached) = self.cache.get(request) {
			debug!(
				input = %request.input.symbol,
				output = %request.output.symbol,
				"Serving cached quote"
			);
			return Ok(cached);
		}

		let quote = self.resolve_uncached(request).await?;
		self.cache.insert(request, quote.clone());
		Ok(quote)
	}

	async fn resolve_uncached(&self, request: &QuoteRequest) -> Result<ResolvedQuote> {
		let mut failures: Vec<String> = Vec::new();

		for provider in &self.providers {
			match provider.quote(request).await {
				Ok(quote) => {
					info!(
						provider = provider.name(),
						route = %quote.route,
						estimate_only = quote.estimate_only,
						"Quote resolved"
					);
					return Ok(quote);
				},
				Err(ProviderError::InvalidRequest(message)) => {
					return Err(QuoteError::InvalidRequest(message));
				},
				Err(e) => {
					warn!(provider = provider.name(), "Provider failed: {}", e);
					failures.push(format!("{}: {}", provider.name(), e));
				},
			}
		}

		Err(QuoteError::NoLiquidity(if failures.is_empty() {
			"no providers configured".to_string()
		} else {
			failures.join("; ")
		}))
	}
}

/// Request validation shared by every provider: done once, up front, so
/// provider failures always mean the market (or the network), never the
/// caller.
fn validate(request: &QuoteRequest) -> Result<()> {
	if request.input.same_asset(&request.output) {
		return Err(QuoteError::InvalidRequest(
			"input and output are the same asset".to_string(),
		));
	}
	for asset in [&request.input, &request.output] {
		if !asset.is_resolvable() {
			return Err(QuoteError::InvalidRequest(format!(
				"asset {} has no contract address",
				asset.symbol
			)));
		}
	}
	if request.slippage_bps >= 10_000 {
		return Err(QuoteError::InvalidRequest(format!(
			"slippage of {} bps is not below 100%",
			request.slippage_bps
		)));
	}
	// Rejects empty, zero, negative and non-numeric amounts in one place.
	to_base_units(&request.amount, request.input.decimals)?;
	Ok(())
}
