//! Short-lived quote cache.
//!
//! Quotes go stale with the chain, so entries only live for a configured TTL.
//! Expired entries are dropped lazily on lookup; there is no background
//! sweeper. A TTL of zero disables caching entirely.

use dashmap::DashMap;
use quoter_types::{QuoteRequest, ResolvedQuote};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
	input: String,
	output: String,
	amount: String,
	recipient: Option<String>,
	slippage_bps: u16,
}

impl CacheKey {
	fn from_request(request: &QuoteRequest) -> Self {
		Self {
			input: request.input.symbol.to_uppercase(),
			output: request.output.symbol.to_uppercase(),
			amount: request.amount.clone(),
			recipient: request.recipient.map(|address| address.to_string()),
			slippage_bps: request.slippage_bps,
		}
	}
}

struct CacheEntry {
	quote: ResolvedQuote,
	inserted_at: Instant,
}

pub struct QuoteCache {
	entries: DashMap<CacheKey, CacheEntry>,
	ttl: Duration,
}

impl QuoteCache {
	pub fn new(ttl: Duration) -> Self {
		Self {
			entries: DashMap::new(),
			ttl,
		}
	}

	pub fn get(&self, request: &QuoteRequest) -> Option<ResolvedQuote> {
		if self.ttl.is_zero() {
			return None;
		}
		let key = CacheKey::from_request(request);
		if let Some(entry) = self.entries.get(&key) {
			if entry.inserted_at.elapsed() < self.ttl {
				return Some(entry.quote.clone());
			}
		}
		// Stale or absent; drop whatever was there.
		self.entries.remove(&key);
		None
	}

	pub fn insert(&self, request: &QuoteRequest, quote: ResolvedQuote) {
		if self.ttl.is_zero() {
			return;
		}
		self.entries.insert(
			CacheKey::from_request(request),
			CacheEntry {
				quote,
				inserted_at: Instant::now(),
			},
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::U256;
	use quoter_types::{Asset, QuoteSource};

	fn asset(symbol: &str, decimals: u8) -> Asset {
		Asset {
			symbol: symbol.to_string(),
			name: symbol.to_string(),
			decimals,
			address: None,
			native: true,
		}
	}

	fn request(amount: &str) -> QuoteRequest {
		QuoteRequest {
			input: asset("ETH", 18),
			output: asset("USDC", 6),
			amount: amount.to_string(),
			recipient: None,
			slippage_bps: 50,
		}
	}

	fn quote(output_amount: &str) -> ResolvedQuote {
		ResolvedQuote {
			source: QuoteSource::AggregatorPrice,
			route: "0x".to_string(),
			fee_tier: None,
			output_amount: output_amount.to_string(),
			output_amount_raw: U256::from(30_000_000u64),
			min_output_raw: None,
			price_impact_pct: None,
			slippage_bps: 50,
			estimate_only: true,
			execution: None,
		}
	}

	#[test]
	fn test_hit_within_ttl() {
		let cache = QuoteCache::new(Duration::from_secs(30));
		cache.insert(&request("0.01"), quote("30"));

		let hit = cache.get(&request("0.01")).unwrap();
		assert_eq!(hit.output_amount, "30");
	}

	#[test]
	fn test_distinct_requests_do_not_collide() {
		let cache = QuoteCache::new(Duration::from_secs(30));
		cache.insert(&request("0.01"), quote("30"));

		assert!(cache.get(&request("0.02")).is_none());

		let mut looser = request("0.01");
		looser.slippage_bps = 300;
		assert!(cache.get(&looser).is_none());
	}

	#[test]
	fn test_expired_entries_are_dropped() {
		let cache = QuoteCache::new(Duration::from_millis(10));
		cache.insert(&request("0.01"), quote("30"));

		std::thread::sleep(Duration::from_millis(25));
		assert!(cache.get(&request("0.01")).is_none());
	}

	#[test]
	fn test_zero_ttl_disables_cache() {
		let cache = QuoteCache::new(Duration::ZERO);
		cache.insert(&request("0.01"), quote("30"));
		assert!(cache.get(&request("0.01")).is_none());
	}
}
