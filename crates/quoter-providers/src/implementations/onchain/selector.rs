//! Best-quote selection across fee tiers.

use super::client::QuoterClient;
use alloy::primitives::{Address, U256};
use futures::future;
use quoter_types::{FeeTier, PoolCandidate};

/// Quotes every supported fee tier concurrently and keeps the best result.
/// One tier's failure never cancels or corrupts the others.
pub(crate) async fn best_pool_candidate(
	client: &QuoterClient,
	token_in: Address,
	token_out: Address,
	amount_in: U256,
) -> Option<PoolCandidate> {
	let attempts = FeeTier::ALL
		.iter()
		.map(|tier| client.try_tier(token_in, token_out, amount_in, *tier));
	let results = future::join_all(attempts).await;
	pick_best(results.into_iter().flatten())
}

/// Keeps the candidate with the strictly greatest output amount; ties keep
/// the first-seen candidate. Zero output is not a usable trade and is
/// discarded like a failed attempt.
pub(crate) fn pick_best(candidates: impl IntoIterator<Item = PoolCandidate>) -> Option<PoolCandidate> {
	let mut best: Option<PoolCandidate> = None;
	for candidate in candidates {
		if candidate.amount_out.is_zero() {
			continue;
		}
		match &best {
			Some(current) if candidate.amount_out <= current.amount_out => {},
			_ => best = Some(candidate),
		}
	}
	best
}
