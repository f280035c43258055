//! Generic retry with exponential backoff.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Runs `operation` up to `max_attempts` times, sleeping with exponential
/// backoff (starting at `base_delay`) between attempts. Applied uniformly to
/// rate-limited provider calls instead of per-call-site retry loops.
///
/// The operation classifies its own failures with [`backoff::Error`]: a
/// `Transient` error is retried, a `Permanent` one is returned immediately
/// without burning the remaining attempts.
pub async fn with_retry<T, E, F, Fut>(
	mut operation: F,
	max_attempts: u32,
	base_delay: Duration,
) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, backoff::Error<E>>>,
	E: Display,
{
	let mut backoff = ExponentialBackoff {
		initial_interval: base_delay,
		max_elapsed_time: None,
		..Default::default()
	};
	let mut attempt = 0u32;

	loop {
		attempt += 1;
		match operation().await {
			Ok(value) => return Ok(value),
			Err(backoff::Error::Permanent(e)) => {
				warn!("Operation failed permanently, not retrying: {}", e);
				return Err(e);
			},
			Err(backoff::Error::Transient { err, .. }) if attempt >= max_attempts => {
				warn!(
					"Operation failed after {} attempts, giving up: {}",
					attempt, err
				);
				return Err(err);
			},
			Err(backoff::Error::Transient { err, retry_after }) => {
				let delay =
					retry_after.unwrap_or_else(|| backoff.next_backoff().unwrap_or(base_delay));
				warn!(
					"Operation failed, attempt {}/{}, retrying in {:?}: {}",
					attempt, max_attempts, delay, err
				);
				tokio::time::sleep(delay).await;
			},
		}
	}
}
