//! Quote resolution core.
//!
//! Ties the provider chain together: the [`QuoteResolver`] validates
//! requests, consults a short-lived cache, and falls through providers in
//! order until one yields a quote.

pub mod cache;
pub mod orchestrator;

pub use cache::QuoteCache;
pub use orchestrator::QuoteResolver;
