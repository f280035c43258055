//! Shared domain types for the swap quote resolver.
//!
//! This crate defines the asset model, quote request/response shapes, the
//! error taxonomy returned to callers, and the decimal unit conversion
//! utilities used by every other crate in the workspace.

pub mod assets;
pub mod errors;
pub mod quotes;
pub mod units;

pub use assets::{Asset, AssetList};
pub use errors::{QuoteError, Result};
pub use quotes::{ExecutionPayload, FeeTier, PoolCandidate, QuoteRequest, QuoteSource, ResolvedQuote};
pub use units::{from_base_units, to_base_units};
