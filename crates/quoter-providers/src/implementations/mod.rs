//! Concrete [`crate::QuoteProvider`] implementations.

pub mod aggregator;
pub mod onchain;
