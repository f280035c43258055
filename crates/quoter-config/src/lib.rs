//! Configuration for the swap quote resolver.
//!
//! Everything the resolver touches at runtime — RPC endpoint, contract
//! addresses, aggregator endpoint and key, slippage default, timeouts, and
//! the asset list — comes from an explicit configuration object built here
//! and passed into construction. Nothing reads ambient global state, which
//! keeps the core independently testable.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
	AggregatorConfig, OnchainConfig, QuoterConfig, ResolverConfig, ServerConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Failed to read config file: {0}")]
	Io(#[from] std::io::Error),

	#[error("Failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid configuration: {0}")]
	Invalid(String),
}
