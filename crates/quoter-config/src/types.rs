//! Configuration types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use quoter_types::Asset;

/// Complete resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoterConfig {
	/// HTTP service settings.
	#[serde(default)]
	pub server: ServerConfig,
	/// On-chain quoting path.
	pub onchain: OnchainConfig,
	/// External aggregator fallback.
	pub aggregator: AggregatorConfig,
	/// Orchestrator behavior.
	#[serde(default)]
	pub resolver: ResolverConfig,
	/// Tradable assets, unique by symbol.
	pub assets: Vec<Asset>,
}

/// HTTP service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

/// On-chain quoting configuration for a single chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OnchainConfig {
	/// HTTP JSON-RPC endpoint URL.
	pub rpc_url: String,
	/// Chain ID the contracts below live on.
	pub chain_id: u64,
	/// QuoterV2 contract address.
	pub quoter_address: Address,
	/// SwapRouter02 contract address.
	pub router_address: Address,
	/// Wrapped representative of the native asset (WETH on Base).
	pub wrapped_native_address: Address,
	/// Per-call RPC timeout in seconds.
	#[serde(default = "default_rpc_timeout_secs")]
	pub rpc_timeout_secs: u64,
	/// Gas units added on top of the quoted gas estimate.
	#[serde(default = "default_gas_limit_margin")]
	pub gas_limit_margin: u64,
}

/// External aggregator API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregatorConfig {
	/// Base URL of the aggregator API.
	#[serde(default = "default_aggregator_base_url")]
	pub base_url: String,
	/// API key sent with every request. Can also be supplied via the
	/// `QUOTER_AGGREGATOR_API_KEY` environment variable.
	#[serde(default)]
	pub api_key: Option<String>,
	/// Per-request timeout in seconds.
	#[serde(default = "default_aggregator_timeout_secs")]
	pub timeout_secs: u64,
	/// Attempts per endpoint before giving up.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	/// Initial backoff delay between attempts, in milliseconds.
	#[serde(default = "default_retry_base_delay_ms")]
	pub retry_base_delay_ms: u64,
}

/// Orchestrator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
	/// Slippage tolerance applied when a request does not carry one, in
	/// basis points.
	#[serde(default = "default_slippage_bps")]
	pub default_slippage_bps: u16,
	/// Quote cache time-to-live in seconds; zero disables the cache.
	#[serde(default = "default_cache_ttl_secs")]
	pub cache_ttl_secs: u64,
	/// Execution deadline attached to built payloads, in seconds from now.
	#[serde(default = "default_deadline_secs")]
	pub deadline_secs: u64,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			default_slippage_bps: default_slippage_bps(),
			cache_ttl_secs: default_cache_ttl_secs(),
			deadline_secs: default_deadline_secs(),
		}
	}
}

fn default_host() -> String {
	"127.0.0.1".to_string()
}

fn default_port() -> u16 {
	8080
}

fn default_rpc_timeout_secs() -> u64 {
	15
}

fn default_gas_limit_margin() -> u64 {
	50_000
}

fn default_aggregator_base_url() -> String {
	"https://api.0x.org".to_string()
}

fn default_aggregator_timeout_secs() -> u64 {
	10
}

fn default_max_attempts() -> u32 {
	3
}

fn default_retry_base_delay_ms() -> u64 {
	250
}

fn default_slippage_bps() -> u16 {
	300
}

fn default_cache_ttl_secs() -> u64 {
	30
}

fn default_deadline_secs() -> u64 {
	1800
}
