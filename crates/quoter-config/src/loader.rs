//! Configuration loading and validation.

use crate::types::QuoterConfig;
use crate::ConfigError;
use quoter_types::AssetList;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable consulted for the aggregator API key when the config
/// file does not carry one. Keeps the secret out of checked-in files.
const API_KEY_ENV: &str = "QUOTER_AGGREGATOR_API_KEY";

/// Builder-style loader for [`QuoterConfig`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
	path: Option<PathBuf>,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
		self.path = Some(path.as_ref().to_path_buf());
		self
	}

	/// Reads, parses and validates the configuration file.
	pub async fn load(self) -> Result<QuoterConfig, ConfigError> {
		let path = self
			.path
			.ok_or_else(|| ConfigError::Invalid("no config file given".to_string()))?;

		debug!(path = %path.display(), "Loading configuration");
		let raw = tokio::fs::read_to_string(&path).await?;
		let mut config: QuoterConfig = toml::from_str(&raw)?;

		if config.aggregator.api_key.is_none() {
			if let Ok(key) = std::env::var(API_KEY_ENV) {
				if !key.is_empty() {
					config.aggregator.api_key = Some(key);
				}
			}
		}

		validate(&config)?;
		Ok(config)
	}
}

fn validate(config: &QuoterConfig) -> Result<(), ConfigError> {
	// AssetList::new enforces symbol uniqueness and address presence.
	let assets = AssetList::new(config.assets.clone())
		.map_err(|e| ConfigError::Invalid(e.to_string()))?;
	if assets.is_empty() {
		return Err(ConfigError::Invalid("asset list is empty".to_string()));
	}

	if !config.onchain.rpc_url.starts_with("http://") && !config.onchain.rpc_url.starts_with("https://")
	{
		return Err(ConfigError::Invalid(
			"onchain.rpc_url must start with http:// or https://".to_string(),
		));
	}

	if config.resolver.default_slippage_bps >= 10_000 {
		return Err(ConfigError::Invalid(format!(
			"resolver.default_slippage_bps must be below 10000, got {}",
			config.resolver.default_slippage_bps
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	const EXAMPLE: &str = r#"
		[onchain]
		rpc_url = "https://mainnet.base.org"
		chain_id = 8453
		quoter_address = "0x3d4e44Eb1374240CE5F1B871ab261CD16335B76a"
		router_address = "0x2626664c2603336E57B271c5C0b26F421741e481"
		wrapped_native_address = "0x4200000000000000000000000000000000000006"

		[aggregator]
		base_url = "https://api.0x.org"
		api_key = "test-key"

		[[assets]]
		symbol = "ETH"
		name = "Ether"
		decimals = 18
		native = true

		[[assets]]
		symbol = "USDC"
		name = "USD Coin"
		decimals = 6
		address = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"
	"#;

	#[test]
	fn test_parse_with_defaults() {
		let config: QuoterConfig = toml::from_str(EXAMPLE).unwrap();
		validate(&config).unwrap();

		assert_eq!(config.onchain.chain_id, 8453);
		assert_eq!(config.onchain.rpc_timeout_secs, 15);
		assert_eq!(config.onchain.gas_limit_margin, 50_000);
		assert_eq!(config.resolver.default_slippage_bps, 300);
		assert_eq!(config.resolver.cache_ttl_secs, 30);
		assert_eq!(config.resolver.deadline_secs, 1800);
		assert_eq!(config.server.port, 8080);
		assert_eq!(config.assets.len(), 2);
	}

	#[test]
	fn test_rejects_bad_rpc_url() {
		let mut config: QuoterConfig = toml::from_str(EXAMPLE).unwrap();
		config.onchain.rpc_url = "ws://mainnet.base.org".to_string();
		assert!(validate(&config).is_err());
	}

	#[test]
	fn test_rejects_out_of_range_slippage() {
		let mut config: QuoterConfig = toml::from_str(EXAMPLE).unwrap();
		config.resolver.default_slippage_bps = 10_000;
		assert!(validate(&config).is_err());
	}

	#[test]
	fn test_rejects_duplicate_assets() {
		let mut config: QuoterConfig = toml::from_str(EXAMPLE).unwrap();
		let dup = config.assets[1].clone();
		config.assets.push(dup);
		assert!(validate(&config).is_err());
	}

	#[tokio::test]
	async fn test_load_missing_file_fails() {
		let err = ConfigLoader::new()
			.with_file("/nonexistent/quoter.toml")
			.load()
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::Io(_)));
	}
}
