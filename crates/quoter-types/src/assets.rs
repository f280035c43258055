//! The tradable asset model.
//!
//! Assets are statically configured at startup and only ever looked up
//! afterwards. The chain's native asset carries no contract address and is
//! marked with the `native` flag; swap contracts operate on token interfaces
//! only, so providers substitute the wrapped representative when quoting.

use crate::errors::QuoteError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// A tradable unit, unique by symbol within the configured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
	/// Ticker symbol, e.g. "ETH" or "USDC".
	pub symbol: String,
	/// Human-readable name.
	pub name: String,
	/// Number of fractional decimal places.
	pub decimals: u8,
	/// Contract address; absent for the native asset.
	#[serde(default)]
	pub address: Option<Address>,
	/// Marks the chain's native asset.
	#[serde(default)]
	pub native: bool,
}

impl Asset {
	/// Whether this asset can appear in a quote request: the native asset or
	/// any asset with a contract address.
	pub fn is_resolvable(&self) -> bool {
		self.native || self.address.is_some()
	}

	/// Whether two assets denote the same unit.
	pub fn same_asset(&self, other: &Asset) -> bool {
		if self.symbol.eq_ignore_ascii_case(&other.symbol) {
			return true;
		}
		if self.native && other.native {
			return true;
		}
		matches!((self.address, other.address), (Some(a), Some(b)) if a == b)
	}
}

/// The configured asset list, looked up by symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetList {
	assets: Vec<Asset>,
}

impl AssetList {
	/// Builds a list, rejecting duplicate symbols and non-native assets
	/// without a contract address.
	pub fn new(assets: Vec<Asset>) -> Result<Self, QuoteError> {
		for (i, asset) in assets.iter().enumerate() {
			if !asset.is_resolvable() {
				return Err(QuoteError::Config(format!(
					"asset {} is not native and has no contract address",
					asset.symbol
				)));
			}
			if assets[..i]
				.iter()
				.any(|other| other.symbol.eq_ignore_ascii_case(&asset.symbol))
			{
				return Err(QuoteError::Config(format!(
					"duplicate asset symbol: {}",
					asset.symbol
				)));
			}
		}
		Ok(Self { assets })
	}

	pub fn get(&self, symbol: &str) -> Option<&Asset> {
		self.assets
			.iter()
			.find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Asset> {
		self.assets.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}
}
