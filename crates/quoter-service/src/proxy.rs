//! Aggregator pass-through proxy.
//!
//! Lets a browser client hit the aggregator without holding the API key:
//! the service injects the key server-side, pins the chain to the configured
//! one, and forwards the aggregator's status and body verbatim. Quotes are
//! time-sensitive, so responses are marked uncacheable.

use axum::http::{header, HeaderMap, StatusCode};
use quoter_config::AggregatorConfig;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const QUOTE_PATH: &str = "/swap/allowance-holder/quote";
const PRICE_PATH: &str = "/swap/allowance-holder/price";

const REQUIRED_PARAMS: [&str; 3] = ["sellToken", "buyToken", "sellAmount"];

#[derive(Error, Debug)]
pub enum ProxyError {
	#[error("missing required parameter: {0}")]
	MissingParam(&'static str),

	#[error("aggregator unreachable: {0}")]
	Upstream(#[from] reqwest::Error),
}

pub struct AggregatorProxy {
	client: reqwest::Client,
	base_url: String,
	api_key: Option<String>,
	chain_id: u64,
}

/// A forwarded aggregator response: upstream status, verbatim JSON body.
#[derive(Debug)]
pub struct ProxiedResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: String,
}

impl AggregatorProxy {
	pub fn new(config: &AggregatorConfig, chain_id: u64) -> Result<Self, anyhow::Error> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()?;

		Ok(Self {
			client,
			base_url: config.base_url.trim_end_matches('/').to_string(),
			api_key: config.api_key.clone(),
			chain_id,
		})
	}

	pub async fn forward_quote(
		&self,
		params: HashMap<String, String>,
	) -> Result<ProxiedResponse, ProxyError> {
		self.forward(QUOTE_PATH, params).await
	}

	pub async fn forward_price(
		&self,
		params: HashMap<String, String>,
	) -> Result<ProxiedResponse, ProxyError> {
		self.forward(PRICE_PATH, params).await
	}

	async fn forward(
		&self,
		path: &str,
		params: HashMap<String, String>,
	) -> Result<ProxiedResponse, ProxyError> {
		for required in REQUIRED_PARAMS {
			if !params.contains_key(required) {
				return Err(ProxyError::MissingParam(required));
			}
		}

		let url = format!("{}{}", self.base_url, path);
		let query = prepare_query(params, self.chain_id);

		debug!(path, "Forwarding aggregator request");

		let mut builder = self.client.get(&url).query(&query);
		if let Some(key) = &self.api_key {
			builder = builder.header("0x-api-key", key).header("0x-version", "v2");
		}

		let response = builder.send().await?;
		let status =
			StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
		let body = response.text().await?;

		let mut headers = HeaderMap::new();
		headers.insert(
			header::CONTENT_TYPE,
			header::HeaderValue::from_static("application/json"),
		);
		headers.insert(
			header::CACHE_CONTROL,
			header::HeaderValue::from_static("no-store"),
		);

		Ok(ProxiedResponse {
			status,
			headers,
			body,
		})
	}
}

/// Normalizes the client's query for the upstream API: the chain is pinned
/// server-side, and a percentage slippage ("0.5") is converted to the basis
/// points the v2 API expects. Everything else passes through untouched.
fn prepare_query(params: HashMap<String, String>, chain_id: u64) -> Vec<(String, String)> {
	let has_bps = params.contains_key("slippageBps");
	let mut query: Vec<(String, String)> = Vec::with_capacity(params.len() + 1);

	for (key, value) in params {
		match key.as_str() {
			"chainId" => {},
			"slippagePercentage" => {
				if !has_bps {
					if let Some(bps) = percentage_to_bps(&value) {
						query.push(("slippageBps".to_string(), bps.to_string()));
					}
				}
			},
			_ => query.push((key, value)),
		}
	}

	query.push(("chainId".to_string(), chain_id.to_string()));
	query.sort();
	query
}

fn percentage_to_bps(value: &str) -> Option<u32> {
	let pct: f64 = value.parse().ok()?;
	if !(0.0..100.0).contains(&pct) {
		return None;
	}
	Some((pct * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_chain_id_is_pinned() {
		let query = prepare_query(params(&[("chainId", "1"), ("sellToken", "ETH")]), 8453);
		assert!(query.contains(&("chainId".to_string(), "8453".to_string())));
		assert!(!query.contains(&("chainId".to_string(), "1".to_string())));
		assert!(query.contains(&("sellToken".to_string(), "ETH".to_string())));
	}

	#[test]
	fn test_percentage_converted_to_bps() {
		let query = prepare_query(params(&[("slippagePercentage", "0.5")]), 8453);
		assert!(query.contains(&("slippageBps".to_string(), "50".to_string())));
		assert!(!query.iter().any(|(k, _)| k == "slippagePercentage"));
	}

	#[test]
	fn test_explicit_bps_wins_over_percentage() {
		let query = prepare_query(
			params(&[("slippagePercentage", "0.5"), ("slippageBps", "300")]),
			8453,
		);
		assert!(query.contains(&("slippageBps".to_string(), "300".to_string())));
		assert!(!query.contains(&("slippageBps".to_string(), "50".to_string())));
	}

	#[test]
	fn test_out_of_range_percentage_dropped() {
		let query = prepare_query(params(&[("slippagePercentage", "250")]), 8453);
		assert!(!query.iter().any(|(k, _)| k == "slippageBps"));
	}

	#[tokio::test]
	async fn test_missing_required_param_rejected() {
		let config = AggregatorConfig {
			base_url: "https://api.0x.org".to_string(),
			api_key: None,
			timeout_secs: 1,
			max_attempts: 1,
			retry_base_delay_ms: 1,
		};
		let proxy = AggregatorProxy::new(&config, 8453).unwrap();

		let err = proxy
			.forward_quote(params(&[("sellToken", "ETH")]))
			.await
			.unwrap_err();
		assert!(matches!(err, ProxyError::MissingParam("buyToken")));
	}

	#[test]
	fn test_percentage_to_bps() {
		assert_eq!(percentage_to_bps("0.5"), Some(50));
		assert_eq!(percentage_to_bps("3"), Some(300));
		assert_eq!(percentage_to_bps("0"), Some(0));
		assert_eq!(percentage_to_bps("abc"), None);
		assert_eq!(percentage_to_bps("-1"), None);
	}
}
