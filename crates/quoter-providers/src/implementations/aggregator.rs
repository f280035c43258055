//! External aggregator API fallback provider.
//!
//! Consulted when the on-chain path finds no usable liquidity. Tries the
//! aggregator's full quote endpoint first; when that errors or reports no
//! liquidity, degrades to the lighter price-only endpoint, whose result is a
//! price indication with no executable payload.

use crate::retry::with_retry;
use crate::{ProviderError, QuoteProvider};
use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use quoter_config::AggregatorConfig;
use quoter_types::{
	from_base_units, to_base_units, Asset, ExecutionPayload, QuoteRequest, QuoteSource,
	ResolvedQuote,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Sentinel address the aggregator uses for the chain's native asset.
const NATIVE_SENTINEL: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

const QUOTE_PATH: &str = "/swap/allowance-holder/quote";
const PRICE_PATH: &str = "/swap/allowance-holder/price";

/// Aggregator quote/price response. Both endpoints share this shape; the
/// price endpoint simply omits the transaction fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AggregatorResponse {
	#[serde(default)]
	pub liquidity_available: Option<bool>,
	#[serde(default)]
	pub buy_amount: Option<String>,
	#[serde(default)]
	pub price: Option<String>,
	#[serde(default)]
	pub guaranteed_price: Option<String>,
	#[serde(default)]
	pub to: Option<Address>,
	#[serde(default)]
	pub data: Option<Bytes>,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub gas: Option<String>,
	#[serde(default)]
	pub sources: Vec<SourceShare>,
}

/// One liquidity source's share of a routed quote.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SourceShare {
	pub name: String,
	pub proportion: String,
}

pub struct AggregatorApiProvider {
	client: reqwest::Client,
	base_url: String,
	api_key: Option<String>,
	chain_id: u64,
	max_attempts: u32,
	retry_base_delay: Duration,
}

impl AggregatorApiProvider {
	pub fn new(config: &AggregatorConfig, chain_id: u64) -> Result<Self, ProviderError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()
			.map_err(|e| ProviderError::Network(format!("Failed to build HTTP client: {e}")))?;

		Ok(Self {
			client,
			base_url: config.base_url.trim_end_matches('/').to_string(),
			api_key: config.api_key.clone(),
			chain_id,
			max_attempts: config.max_attempts.max(1),
			retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
		})
	}

	fn asset_param(asset: &Asset) -> Result<String, ProviderError> {
		if asset.native {
			return Ok(NATIVE_SENTINEL.to_string());
		}
		asset
			.address
			.map(|address| address.to_string())
			.ok_or_else(|| {
				ProviderError::InvalidRequest(format!(
					"asset {} has no contract address",
					asset.symbol
				))
			})
	}

	async fn fetch(
		&self,
		path: &str,
		request: &QuoteRequest,
		sell_amount: U256,
	) -> Result<AggregatorResponse, ProviderError> {
		let url = format!("{}{}", self.base_url, path);
		let mut query = vec![
			("chainId".to_string(), self.chain_id.to_string()),
			("sellToken".to_string(), Self::asset_param(&request.input)?),
			("buyToken".to_string(), Self::asset_param(&request.output)?),
			("sellAmount".to_string(), sell_amount.to_string()),
			("slippageBps".to_string(), request.slippage_bps.to_string()),
		];
		if let Some(taker) = request.recipient {
			query.push(("taker".to_string(), taker.to_string()));
		}

		with_retry(
			|| async {
				let mut builder = self.client.get(&url).query(&query);
				if let Some(key) = &self.api_key {
					builder = builder.header("0x-api-key", key).header("0x-version", "v2");
				}

				let response = builder.send().await.map_err(|e| {
					backoff::Error::transient(ProviderError::Network(format!(
						"aggregator request failed: {e}"
					)))
				})?;
				let status = response.status();
				let body = response.text().await.map_err(|e| {
					backoff::Error::transient(ProviderError::Network(format!(
						"aggregator response unreadable: {e}"
					)))
				})?;

				if !status.is_success() {
					return Err(status_error(status, &body));
				}

				serde_json::from_str(&body).map_err(|e| {
					backoff::Error::transient(ProviderError::Network(format!(
						"malformed aggregator response: {e}"
					)))
				})
			},
			self.max_attempts,
			self.retry_base_delay,
		)
		.await
	}
}

#[async_trait]
impl QuoteProvider for AggregatorApiProvider {
	fn name(&self) -> &'static str {
		"aggregator"
	}

	async fn quote(&self, request: &QuoteRequest) -> Result<ResolvedQuote, ProviderError> {
		let sell_amount = to_base_units(&request.amount, request.input.decimals)
			.map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;

		let full = self
			.fetch(QUOTE_PATH, request, sell_amount)
			.await
			.and_then(|response| map_quote_response(response, request));

		match full {
			Ok(quote) => Ok(quote),
			Err(ProviderError::InvalidRequest(message)) => {
				Err(ProviderError::InvalidRequest(message))
			},
			Err(e) => {
				debug!("Full quote endpoint failed, trying price endpoint: {}", e);
				let response = self.fetch(PRICE_PATH, request, sell_amount).await?;
				map_price_response(response, request)
			},
		}
	}
}

/// Maps a full-quote response. Executable only when the response carries the
/// complete transaction (destination, call data, gas) and the request named
/// a recipient; otherwise the result is an estimate.
pub(crate) fn map_quote_response(
	response: AggregatorResponse,
	request: &QuoteRequest,
) -> Result<ResolvedQuote, ProviderError> {
	let buy_amount = parse_buy_amount(&response)?;
	let output_amount = from_base_units(buy_amount, request.output.decimals)
		.map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
	let price_impact =
		price_impact_from_prices(response.price.as_deref(), response.guaranteed_price.as_deref());
	let route = route_label(&response.sources);

	let execution = match (&response.to, &response.data, &response.gas) {
		(Some(to), Some(data), Some(gas)) if request.recipient.is_some() => {
			Some(ExecutionPayload {
				to: *to,
				data: data.clone(),
				value: parse_decimal_u256(response.value.as_deref().unwrap_or("0"))?,
				gas_limit: parse_decimal_u256(gas)?,
			})
		},
		_ => None,
	};

	Ok(ResolvedQuote {
		source: QuoteSource::AggregatorQuote,
		route,
		fee_tier: None,
		output_amount,
		output_amount_raw: buy_amount,
		min_output_raw: None,
		price_impact_pct: price_impact,
		slippage_bps: request.slippage_bps,
		estimate_only: execution.is_none(),
		execution,
	})
}

/// Maps a price-only response: always an estimate, never executable.
pub(crate) fn map_price_response(
	response: AggregatorResponse,
	request: &QuoteRequest,
) -> Result<ResolvedQuote, ProviderError> {
	let buy_amount = parse_buy_amount(&response)?;
	let output_amount = from_base_units(buy_amount, request.output.decimals)
		.map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
	let price_impact =
		price_impact_from_prices(response.price.as_deref(), response.guaranteed_price.as_deref());

	Ok(ResolvedQuote {
		source: QuoteSource::AggregatorPrice,
		route: route_label(&response.sources),
		fee_tier: None,
		output_amount,
		output_amount_raw: buy_amount,
		min_output_raw: None,
		price_impact_pct: price_impact,
		slippage_bps: request.slippage_bps,
		estimate_only: true,
		execution: None,
	})
}

fn parse_buy_amount(response: &AggregatorResponse) -> Result<U256, ProviderError> {
	if response.liquidity_available == Some(false) {
		return Err(ProviderError::NoLiquidity(
			"aggregator reports no liquidity for this pair".to_string(),
		));
	}
	let raw = response.buy_amount.as_deref().ok_or_else(|| {
		ProviderError::Network("aggregator response missing buyAmount".to_string())
	})?;
	let amount = parse_decimal_u256(raw)?;
	if amount.is_zero() {
		return Err(ProviderError::NoLiquidity(
			"aggregator quoted zero output".to_string(),
		));
	}
	Ok(amount)
}

/// Classifies a non-2xx upstream status. Client errors cannot succeed on a
/// replay of the same request, so they never consume the retry budget; the
/// exception is 429, which the aggregator uses for rate limiting.
fn status_error(status: reqwest::StatusCode, body: &str) -> backoff::Error<ProviderError> {
	let error = ProviderError::Network(format!(
		"aggregator returned {status}: {}",
		body.chars().take(200).collect::<String>()
	));
	if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
		backoff::Error::permanent(error)
	} else {
		backoff::Error::transient(error)
	}
}

fn parse_decimal_u256(raw: &str) -> Result<U256, ProviderError> {
	U256::from_str_radix(raw, 10)
		.map_err(|e| ProviderError::Network(format!("invalid amount {raw:?} from aggregator: {e}")))
}

/// Label from the routed liquidity sources: top three by proportion,
/// comma-separated, falling back to the aggregator's own name.
pub(crate) fn route_label(sources: &[SourceShare]) -> String {
	let mut active: Vec<(&str, f64)> = sources
		.iter()
		.filter_map(|source| {
			let share: f64 = source.proportion.parse().ok()?;
			(share > 0.0).then_some((source.name.as_str(), share))
		})
		.collect();
	if active.is_empty() {
		return "0x".to_string();
	}
	active.sort_by(|a, b| b.1.total_cmp(&a.1));
	active
		.iter()
		.take(3)
		.map(|(name, _)| *name)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Price impact from the quoted vs guaranteed price, in percent, floored at
/// zero. Absent when either price is missing or unparseable.
pub(crate) fn price_impact_from_prices(price: Option<&str>, guaranteed: Option<&str>) -> Option<f64> {
	let price: f64 = price?.parse().ok()?;
	let guaranteed: f64 = guaranteed?.parse().ok()?;
	if price <= 0.0 {
		return None;
	}
	Some(((price - guaranteed) / price * 100.0).max(0.0))
}
