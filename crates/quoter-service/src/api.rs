//! HTTP API server.
//!
//! Exposes quote resolution at `/api/quote` plus two pass-through aggregator
//! endpoints for clients that want the raw aggregator response without
//! holding an API key.

use crate::proxy::{AggregatorProxy, ProxiedResponse, ProxyError};
use alloy::primitives::Address;
use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::get,
	Router,
};
use quoter_config::ServerConfig;
use quoter_core::QuoteResolver;
use quoter_types::{AssetList, QuoteError, QuoteRequest, ResolvedQuote};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub struct ApiServer {
	server: ServerConfig,
	state: AppState,
}

#[derive(Clone)]
struct AppState {
	resolver: Arc<QuoteResolver>,
	assets: Arc<AssetList>,
	default_slippage_bps: u16,
	proxy: Arc<AggregatorProxy>,
}

impl ApiServer {
	pub fn new(
		server: ServerConfig,
		resolver: Arc<QuoteResolver>,
		assets: AssetList,
		default_slippage_bps: u16,
		proxy: AggregatorProxy,
	) -> Self {
		Self {
			server,
			state: AppState {
				resolver,
				assets: Arc::new(assets),
				default_slippage_bps,
				proxy: Arc::new(proxy),
			},
		}
	}

	pub async fn run(self) -> anyhow::Result<()> {
		let app = Router::new()
			.route("/health", get(health_check))
			.route("/api/quote", get(get_quote))
			.route("/api/swap-quote", get(proxy_swap_quote))
			.route("/api/swap-price", get(proxy_swap_price))
			.with_state(self.state)
			.layer(TraceLayer::new_for_http())
			.layer(CorsLayer::permissive());

		let addr = format!("{}:{}", self.server.host, self.server.port);
		let listener = tokio::net::TcpListener::bind(&addr).await?;

		info!("API server listening on {}", addr);

		axum::serve(listener, app).await?;

		Ok(())
	}
}

/// Query parameters of `/api/quote`. Assets are named by configured symbol;
/// the wire names follow the aggregator's conventions (`sellToken`,
/// `buyToken`, `sellAmount`, `taker`, `slippageBps`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteParams {
	sell_token: String,
	buy_token: String,
	sell_amount: String,
	#[serde(default)]
	taker: Option<Address>,
	#[serde(default)]
	slippage_bps: Option<u16>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
	error: String,
}

struct ApiError {
	status: StatusCode,
	message: String,
}

impl From<QuoteError> for ApiError {
	fn from(e: QuoteError) -> Self {
		let status = match &e {
			QuoteError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			QuoteError::NoLiquidity(_) => StatusCode::NOT_FOUND,
			QuoteError::Config(_) | QuoteError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		Self {
			status,
			message: e.to_string(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(
			self.status,
			Json(ErrorResponse {
				error: self.message,
			}),
		)
			.into_response()
	}
}

async fn health_check() -> StatusCode {
	StatusCode::OK
}

async fn get_quote(
	State(state): State<AppState>,
	Query(params): Query<QuoteParams>,
) -> Result<Json<ResolvedQuote>, ApiError> {
	let request = build_request(&state.assets, params, state.default_slippage_bps)?;
	let quote = state.resolver.resolve(&request).await?;
	Ok(Json(quote))
}

async fn proxy_swap_quote(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	proxied(state.proxy.forward_quote(params).await)
}

async fn proxy_swap_price(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	proxied(state.proxy.forward_price(params).await)
}

fn proxied(result: Result<ProxiedResponse, ProxyError>) -> Response {
	match result {
		Ok(upstream) => (upstream.status, upstream.headers, upstream.body).into_response(),
		Err(e @ ProxyError::MissingParam(_)) => ApiError {
			status: StatusCode::BAD_REQUEST,
			message: e.to_string(),
		}
		.into_response(),
		Err(e) => {
			warn!("Aggregator proxy request failed: {}", e);
			ApiError {
				status: StatusCode::BAD_GATEWAY,
				message: e.to_string(),
			}
			.into_response()
		},
	}
}

/// Turns symbol-named query parameters into a full quote request, rejecting
/// symbols outside the configured asset list.
pub(crate) fn build_request(
	assets: &AssetList,
	params: QuoteParams,
	default_slippage_bps: u16,
) -> Result<QuoteRequest, QuoteError> {
	let input = assets
		.get(&params.sell_token)
		.ok_or_else(|| {
			QuoteError::InvalidRequest(format!("unknown asset: {}", params.sell_token))
		})?
		.clone();
	let output = assets
		.get(&params.buy_token)
		.ok_or_else(|| QuoteError::InvalidRequest(format!("unknown asset: {}", params.buy_token)))?
		.clone();

	Ok(QuoteRequest {
		input,
		output,
		amount: params.sell_amount,
		recipient: params.taker,
		slippage_bps: params.slippage_bps.unwrap_or(default_slippage_bps),
	})
}
