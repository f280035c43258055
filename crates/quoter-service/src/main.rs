use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quoter_config::ConfigLoader;
use quoter_core::QuoteResolver;
use quoter_providers::{AggregatorApiProvider, OnchainUniswapV3Provider, QuoteProvider};
use quoter_types::AssetList;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod proxy;

#[derive(Parser)]
#[command(name = "quoter-service")]
#[command(about = "Swap quote resolution service", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	#[arg(long, env = "QUOTER_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the quote service
	Start,
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Some(Commands::Start) | None => start_service(cli).await,
		Some(Commands::Validate) => validate_config(cli).await,
	}
}

async fn start_service(cli: Cli) -> Result<()> {
	info!("Starting quoter service");
	info!("Loading configuration from: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	info!("Configuration loaded successfully");
	info!("Chain ID: {}", config.onchain.chain_id);
	info!("HTTP port: {}", config.server.port);

	let assets = AssetList::new(config.assets.clone()).context("Invalid asset list")?;

	let onchain = OnchainUniswapV3Provider::new(&config.onchain, config.resolver.deadline_secs)
		.context("Failed to build on-chain provider")?;
	let aggregator = AggregatorApiProvider::new(&config.aggregator, config.onchain.chain_id)
		.context("Failed to build aggregator provider")?;

	// On-chain first; the aggregator is the fallback.
	let providers: Vec<Arc<dyn QuoteProvider>> = vec![Arc::new(onchain), Arc::new(aggregator)];
	let resolver = Arc::new(QuoteResolver::new(
		providers,
		Duration::from_secs(config.resolver.cache_ttl_secs),
	));

	let proxy = proxy::AggregatorProxy::new(&config.aggregator, config.onchain.chain_id)
		.context("Failed to build aggregator proxy")?;

	let server = api::ApiServer::new(
		config.server.clone(),
		resolver,
		assets,
		config.resolver.default_slippage_bps,
		proxy,
	);
	let http_handle = tokio::spawn(async move { server.run().await });

	info!("Quoter service started successfully");

	setup_shutdown_signal().await;

	info!("Shutdown signal received, stopping service");
	http_handle.abort();
	info!("Quoter service stopped");
	Ok(())
}

async fn validate_config(cli: Cli) -> Result<()> {
	info!("Validating configuration file: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	info!("Configuration is valid");
	info!("Chain ID: {}", config.onchain.chain_id);
	info!("Quoter: {}", config.onchain.quoter_address);
	info!("Router: {}", config.onchain.router_address);
	info!("Assets:");
	for asset in &config.assets {
		info!(
			"  {} ({}, {} decimals)",
			asset.symbol, asset.name, asset.decimals
		);
	}

	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
