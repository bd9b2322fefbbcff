use anyhow::Result;
use clap::Parser;
use reality_panel::{app, perform_health_check, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{filter::EnvFilter, fmt::format::JsonFields, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let config = Config::parse();

	// Handle health check flag
	if config.health_check {
		return perform_health_check(&config).await;
	}

	init_tracing(&config)?;

	let config = Arc::new(config);
	let app_state = AppState::build(config.clone())?;
	let app = app(app_state);

	let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
	tracing::info!("XReality Panel running on http://{}", listener.local_addr()?);
	tracing::info!(config_dir = %config.config_dir.display(), "reading proxy credentials");
	if config.password().is_some() {
		tracing::info!("Authentication: enabled (user: {})", reality_panel::auth::USERNAME);
	} else {
		tracing::warn!("No PANEL_PASSWORD set -- panel is unprotected");
	}

	let shutdown_token = CancellationToken::new();
	let signal_shutdown_token = shutdown_token.clone();
	tokio::spawn(async move {
		tokio::signal::ctrl_c().await.ok();
		tracing::info!("Received Ctrl+C, initiating shutdown...");
		signal_shutdown_token.cancel();
	});

	axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(async move { shutdown_token.cancelled().await })
		.await?;

	tracing::info!("Server stopped");
	Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
	use tracing_subscriber::layer::SubscriberExt;

	let filter = EnvFilter::try_new(config.rust_log.as_deref().unwrap_or("info"))?;

	tracing_subscriber::registry()
		.with(if config.log_json {
			Box::new(
				tracing_subscriber::fmt::layer()
					.fmt_fields(JsonFields::default())
					.event_format(tracing_subscriber::fmt::format().json().flatten_event(true).with_span_list(false))
					.with_filter(filter),
			) as Box<dyn Layer<_> + Send + Sync>
		} else {
			Box::new(
				tracing_subscriber::fmt::layer()
					.event_format(tracing_subscriber::fmt::format().pretty())
					.with_filter(filter),
			)
		})
		.try_init()?;
	Ok(())
}
