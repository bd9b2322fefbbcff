use crate::Config;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	status: &'static str,
	version: String,
	/// Whether the proxy's credential directory is mounted.
	config_dir_present: bool,
}

#[axum::debug_handler]
#[instrument(name = "health", skip(config))]
pub async fn health(State(config): State<Arc<Config>>) -> Json<HealthResponse> {
	let config_dir_present = tokio::fs::metadata(&config.config_dir).await.is_ok_and(|meta| meta.is_dir());

	Json(HealthResponse {
		status: "healthy",
		version: config.core_version.clone(),
		config_dir_present,
	})
}
