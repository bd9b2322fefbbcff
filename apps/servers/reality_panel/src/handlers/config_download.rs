use crate::client_config::{self, ClientConfig, DOWNLOAD_FILE_NAME};
use crate::{ConnectionDescriptorBuilder, PanelError};
use axum::{extract::State, http::header::CONTENT_DISPOSITION, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

#[axum::debug_handler]
#[instrument(name = "download_client_config", skip(descriptors))]
pub async fn download_client_config(State(descriptors): State<Arc<ConnectionDescriptorBuilder>>) -> Result<impl IntoResponse, PanelError> {
	let record = descriptors.build().await?;
	let config: ClientConfig = client_config::build(&record);
	let disposition = format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\"");

	Ok(([(CONTENT_DISPOSITION, disposition)], Json(config)))
}
