use crate::{share_link, ConnectionDescriptorBuilder, PanelError};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct LinkResponse {
	pub link: String,
}

#[axum::debug_handler]
#[instrument(name = "get_link", skip(descriptors))]
pub async fn get_link(State(descriptors): State<Arc<ConnectionDescriptorBuilder>>) -> Result<Json<LinkResponse>, PanelError> {
	let record = descriptors.build().await?;
	Ok(Json(LinkResponse { link: share_link::build(&record) }))
}
