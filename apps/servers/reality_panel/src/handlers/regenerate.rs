use crate::{PanelError, RegenerationController, RegenerationResponse};
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

#[axum::debug_handler]
#[instrument(name = "post_regenerate", skip(controller))]
pub async fn post_regenerate(State(controller): State<Arc<RegenerationController>>) -> Result<Json<RegenerationResponse>, PanelError> {
	let outcome = controller.regenerate().await?;
	Ok(Json(outcome.into()))
}
