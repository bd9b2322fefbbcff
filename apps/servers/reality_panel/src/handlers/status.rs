use crate::{AppState, PanelStatus};
use axum::{extract::State, Json};
use tracing::instrument;

#[axum::debug_handler]
#[instrument(name = "get_status", skip(state))]
pub async fn get_status(State(state): State<AppState>) -> Json<PanelStatus> {
	Json(state.descriptors.status(&state.config.core_version).await)
}
