use crate::handlers::health as routes;
use crate::AppState;
use axum::routing::get;
use axum::Router;

/// Mounted outside the basic-auth layer so container probes need no credentials.
pub fn get_health() -> Router<AppState> {
	Router::new().route("/health", get(routes::health))
}
