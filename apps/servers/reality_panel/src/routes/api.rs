use crate::handlers::{config_download, connection, link, qr, regenerate, status};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn api_routes() -> Router<AppState> {
	Router::new()
		.route("/api/status", get(status::get_status))
		.route("/api/connection", get(connection::get_connection))
		.route("/api/link", get(link::get_link))
		.route("/api/qr", get(qr::get_qr))
		.route("/api/config/download", get(config_download::download_client_config))
		.route("/api/regenerate", post(regenerate::post_regenerate))
}
