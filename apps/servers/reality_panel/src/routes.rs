pub mod api;
pub mod health;

use crate::auth::{basic_auth_middleware, BasicAuth};
use crate::{AppState, PanelError};
use axum::{error_handling::HandleErrorLayer, middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower::{limit::GlobalConcurrencyLimitLayer, load_shed::LoadShedLayer, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

async fn handle_tower_error(error: BoxError) -> PanelError {
	if error.is::<tower::timeout::error::Elapsed>() {
		tracing::warn!("Request timeout: {}", error);
		PanelError::RequestTimeout
	} else if error.is::<tower::load_shed::error::Overloaded>() {
		tracing::warn!("Service overloaded: {}", error);
		PanelError::ServiceOverloaded
	} else {
		PanelError::TowerError(error)
	}
}

/// Full application: `/api/*` and the dashboard behind optional basic auth,
/// `/health` always public.
pub fn app(state: AppState) -> Router {
	let config = state.config.clone();

	let index = config.static_dir.join("index.html");
	let dashboard = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

	let mut protected_routes = Router::new().merge(api::api_routes()).fallback_service(dashboard);
	if let Some(password) = config.password() {
		protected_routes = protected_routes.layer(from_fn_with_state(Arc::new(BasicAuth::new(password)), basic_auth_middleware));
	}

	Router::new()
		.merge(protected_routes)
		.merge(health::get_health())
		.with_state(state)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(HandleErrorLayer::new(handle_tower_error))
				.layer(LoadShedLayer::new())
				// Router::layer clones per route; the global variant shares one semaphore.
				.layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_req))
				.layer(TimeoutLayer::new(config.request_timeout())),
		)
}
