use axum::body::Body;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

pub const AUTH_REALM: &str = "Basic realm=\"XReality\"";

#[derive(thiserror::Error, Debug)]
pub enum PanelError {
	#[error("Proxy not initialized. Start the proxy container first.")]
	NotInitialized,

	#[error("Link too long for QR code")]
	PayloadTooLarge { link: String },

	#[error("QR encoding failed: {0}")]
	QrEncoding(String),

	#[error("Failed to remove lockfile")]
	Persistence { details: String },

	#[error("Authentication required")]
	Unauthorized,

	#[error("Invalid credentials")]
	InvalidCredentials,

	#[error("Request timeout")]
	RequestTimeout,

	#[error("Service temporarily overloaded")]
	ServiceOverloaded,

	#[error("Unexpected Tower Service error: {0}")]
	TowerError(#[from] tower::BoxError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	link: Option<&'a str>,
}

impl PanelError {
	pub const fn status_code(&self) -> StatusCode {
		match self {
			Self::NotInitialized | Self::ServiceOverloaded => StatusCode::SERVICE_UNAVAILABLE,
			Self::PayloadTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
			Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
			Self::QrEncoding(_) | Self::Persistence { .. } | Self::TowerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn body(&self) -> ErrorBody<'_> {
		let (details, link) = match self {
			Self::Persistence { details } => (Some(details.as_str()), None),
			Self::PayloadTooLarge { link } => (None, Some(link.as_str())),
			_ => (None, None),
		};

		ErrorBody {
			error: self.to_string(),
			details,
			link,
		}
	}
}

impl IntoResponse for PanelError {
	fn into_response(self) -> Response<Body> {
		let status = self.status_code();
		match self {
			Self::Unauthorized | Self::InvalidCredentials => (status, [(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM))], Json(self.body())).into_response(),
			Self::Persistence { ref details } => {
				tracing::error!("Lockfile removal failed: {}", details);
				(status, Json(self.body())).into_response()
			}
			Self::TowerError(ref e) => {
				tracing::error!("Unhandled tower error: {:?}", e);
				(status, Json(self.body())).into_response()
			}
			// All other errors fall back
			_ => (status, Json(self.body())).into_response(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::to_bytes;

	async fn body_json(error: PanelError) -> (StatusCode, serde_json::Value) {
		let response = error.into_response();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		(status, serde_json::from_slice(&bytes).unwrap())
	}

	#[tokio::test]
	async fn test_not_initialized_is_service_unavailable() {
		let (status, body) = body_json(PanelError::NotInitialized).await;

		assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(body["error"], "Proxy not initialized. Start the proxy container first.");
	}

	#[tokio::test]
	async fn test_payload_too_large_carries_link() {
		let (status, body) = body_json(PanelError::PayloadTooLarge { link: "vless://x".into() }).await;

		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["error"], "Link too long for QR code");
		assert_eq!(body["link"], "vless://x");
		assert!(body.get("details").is_none());
	}

	#[tokio::test]
	async fn test_persistence_error_carries_details() {
		let (status, body) = body_json(PanelError::Persistence { details: "permission denied".into() }).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body["error"], "Failed to remove lockfile");
		assert_eq!(body["details"], "permission denied");
	}

	#[test]
	fn test_auth_errors_challenge_for_basic_credentials() {
		let response = PanelError::InvalidCredentials.into_response();

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.headers()[WWW_AUTHENTICATE], AUTH_REALM);
	}
}
