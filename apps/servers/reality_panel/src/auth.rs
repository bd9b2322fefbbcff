use crate::PanelError;
use axum::{
	extract::{Request, State},
	http::{header::AUTHORIZATION, HeaderValue},
	middleware::Next,
	response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

pub const USERNAME: &str = "admin";

/// HTTP Basic credentials for the single `admin` user.
pub struct BasicAuth {
	password: String,
}

impl BasicAuth {
	pub fn new(password: impl Into<String>) -> Self {
		Self { password: password.into() }
	}

	pub fn verify(&self, header: Option<&HeaderValue>) -> Result<(), PanelError> {
		let encoded = header
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Basic "))
			.ok_or(PanelError::Unauthorized)?;

		let decoded = STANDARD
			.decode(encoded.trim())
			.ok()
			.and_then(|bytes| String::from_utf8(bytes).ok())
			.ok_or(PanelError::InvalidCredentials)?;

		// Split at the first colon, the password may contain more.
		match decoded.split_once(':') {
			Some((user, pass)) if user == USERNAME && pass == self.password => Ok(()),
			_ => Err(PanelError::InvalidCredentials),
		}
	}
}

pub async fn basic_auth_middleware(State(auth): State<Arc<BasicAuth>>, request: Request, next: Next) -> Result<Response, PanelError> {
	auth.verify(request.headers().get(AUTHORIZATION))?;
	Ok(next.run(request).await)
}
