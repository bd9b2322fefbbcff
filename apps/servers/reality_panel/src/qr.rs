use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::types::QrError as EncodeError;
use qrcode::QrCode;

const MIN_WIDTH: u32 = 320;
const DARK: &str = "#e2e8f0";
const LIGHT: &str = "#00000000";

#[derive(Debug, thiserror::Error)]
pub enum QrError {
	#[error("payload exceeds QR code capacity")]
	PayloadTooLarge,

	#[error("{0}")]
	Encoding(String),
}

/// Renders `text` as an SVG QR code wrapped in a `data:` URI.
pub fn encode(text: &str) -> Result<String, QrError> {
	let code = QrCode::new(text.as_bytes()).map_err(|e| match e {
		EncodeError::DataTooLong => QrError::PayloadTooLarge,
		other => QrError::Encoding(other.to_string()),
	})?;

	let image = code
		.render::<svg::Color<'_>>()
		.min_dimensions(MIN_WIDTH, MIN_WIDTH)
		.quiet_zone(true)
		.dark_color(svg::Color(DARK))
		.light_color(svg::Color(LIGHT))
		.build();

	Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}
