use crate::qr::{self, QrError};
use crate::{share_link, ConnectionDescriptorBuilder, PanelError};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct QrResponse {
	pub qr: String,
	pub link: String,
}

#[axum::debug_handler]
#[instrument(name = "get_qr", skip(descriptors))]
pub async fn get_qr(State(descriptors): State<Arc<ConnectionDescriptorBuilder>>) -> Result<Json<QrResponse>, PanelError> {
	let record = descriptors.build().await?;
	let link = share_link::build(&record);

	match qr::encode(&link) {
		Ok(qr) => Ok(Json(QrResponse { qr, link })),
		Err(QrError::PayloadTooLarge) => {
			tracing::warn!(len = link.len(), "share link exceeds QR capacity");
			Err(PanelError::PayloadTooLarge { link })
		}
		Err(QrError::Encoding(e)) => Err(PanelError::QrEncoding(e)),
	}
}
