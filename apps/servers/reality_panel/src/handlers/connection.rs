use crate::descriptor::{ConnectionRecord, FINGERPRINT, FLOW, NETWORK, SECURITY};
use crate::{ConnectionDescriptorBuilder, PanelError};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Flattened record as the dashboard renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
	ip: String,
	port: u16,
	uuid: String,
	public_key: String,
	sni: String,
	short_id: String,
	flow: &'static str,
	network: &'static str,
	security: &'static str,
	fingerprint: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pq: Option<PostQuantumView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuantumView {
	mldsa65_verify: String,
	vless_encryption: String,
}

impl From<ConnectionRecord> for ConnectionView {
	fn from(record: ConnectionRecord) -> Self {
		Self {
			ip: record.address,
			port: record.port,
			uuid: record.identity,
			public_key: record.public_key,
			sni: record.server_name,
			short_id: record.short_id,
			flow: FLOW,
			network: NETWORK,
			security: SECURITY,
			fingerprint: FINGERPRINT,
			pq: record.post_quantum.map(|pq| PostQuantumView {
				mldsa65_verify: pq.signature_verify,
				vless_encryption: pq.encryption_suite,
			}),
		}
	}
}

#[axum::debug_handler]
#[instrument(name = "get_connection", skip(descriptors))]
pub async fn get_connection(State(descriptors): State<Arc<ConnectionDescriptorBuilder>>) -> Result<Json<ConnectionView>, PanelError> {
	let record = descriptors.build().await?;
	Ok(Json(record.into()))
}
