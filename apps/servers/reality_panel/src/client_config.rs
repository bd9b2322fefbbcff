//! Xray outbound document for import into client applications.

use crate::descriptor::{ConnectionRecord, FINGERPRINT, FLOW, SECURITY, STREAM_NETWORK};
use serde::{Deserialize, Serialize};

pub const DOWNLOAD_FILE_NAME: &str = "xreality-client.json";

const NO_ENCRYPTION: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	pub outbounds: Vec<Outbound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outbound {
	pub protocol: String,
	pub settings: OutboundSettings,
	pub stream_settings: StreamSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSettings {
	pub vnext: Vec<Upstream>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
	pub address: String,
	pub port: u16,
	pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: String,
	pub encryption: String,
	pub flow: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
	pub network: String,
	pub security: String,
	pub reality_settings: RealitySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealitySettings {
	pub server_name: String,
	pub fingerprint: String,
	pub password: String,
	pub short_id: String,
	pub spider_x: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mldsa65_verify: Option<String>,
}

pub fn build(record: &ConnectionRecord) -> ClientConfig {
	let pq = record.post_quantum.as_ref();

	let encryption = pq
		.map(|pq| pq.encryption_suite.as_str())
		.filter(|suite| !suite.is_empty())
		.unwrap_or(NO_ENCRYPTION);
	let mldsa65_verify = pq.map(|pq| pq.signature_verify.clone()).filter(|sig| !sig.is_empty());

	ClientConfig {
		outbounds: vec![Outbound {
			protocol: "vless".to_string(),
			settings: OutboundSettings {
				vnext: vec![Upstream {
					address: record.address.clone(),
					port: record.port,
					users: vec![User {
						id: record.identity.clone(),
						encryption: encryption.to_string(),
						flow: FLOW.to_string(),
					}],
				}],
			},
			stream_settings: StreamSettings {
				network: STREAM_NETWORK.to_string(),
				security: SECURITY.to_string(),
				reality_settings: RealitySettings {
					server_name: record.server_name.clone(),
					fingerprint: FINGERPRINT.to_string(),
					password: record.public_key.clone(),
					short_id: record.short_id.clone(),
					spider_x: "/".to_string(),
					mldsa65_verify,
				},
			},
		}],
	}
}
