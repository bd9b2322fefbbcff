//! Assembles a [`ConnectionRecord`] from the credential store and the
//! resolved external address. Records are rebuilt on every request.

use crate::resolver::AddressResolver;
use crate::store::{ConfigKey, ConfigStore};
use crate::PanelError;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

pub const DEFAULT_PORT: u16 = 443;
pub const UNSET: &str = "unknown";

pub const FLOW: &str = "xtls-rprx-vision";
pub const NETWORK: &str = "tcp";
/// Xray's name for plain TCP in stream settings.
pub const STREAM_NETWORK: &str = "raw";
pub const SECURITY: &str = "reality";
pub const FINGERPRINT: &str = "chrome";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuantum {
	pub signature_verify: String,
	pub encryption_suite: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
	pub address: String,
	pub port: u16,
	pub identity: String,
	pub public_key: String,
	pub server_name: String,
	pub short_id: String,
	pub post_quantum: Option<PostQuantum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelStatus {
	pub initialized: bool,
	pub pq_enabled: bool,
	pub sni: String,
	pub short_id: String,
	pub version: String,
}

/// Leading decimal digits of `raw` as a port, [`DEFAULT_PORT`] when there are
/// none or they fall outside 1..=65535.
pub fn parse_port(raw: Option<&str>) -> u16 {
	let digits = raw.map_or("", |value| {
		let value = value.trim();
		let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
		&value[..end]
	});

	digits.parse::<u16>().ok().filter(|port| *port != 0).unwrap_or(DEFAULT_PORT)
}

fn pq_enabled(flag: Option<&str>) -> bool {
	flag == Some("true")
}

fn or_unset(value: Option<String>) -> String {
	value.unwrap_or_else(|| UNSET.to_string())
}

pub struct ConnectionDescriptorBuilder {
	store: Arc<ConfigStore>,
	resolver: Arc<AddressResolver>,
}

impl ConnectionDescriptorBuilder {
	pub const fn new(store: Arc<ConfigStore>, resolver: Arc<AddressResolver>) -> Self {
		Self { store, resolver }
	}

	/// Fails with [`PanelError::NotInitialized`] only when the client UUID is
	/// missing, every other field falls back to a default.
	#[instrument(name = "build_connection_record", skip(self))]
	pub async fn build(&self) -> Result<ConnectionRecord, PanelError> {
		let store = &self.store;
		let (identity, public_key, sni, short_id, enable_pq, signature_verify, encryption_suite, port, address) = tokio::join!(
			store.read_filled(ConfigKey::Uuid),
			store.read(ConfigKey::PublicKey),
			store.read_filled(ConfigKey::Sni),
			store.read_filled(ConfigKey::ShortId),
			store.read(ConfigKey::EnablePq),
			store.read(ConfigKey::Mldsa65Verify),
			store.read(ConfigKey::VlessEncryption),
			store.read(ConfigKey::Port),
			self.resolver.resolve(),
		);

		let identity = identity.ok_or(PanelError::NotInitialized)?;

		let post_quantum = pq_enabled(enable_pq.as_deref()).then(|| PostQuantum {
			signature_verify: signature_verify.unwrap_or_default(),
			encryption_suite: encryption_suite.unwrap_or_default(),
		});

		Ok(ConnectionRecord {
			address,
			port: parse_port(port.as_deref()),
			identity,
			public_key: public_key.unwrap_or_default(),
			server_name: or_unset(sni),
			short_id: or_unset(short_id),
			post_quantum,
		})
	}

	#[instrument(name = "panel_status", skip(self))]
	pub async fn status(&self, version: &str) -> PanelStatus {
		let store = &self.store;
		let (identity, enable_pq, sni, short_id) = tokio::join!(
			store.read_filled(ConfigKey::Uuid),
			store.read(ConfigKey::EnablePq),
			store.read_filled(ConfigKey::Sni),
			store.read_filled(ConfigKey::ShortId),
		);

		PanelStatus {
			initialized: identity.is_some(),
			pq_enabled: pq_enabled(enable_pq.as_deref()),
			sni: or_unset(sni),
			short_id: or_unset(short_id),
			version: version.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn builder_with(entries: &[(&str, &str)]) -> (TempDir, ConnectionDescriptorBuilder) {
		let dir = tempfile::tempdir().unwrap();
		for (name, value) in entries {
			std::fs::write(dir.path().join(name), value).unwrap();
		}
		let store = Arc::new(ConfigStore::new(dir.path()));
		let resolver = Arc::new(AddressResolver::new(Vec::new()).with_override(Some("1.2.3.4".into())));
		(dir, ConnectionDescriptorBuilder::new(store, resolver))
	}

	#[test]
	fn test_port_coercion() {
		assert_eq!(parse_port(Some("8443")), 8443);
		assert_eq!(parse_port(Some(" 2053\n")), 2053);
		assert_eq!(parse_port(Some("8443abc")), 8443);
		assert_eq!(parse_port(Some("")), DEFAULT_PORT);
		assert_eq!(parse_port(None), DEFAULT_PORT);
		assert_eq!(parse_port(Some("abc")), DEFAULT_PORT);
		assert_eq!(parse_port(Some("0")), DEFAULT_PORT);
		assert_eq!(parse_port(Some("-5")), DEFAULT_PORT);
		assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
	}

	#[tokio::test]
	async fn test_missing_uuid_is_not_initialized() {
		let (_dir, builder) = builder_with(&[("public_key", "PKEY"), ("sni", "example.com")]);

		assert!(matches!(builder.build().await, Err(PanelError::NotInitialized)));
	}

	#[tokio::test]
	async fn test_blank_uuid_is_not_initialized() {
		let (_dir, builder) = builder_with(&[("uuid", "  \n")]);

		assert!(matches!(builder.build().await, Err(PanelError::NotInitialized)));
	}

	#[tokio::test]
	async fn test_only_uuid_falls_back_to_defaults() {
		let (_dir, builder) = builder_with(&[("uuid", "abc-123")]);

		let record = builder.build().await.unwrap();

		assert_eq!(
			record,
			ConnectionRecord {
				address: "1.2.3.4".into(),
				port: DEFAULT_PORT,
				identity: "abc-123".into(),
				public_key: String::new(),
				server_name: UNSET.into(),
				short_id: UNSET.into(),
				post_quantum: None,
			}
		);
	}

	#[tokio::test]
	async fn test_full_record() {
		let (_dir, builder) = builder_with(&[
			("uuid", "abc-123\n"),
			("public_key", "PKEY"),
			("sni", "example.com"),
			("short_id", "ab12"),
			("port", "8443"),
		]);

		let record = builder.build().await.unwrap();

		assert_eq!(record.identity, "abc-123");
		assert_eq!(record.public_key, "PKEY");
		assert_eq!(record.server_name, "example.com");
		assert_eq!(record.short_id, "ab12");
		assert_eq!(record.port, 8443);
	}

	#[tokio::test]
	async fn test_post_quantum_attached_when_enabled() {
		let (_dir, builder) = builder_with(&[("uuid", "abc-123"), ("enable_pq", "true"), ("mldsa65_verify", "SIGV")]);

		let record = builder.build().await.unwrap();

		assert_eq!(
			record.post_quantum,
			Some(PostQuantum {
				signature_verify: "SIGV".into(),
				encryption_suite: String::new(),
			})
		);
	}

	#[tokio::test]
	async fn test_post_quantum_omitted_unless_flag_is_true() {
		for flag in [None, Some("false"), Some("TRUE"), Some("1")] {
			let mut entries = vec![("uuid", "abc-123"), ("mldsa65_verify", "SIGV"), ("vlessenc_encryption", "mlkem768x25519plus")];
			if let Some(flag) = flag {
				entries.push(("enable_pq", flag));
			}
			let (_dir, builder) = builder_with(&entries);

			assert_eq!(builder.build().await.unwrap().post_quantum, None, "enable_pq = {flag:?}");
		}
	}

	#[tokio::test]
	async fn test_status_for_uninitialized_store() {
		let (_dir, builder) = builder_with(&[]);

		let status = builder.status("26.2.6").await;

		assert_eq!(
			status,
			PanelStatus {
				initialized: false,
				pq_enabled: false,
				sni: UNSET.into(),
				short_id: UNSET.into(),
				version: "26.2.6".into(),
			}
		);
	}

	#[tokio::test]
	async fn test_status_reports_pq_and_reality_params() {
		let (_dir, builder) = builder_with(&[("uuid", "abc-123"), ("enable_pq", "true"), ("sni", "example.com"), ("short_id", "ab12")]);

		let status = builder.status("26.2.6").await;

		assert!(status.initialized);
		assert!(status.pq_enabled);
		assert_eq!(status.sni, "example.com");
		assert_eq!(status.short_id, "ab12");
	}
}
