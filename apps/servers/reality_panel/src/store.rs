//! Directory-backed key-value store the proxy container writes its
//! credentials into. One file per key, values are trimmed on read.

use std::io;
use std::path::PathBuf;

/// Named values written by the credential-issuing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
	Uuid,
	PublicKey,
	Sni,
	ShortId,
	EnablePq,
	Mldsa65Verify,
	VlessEncryption,
	Port,
}

impl ConfigKey {
	pub const fn file_name(self) -> &'static str {
		match self {
			Self::Uuid => "uuid",
			Self::PublicKey => "public_key",
			Self::Sni => "sni",
			Self::ShortId => "short_id",
			Self::EnablePq => "enable_pq",
			Self::Mldsa65Verify => "mldsa65_verify",
			Self::VlessEncryption => "vlessenc_encryption",
			Self::Port => "port",
		}
	}
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
	root: PathBuf,
}

impl ConfigStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Reads `key` from disk on every call.
	///
	/// `None` means the value is missing or unreadable. A file that exists but
	/// holds only whitespace yields `Some("")`, callers decide whether that
	/// counts as set.
	pub async fn read(&self, key: ConfigKey) -> Option<String> {
		self.read_named(key.file_name()).await
	}

	pub async fn read_named(&self, name: &str) -> Option<String> {
		match tokio::fs::read_to_string(self.root.join(name)).await {
			Ok(value) => Some(value.trim().to_string()),
			Err(e) => {
				tracing::trace!(name, error = %e, "config value unavailable");
				None
			}
		}
	}

	/// Like [`ConfigStore::read`] but treats an empty value as absent.
	pub async fn read_filled(&self, key: ConfigKey) -> Option<String> {
		self.read(key).await.filter(|value| !value.is_empty())
	}

	pub async fn remove(&self, name: &str) -> io::Result<()> {
		tokio::fs::remove_file(self.root.join(name)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn store_with(entries: &[(&str, &str)]) -> (TempDir, ConfigStore) {
		let dir = tempfile::tempdir().unwrap();
		for (name, value) in entries {
			std::fs::write(dir.path().join(name), value).unwrap();
		}
		let store = ConfigStore::new(dir.path());
		(dir, store)
	}

	#[tokio::test]
	async fn test_read_trims_surrounding_whitespace() {
		let (_dir, store) = store_with(&[("uuid", "  abc-123\n")]);

		assert_eq!(store.read(ConfigKey::Uuid).await.as_deref(), Some("abc-123"));
	}

	#[tokio::test]
	async fn test_missing_key_is_none() {
		let (_dir, store) = store_with(&[]);

		assert_eq!(store.read(ConfigKey::PublicKey).await, None);
	}

	#[tokio::test]
	async fn test_empty_value_is_distinct_from_missing() {
		let (_dir, store) = store_with(&[("sni", "\n")]);

		assert_eq!(store.read(ConfigKey::Sni).await.as_deref(), Some(""));
		assert_eq!(store.read_filled(ConfigKey::Sni).await, None);
	}

	#[tokio::test]
	async fn test_reads_observe_external_writes() {
		let (dir, store) = store_with(&[("port", "443")]);
		assert_eq!(store.read(ConfigKey::Port).await.as_deref(), Some("443"));

		std::fs::write(dir.path().join("port"), "8443").unwrap();

		assert_eq!(store.read(ConfigKey::Port).await.as_deref(), Some("8443"));
	}

	#[tokio::test]
	async fn test_remove_reports_not_found() {
		let (_dir, store) = store_with(&[(".lockfile", "")]);

		assert!(store.remove(".lockfile").await.is_ok());
		let err = store.remove(".lockfile").await.unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}
}
