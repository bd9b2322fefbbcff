//! Credential invalidation. Removing the lockfile tells the proxy container
//! to issue fresh keys on its next start; the panel never generates keys.

use crate::resolver::AddressResolver;
use crate::store::ConfigStore;
use crate::PanelError;
use serde::Serialize;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::instrument;

/// Present while the proxy's issued credentials are considered current.
pub const LOCKFILE: &str = ".lockfile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regeneration {
	Unlocked,
	AlreadyUnlocked,
}

impl Regeneration {
	pub const fn message(self) -> &'static str {
		match self {
			Self::Unlocked => "Lockfile removed. Restart the proxy container to generate new keys.",
			Self::AlreadyUnlocked => "Already unlocked. Restart the proxy container.",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegenerationResponse {
	pub success: bool,
	pub message: &'static str,
}

impl From<Regeneration> for RegenerationResponse {
	fn from(outcome: Regeneration) -> Self {
		Self {
			success: true,
			message: outcome.message(),
		}
	}
}

pub struct RegenerationController {
	store: Arc<ConfigStore>,
	resolver: Arc<AddressResolver>,
}

impl RegenerationController {
	pub const fn new(store: Arc<ConfigStore>, resolver: Arc<AddressResolver>) -> Self {
		Self { store, resolver }
	}

	/// Idempotent. The address cache is cleared only after the lockfile is gone.
	#[instrument(name = "regenerate", skip(self))]
	pub async fn regenerate(&self) -> Result<Regeneration, PanelError> {
		match self.store.remove(LOCKFILE).await {
			Ok(()) => {
				self.resolver.invalidate().await;
				tracing::info!("lockfile removed, credentials will be reissued on proxy restart");
				Ok(Regeneration::Unlocked)
			}
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(Regeneration::AlreadyUnlocked),
			Err(e) => Err(PanelError::Persistence { details: e.to_string() }),
		}
	}
}
