use axum::extract::FromRef;
use std::sync::Arc;

pub mod auth;
pub mod client_config;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod handlers;
pub mod health;
pub mod qr;
pub mod regenerate;
pub mod resolver;
pub mod routes;
pub mod share_link;
pub mod store;

pub use config::*;
pub use descriptor::{ConnectionDescriptorBuilder, ConnectionRecord, PanelStatus, PostQuantum};
pub use error::PanelError;
pub use health::perform_health_check;
pub use regenerate::{Regeneration, RegenerationController, RegenerationResponse};
pub use resolver::{AddressProvider, AddressResolver, Clock};
pub use routes::app;
pub use store::{ConfigKey, ConfigStore};

#[derive(Clone)]
pub struct AppState {
	pub config: Arc<Config>,
	pub descriptors: Arc<ConnectionDescriptorBuilder>,
	pub regeneration: Arc<RegenerationController>,
}

impl AppState {
	/// Production wiring: public IP echo providers behind `SERVER_IP`.
	pub fn build(config: Arc<Config>) -> anyhow::Result<Self> {
		let resolver = AddressResolver::from_config(&config)?;
		Ok(Self::with_resolver(config, resolver))
	}

	/// Shares one store and one resolver between the descriptor builder and
	/// the regeneration controller so regeneration can drop the address cache.
	pub fn with_resolver(config: Arc<Config>, resolver: AddressResolver) -> Self {
		let store = Arc::new(ConfigStore::new(config.config_dir.clone()));
		let resolver = Arc::new(resolver);

		Self {
			descriptors: Arc::new(ConnectionDescriptorBuilder::new(store.clone(), resolver.clone())),
			regeneration: Arc::new(RegenerationController::new(store, resolver)),
			config,
		}
	}
}

impl FromRef<AppState> for Arc<Config> {
	fn from_ref(state: &AppState) -> Self {
		state.config.clone()
	}
}

impl FromRef<AppState> for Arc<ConnectionDescriptorBuilder> {
	fn from_ref(state: &AppState) -> Self {
		state.descriptors.clone()
	}
}

impl FromRef<AppState> for Arc<RegenerationController> {
	fn from_ref(state: &AppState) -> Self {
		state.regeneration.clone()
	}
}
