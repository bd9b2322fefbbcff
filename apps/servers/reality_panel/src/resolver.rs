//! External address resolution: static override, then a time-bounded cache,
//! then an ordered chain of IP echo providers.

use crate::Config;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::instrument;

/// Cached lookups are served for 5 minutes.
pub const CACHE_TTL_MILLIS: u64 = 300_000;

pub const UNKNOWN_ADDRESS: &str = "UNKNOWN";

pub const DEFAULT_PROVIDERS: [&str; 3] = ["https://ifconfig.me/ip", "https://icanhazip.com", "https://api.ipify.org"];

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("provider returned an empty body")]
	EmptyBody,

	#[error("provider did not answer within {0:?}")]
	Timeout(Duration),
}

/// A single address-echo service.
#[async_trait]
pub trait AddressProvider: Send + Sync {
	fn name(&self) -> &str;

	async fn lookup(&self) -> Result<String, LookupError>;
}

pub trait Clock: Send + Sync {
	fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_millis(&self) -> u64 {
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
	}
}

/// Plain-text IP echo endpoint such as `https://api.ipify.org`.
pub struct HttpProvider {
	url: String,
	client: reqwest::Client,
}

impl HttpProvider {
	pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
		Self { url: url.into(), client }
	}
}

#[async_trait]
impl AddressProvider for HttpProvider {
	fn name(&self) -> &str {
		&self.url
	}

	async fn lookup(&self) -> Result<String, LookupError> {
		let body = self
			.client
			.get(&self.url)
			.header(ACCEPT, "text/plain")
			.header(USER_AGENT, "curl/8.0")
			.send()
			.await?
			.error_for_status()?
			.text()
			.await?;

		let address = body.trim();
		if address.is_empty() {
			return Err(LookupError::EmptyBody);
		}
		Ok(address.to_string())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCache {
	pub value: String,
	pub fetched_at_millis: u64,
}

impl AddressCache {
	/// An entry stamped after `now_millis` means the clock stepped back; treat it as stale.
	pub const fn is_fresh(&self, now_millis: u64) -> bool {
		match now_millis.checked_sub(self.fetched_at_millis) {
			Some(age) => age < CACHE_TTL_MILLIS,
			None => false,
		}
	}
}

pub struct AddressResolver {
	override_address: Option<String>,
	providers: Vec<Arc<dyn AddressProvider>>,
	attempt_timeout: Duration,
	clock: Arc<dyn Clock>,
	cache: RwLock<Option<AddressCache>>,
}

impl AddressResolver {
	pub fn new(providers: Vec<Arc<dyn AddressProvider>>) -> Self {
		Self {
			override_address: None,
			providers,
			attempt_timeout: Duration::from_secs(5),
			clock: Arc::new(SystemClock),
			cache: RwLock::new(None),
		}
	}

	/// Resolver wired to the public provider chain, honouring `SERVER_IP`.
	pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
		let client = reqwest::Client::builder().timeout(config.provider_timeout()).build()?;
		let providers = DEFAULT_PROVIDERS
			.iter()
			.map(|url| Arc::new(HttpProvider::new(*url, client.clone())) as Arc<dyn AddressProvider>)
			.collect();

		Ok(Self::with_config(config, providers))
	}

	pub fn with_config(config: &Config, providers: Vec<Arc<dyn AddressProvider>>) -> Self {
		Self::new(providers)
			.with_override(config.override_address().map(str::to_string))
			.with_attempt_timeout(config.provider_timeout())
	}

	#[must_use]
	pub fn with_override(mut self, address: Option<String>) -> Self {
		self.override_address = address;
		self
	}

	#[must_use]
	pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
		self.attempt_timeout = timeout;
		self
	}

	#[must_use]
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Never fails: falls back to [`UNKNOWN_ADDRESS`] when every provider is down.
	/// Failures are not cached, so the next call walks the chain again.
	#[instrument(name = "resolve_address", skip(self))]
	pub async fn resolve(&self) -> String {
		if let Some(address) = &self.override_address {
			return address.clone();
		}

		let now = self.clock.now_millis();
		let cached = self.cache.read().await.clone();
		if let Some(entry) = cached.filter(|entry| entry.is_fresh(now)) {
			tracing::trace!(address = %entry.value, "address cache hit");
			return entry.value;
		}

		for provider in &self.providers {
			let attempt = tokio::time::timeout(self.attempt_timeout, provider.lookup())
				.await
				.unwrap_or_else(|_| Err(LookupError::Timeout(self.attempt_timeout)));

			match attempt {
				Ok(address) => {
					tracing::debug!(provider = provider.name(), %address, "resolved external address");
					// Concurrent misses may each land here; last write wins.
					*self.cache.write().await = Some(AddressCache {
						value: address.clone(),
						fetched_at_millis: self.clock.now_millis(),
					});
					return address;
				}
				Err(e) => tracing::warn!(provider = provider.name(), error = %e, "address lookup failed"),
			}
		}

		tracing::warn!("all address providers failed");
		UNKNOWN_ADDRESS.to_string()
	}

	pub async fn invalidate(&self) {
		*self.cache.write().await = None;
	}

	pub async fn cached(&self) -> Option<AddressCache> {
		self.cache.read().await.clone()
	}
}
