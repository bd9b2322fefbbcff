use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Clone, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
	/// Use JSON formatting for tracing
	#[arg(long, env = "LOG_JSON", default_value = "false")]
	pub log_json: bool,

	/// Log level
	#[arg(long, env = "RUST_LOG")]
	pub rust_log: Option<String>,

	/// Probe a running panel's /health endpoint and exit
	#[arg(long)]
	pub health_check: bool,

	/// Server host
	#[arg(long, env = "PANEL_HOST", default_value = "0.0.0.0")]
	pub host: String,

	/// Server port
	#[arg(long, env = "PANEL_PORT", default_value = "3000")]
	pub port: u16,

	/// Basic auth password for the `admin` user, empty disables auth
	#[arg(long, env = "PANEL_PASSWORD")]
	pub password: Option<String>,

	/// Directory the proxy container writes its credentials into
	#[arg(long, env = "CONFIG_DIR", default_value = "/data")]
	pub config_dir: PathBuf,

	/// Static external address, skips IP lookup providers when set
	#[arg(long, env = "SERVER_IP")]
	pub server_ip: Option<String>,

	/// Dashboard assets
	#[arg(long, env = "PANEL_STATIC_DIR", default_value = "public")]
	pub static_dir: PathBuf,

	/// Xray core version reported by /api/status
	#[arg(long, env = "XRAY_VERSION", default_value = "26.2.6")]
	pub core_version: String,

	/// Per-provider IP lookup timeout in milliseconds
	#[arg(long, env = "IP_LOOKUP_TIMEOUT_MS", default_value = "5000")]
	pub provider_timeout_ms: u64,

	/// Request timeout in milliseconds
	#[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "15000")]
	pub request_timeout_ms: u64,

	/// Maximum concurrent requests before load shedding kicks in
	#[arg(long, env = "MAX_CONCURRENT_REQUESTS", default_value = "64")]
	pub max_concurrent_req: usize,
}

impl Config {
	/// Configured password, `None` when unset or blank.
	pub fn password(&self) -> Option<&str> {
		non_blank(self.password.as_deref())
	}

	pub fn override_address(&self) -> Option<&str> {
		non_blank(self.server_ip.as_deref())
	}

	pub const fn provider_timeout(&self) -> Duration {
		Duration::from_millis(self.provider_timeout_ms)
	}

	pub const fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_blank_values_count_as_unset() {
		let config = Config::parse_from(["reality_panel", "--password", "  ", "--server-ip", ""]);

		assert_eq!(config.password(), None);
		assert_eq!(config.override_address(), None);
	}

	#[test]
	fn test_explicit_values_are_trimmed() {
		let config = Config::parse_from(["reality_panel", "--password", "hunter2", "--server-ip", " 203.0.113.7 "]);

		assert_eq!(config.password(), Some("hunter2"));
		assert_eq!(config.override_address(), Some("203.0.113.7"));
	}
}
