use crate::Config;
use anyhow::{bail, Result};
use std::time::Duration;

/// Container healthcheck: probes the local panel's `/health` endpoint.
pub async fn perform_health_check(config: &Config) -> Result<()> {
	let url = format!("http://127.0.0.1:{}/health", config.port);

	let response = reqwest::Client::new().get(&url).timeout(Duration::from_secs(10)).send().await?;
	if !response.status().is_success() {
		bail!("Health check failed: HTTP {}", response.status());
	}

	println!("Health check passed");
	Ok(())
}
