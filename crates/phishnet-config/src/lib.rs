// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use phishnet::{PhishNetClient, PhishNetClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Minimum spacing between requests, in milliseconds.
    pub query_rate_ms: u64,
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            query_rate_ms: phishnet::DEFAULT_QUERY_RATE.as_millis() as u64,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn query_rate(&self) -> Duration {
        Duration::from_millis(self.query_rate_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Client builder carrying these settings. Fails when no API key is set.
    pub fn builder(&self) -> Result<PhishNetClientBuilder> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("client.api_key is not configured"))?;

        let mut builder = PhishNetClient::builder(api_key).query_rate(self.query_rate());
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    pub fn build_client(&self) -> Result<PhishNetClient> {
        Ok(self.builder()?.build()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PhishNetConfig {
    pub client: ClientConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: PHISHNET_).
pub fn load(config_path: Option<&Path>) -> Result<PhishNetConfig> {
    let mut figment = Figment::from(Serialized::defaults(PhishNetConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("PHISHNET_").split("__"));

    let config: PhishNetConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}

/// Install a global fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(telemetry: &TelemetryConfig) -> Result<()> {
    let fmt_layer = fmt::layer().with_target(true).with_level(true);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&telemetry.log_level)?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
