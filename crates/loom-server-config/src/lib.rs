// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Loom i18n server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Consistent environment variable naming (`LOOM_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use loom_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Serving {} on {}", config.i18n.default_locale, config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub i18n: I18nConfig,
	pub geoip: Option<GeoIpConfig>,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOOM_SERVER_*`)
/// 2. Config file (`/etc/loom/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` in precedence order and finalize.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let i18n = layer.i18n.unwrap_or_default().finalize();
	let geoip = layer.geoip.and_then(|l| l.finalize());

	validate_config(&i18n)?;

	info!(
		host = %http.host,
		port = http.port,
		default_locale = %i18n.default_locale,
		default_timezone = %i18n.default_timezone,
		domain = %i18n.domain,
		translation_directories = i18n.translation_directories.len(),
		geoip_configured = geoip.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		i18n,
		geoip,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(i18n: &I18nConfig) -> Result<(), ConfigError> {
	if i18n.domain.trim().is_empty() {
		return Err(ConfigError::Validation(
			"LOOM_SERVER_I18N_DOMAIN must not be empty".to_string(),
		));
	}
	if i18n.translation_directories.is_empty() {
		return Err(ConfigError::Validation(
			"at least one translation directory is required".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedSource(Precedence, ServerConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn i18n_layer(locale: &str) -> ServerConfigLayer {
		ServerConfigLayer {
			i18n: Some(I18nConfigLayer {
				default_locale: Some(locale.to_string()),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource(Precedence::Environment, i18n_layer("fr"))),
			Box::new(FixedSource(Precedence::ConfigFile, i18n_layer("de"))),
			Box::new(DefaultsSource),
		])
		.unwrap();
		assert_eq!(config.i18n.default_locale, "fr");
		assert_eq!(config.i18n.default_timezone, "UTC");
	}

	#[test]
	fn test_empty_directory_list_rejected() {
		let layer = ServerConfigLayer {
			i18n: Some(I18nConfigLayer {
				translation_directories: Some(Vec::new()),
				..Default::default()
			}),
			..Default::default()
		};
		let result = load_from_sources(vec![Box::new(FixedSource(Precedence::ConfigFile, layer))]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
				base_url: "http://localhost:9000".to_string(),
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}
}
