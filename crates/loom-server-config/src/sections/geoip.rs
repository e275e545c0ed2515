// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GeoIP configuration section.
//!
//! When a database is configured the server resolves request timezones from
//! the client address.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoIpConfigLayer {
	pub database_path: Option<String>,
}

impl GeoIpConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.database_path.is_some() {
			self.database_path = other.database_path;
		}
	}

	/// `None` unless a database path was configured.
	pub fn finalize(self) -> Option<GeoIpConfig> {
		self.database_path.map(|path| GeoIpConfig {
			database_path: PathBuf::from(path),
		})
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoIpConfig {
	pub database_path: PathBuf,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_finalize_none_when_no_path() {
		assert!(GeoIpConfigLayer::default().finalize().is_none());
	}

	#[test]
	fn test_finalize_some_when_path_set() {
		let config = GeoIpConfigLayer {
			database_path: Some("/var/lib/geoip/GeoLite2-City.mmdb".to_string()),
		}
		.finalize()
		.unwrap();
		assert_eq!(
			config.database_path,
			PathBuf::from("/var/lib/geoip/GeoLite2-City.mmdb")
		);
	}

	#[test]
	fn test_merge_preserves_base_when_none() {
		let mut base = GeoIpConfigLayer {
			database_path: Some("/old/path.mmdb".to_string()),
		};
		base.merge(GeoIpConfigLayer::default());
		assert_eq!(base.database_path.as_deref(), Some("/old/path.mmdb"));
	}

	#[test]
	fn test_deserialize_empty() {
		let layer: GeoIpConfigLayer = toml::from_str("").unwrap();
		assert!(layer.database_path.is_none());
	}
}
