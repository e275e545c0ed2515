// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GeoIP timezone lookup for Loom.
//!
//! Resolves client addresses to IANA timezone names using a MaxMind
//! GeoLite2/GeoIP2 City database. The database path is configured via
//! `LOOM_SERVER_GEOIP_DATABASE_PATH`.
//!
//! # Usage
//!
//! ```ignore
//! use loom_server_geoip::GeoIpService;
//!
//! let service = GeoIpService::new("/var/lib/geoip/GeoLite2-City.mmdb")?;
//! let location = service.lookup("81.2.69.142".parse()?)?;
//! println!("Timezone: {:?}", location.timezone);
//! ```

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use loom_common_i18n::TimezoneLookup;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum GeoIpError {
	#[error("GeoIP database not found at path: {0}")]
	DatabaseNotFound(String),

	#[error("Failed to open GeoIP database: {0}")]
	DatabaseOpen(#[source] MaxMindDBError),

	#[error("Failed to lookup IP address: {0}")]
	Lookup(#[source] MaxMindDBError),
}

pub type Result<T> = std::result::Result<T, GeoIpError>;

/// The parts of a City record used for localization.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GeoLocation {
	pub country_code: Option<String>,
	pub city: Option<String>,
	pub timezone: Option<String>,
}

pub struct GeoIpService {
	reader: Arc<Reader<Vec<u8>>>,
	database_path: String,
}

impl std::fmt::Debug for GeoIpService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeoIpService")
			.field("database_path", &self.database_path)
			.finish()
	}
}

impl GeoIpService {
	#[tracing::instrument(level = "info", skip(database_path), fields(path))]
	pub fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
		let path = database_path.as_ref();
		let path_str = path.display().to_string();
		tracing::Span::current().record("path", &path_str);

		if !path.exists() {
			return Err(GeoIpError::DatabaseNotFound(path_str));
		}

		let reader = Reader::open_readfile(path).map_err(GeoIpError::DatabaseOpen)?;

		tracing::info!(database_type = %reader.metadata.database_type, "GeoIP database loaded");

		Ok(Self {
			reader: Arc::new(reader),
			database_path: path_str,
		})
	}

	pub fn database_path(&self) -> &str {
		&self.database_path
	}

	#[tracing::instrument(level = "trace", skip(self), fields(ip = %ip))]
	pub fn lookup(&self, ip: IpAddr) -> Result<GeoLocation> {
		let city: geoip2::City = self.reader.lookup(ip).map_err(GeoIpError::Lookup)?;

		Ok(GeoLocation {
			country_code: city
				.country
				.as_ref()
				.and_then(|c| c.iso_code)
				.map(String::from),
			city: city
				.city
				.and_then(|c| c.names)
				.and_then(|n| n.get("en").copied())
				.map(String::from),
			timezone: city
				.location
				.as_ref()
				.and_then(|l| l.time_zone)
				.map(String::from),
		})
	}

	/// The timezone recorded for `ip`, or `None` if the address is unknown
	/// or has no timezone.
	pub fn lookup_timezone(&self, ip: IpAddr) -> Result<Option<String>> {
		match self.lookup(ip) {
			Ok(location) => Ok(location.timezone),
			Err(GeoIpError::Lookup(MaxMindDBError::AddressNotFoundError(_))) => Ok(None),
			Err(e) => Err(e),
		}
	}
}

#[async_trait]
impl TimezoneLookup for GeoIpService {
	async fn timezone_for(&self, ip: IpAddr) -> Option<String> {
		match self.lookup_timezone(ip) {
			Ok(timezone) => timezone,
			Err(e) => {
				tracing::warn!(%ip, error = %e, "GeoIP timezone lookup failed");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_database_not_found() {
		let result = GeoIpService::new("/nonexistent/path/to/database.mmdb");
		assert!(matches!(result, Err(GeoIpError::DatabaseNotFound(_))));
	}

	#[test]
	fn test_corrupt_database_fails_to_open() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"this is not a maxmind database").unwrap();
		let result = GeoIpService::new(file.path());
		assert!(matches!(result, Err(GeoIpError::DatabaseOpen(_))));
	}

	#[test]
	fn test_geo_location_default_is_empty() {
		let location = GeoLocation::default();
		assert!(location.timezone.is_none());
		assert!(location.country_code.is_none());
	}
}
