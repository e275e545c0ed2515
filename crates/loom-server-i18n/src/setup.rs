// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use loom_common_i18n::{CatalogSource, I18n, Locale, Result};
use loom_server_config::{GeoIpConfig, I18nConfig};
use loom_server_geoip::GeoIpService;

use crate::selectors::{RequestLocaleSelector, RequestTimezoneSelector};

/// Open the configured GeoIP database. Failures are logged and the server
/// runs without geolocation.
pub fn open_geoip(config: Option<&GeoIpConfig>) -> Option<Arc<GeoIpService>> {
	let config = config?;
	match GeoIpService::new(&config.database_path) {
		Ok(service) => Some(Arc::new(service)),
		Err(e) => {
			tracing::warn!(
				path = %config.database_path.display(),
				error = %e,
				"GeoIP database unavailable, timezones will use the default"
			);
			None
		}
	}
}

/// Build the process-wide i18n state from configuration.
#[tracing::instrument(skip_all, fields(domain = %config.domain))]
pub fn build_i18n(config: &I18nConfig, geoip: Option<Arc<GeoIpService>>) -> Result<I18n> {
	let mut supported = CatalogSource::new(&config.domain, config.translation_directories.clone())
		.available_locales();
	let default_locale = Locale::parse(&config.default_locale)?;
	if !supported.contains(&default_locale) {
		supported.push(default_locale);
	}

	tracing::info!(
		locales = ?supported.iter().map(Locale::as_str).collect::<Vec<_>>(),
		geoip = geoip.is_some(),
		"configuring i18n"
	);

	I18n::builder()
		.default_locale(&config.default_locale)
		.default_timezone(&config.default_timezone)
		.default_domain(&config.domain)
		.translation_directories(config.translation_directories.iter())
		.locale_selector(RequestLocaleSelector::new(supported))
		.timezone_selector(RequestTimezoneSelector::new(geoip))
		.build()
}
