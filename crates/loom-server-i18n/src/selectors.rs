// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Selectors used by the server.
//!
//! An explicit `?locale=` or `?tz=` query parameter wins. Otherwise the
//! locale is negotiated from `Accept-Language` against the locales that have
//! catalogs, and the timezone is geolocated when a GeoIP database is loaded.

use std::sync::Arc;

use async_trait::async_trait;
use loom_common_i18n::{
	negotiate_locale, select_locale_by_request, GeoTimezoneSelector, Locale, LocaleSelector,
	RequestHandle, SelectorResult, Timezone, TimezoneSelector,
};
use loom_server_geoip::GeoIpService;

pub const LOCALE_QUERY_PARAM: &str = "locale";
pub const TIMEZONE_QUERY_PARAM: &str = "tz";

#[derive(Debug, Clone, Default)]
pub struct RequestLocaleSelector {
	supported: Vec<Locale>,
}

impl RequestLocaleSelector {
	/// With no supported locales the client's first valid preference is used.
	pub fn new(supported: Vec<Locale>) -> Self {
		Self { supported }
	}

	pub fn supported(&self) -> &[Locale] {
		&self.supported
	}
}

#[async_trait]
impl LocaleSelector for RequestLocaleSelector {
	async fn select_locale(&self, request: &RequestHandle) -> SelectorResult {
		if let Some(explicit) = request
			.query_param(LOCALE_QUERY_PARAM)
			.and_then(|value| Locale::parse(&value).ok())
		{
			return Ok(Some(explicit.to_string()));
		}

		let negotiated = if self.supported.is_empty() {
			select_locale_by_request(request)
		} else {
			negotiate_locale(request, &self.supported)
		};
		Ok(negotiated.map(|locale| locale.to_string()))
	}
}

#[derive(Default)]
pub struct RequestTimezoneSelector {
	geo: Option<GeoTimezoneSelector<GeoIpService>>,
}

impl RequestTimezoneSelector {
	pub fn new(geoip: Option<Arc<GeoIpService>>) -> Self {
		Self {
			geo: geoip.map(GeoTimezoneSelector::new),
		}
	}

	pub fn has_geoip(&self) -> bool {
		self.geo.is_some()
	}
}

#[async_trait]
impl TimezoneSelector for RequestTimezoneSelector {
	async fn select_timezone(&self, request: &RequestHandle) -> SelectorResult {
		if let Some(explicit) = request
			.query_param(TIMEZONE_QUERY_PARAM)
			.and_then(|value| Timezone::parse(&value).ok())
		{
			return Ok(Some(explicit.name().to_string()));
		}

		match &self.geo {
			Some(geo) => geo.select_timezone(request).await,
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::http::header::ACCEPT_LANGUAGE;

	fn locales(tags: &[&str]) -> Vec<Locale> {
		tags.iter().map(|t| Locale::parse(t).unwrap()).collect()
	}

	#[tokio::test]
	async fn test_query_param_overrides_header() {
		let selector = RequestLocaleSelector::new(locales(&["de", "fr"]));
		let request = RequestHandle::new()
			.with_uri("/?locale=fr".parse().unwrap())
			.with_header(ACCEPT_LANGUAGE, "de");
		assert_eq!(
			selector.select_locale(&request).await.unwrap(),
			Some("fr".to_string())
		);
	}

	#[tokio::test]
	async fn test_invalid_query_param_is_ignored() {
		let selector = RequestLocaleSelector::new(locales(&["de"]));
		let request = RequestHandle::new()
			.with_uri("/?locale=!!".parse().unwrap())
			.with_header(ACCEPT_LANGUAGE, "de-AT, en;q=0.5");
		assert_eq!(
			selector.select_locale(&request).await.unwrap(),
			Some("de".to_string())
		);
	}

	#[tokio::test]
	async fn test_unsupported_preference_yields_none() {
		let selector = RequestLocaleSelector::new(locales(&["de"]));
		let request = RequestHandle::new().with_header(ACCEPT_LANGUAGE, "ja");
		assert_eq!(selector.select_locale(&request).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_no_supported_list_uses_first_preference() {
		let selector = RequestLocaleSelector::default();
		let request = RequestHandle::new().with_header(ACCEPT_LANGUAGE, "ja;q=0.4, pt-BR");
		assert_eq!(
			selector.select_locale(&request).await.unwrap(),
			Some("pt_BR".to_string())
		);
	}

	#[tokio::test]
	async fn test_timezone_from_query() {
		let selector = RequestTimezoneSelector::new(None);
		let request = RequestHandle::new().with_uri("/?tz=Europe/Vienna".parse().unwrap());
		assert_eq!(
			selector.select_timezone(&request).await.unwrap(),
			Some("Europe/Vienna".to_string())
		);
	}

	#[tokio::test]
	async fn test_percent_encoded_query_values() {
		let request = RequestHandle::new()
			.with_uri("/?tz=America%2FNew_York&locale=de%2DDE".parse().unwrap());
		assert_eq!(
			RequestTimezoneSelector::new(None)
				.select_timezone(&request)
				.await
				.unwrap(),
			Some("America/New_York".to_string())
		);
		assert_eq!(
			RequestLocaleSelector::default()
				.select_locale(&request)
				.await
				.unwrap(),
			Some("de_DE".to_string())
		);
	}

	#[tokio::test]
	async fn test_timezone_without_geoip_is_none() {
		let selector = RequestTimezoneSelector::new(None);
		assert!(!selector.has_geoip());
		let request = RequestHandle::new().with_uri("/?tz=Mars/Olympus".parse().unwrap());
		assert_eq!(selector.select_timezone(&request).await.unwrap(), None);
	}
}
