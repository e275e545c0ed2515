// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loom i18n HTTP server.
//!
//! Wires [`loom_common_i18n`] into Axum: every request gets its own
//! [`loom_common_i18n::RequestI18n`] through [`i18n_layer`], with locales
//! negotiated from `Accept-Language` and timezones from the client address
//! when a GeoIP database is configured.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod selectors;
pub mod setup;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use loom_common_i18n::I18n;

pub use error::{ErrorResponse, ServerI18nError};
pub use middleware::{i18n_layer, I18nContext};
pub use selectors::{RequestLocaleSelector, RequestTimezoneSelector};
pub use setup::{build_i18n, open_geoip};

pub fn create_router(i18n: Arc<I18n>) -> Router {
	Router::new()
		.route("/locale", get(routes::get_locale_info))
		.route("/hello", get(routes::get_hello))
		.route("/apples", get(routes::get_apples))
		.route("/time", get(routes::get_time))
		.layer(from_fn_with_state(i18n, i18n_layer))
}
