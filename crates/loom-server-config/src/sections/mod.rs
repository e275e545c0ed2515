// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod geoip;
pub mod http;
pub mod i18n;
pub mod logging;

pub use geoip::{GeoIpConfig, GeoIpConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use i18n::{parse_directory_list, I18nConfig, I18nConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
