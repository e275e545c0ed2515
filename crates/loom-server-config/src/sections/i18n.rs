// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization configuration section.
//!
//! Values are kept as strings here; they are parsed and validated when the
//! i18n engine is built.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_DOMAIN: &str = "messages";
pub const DEFAULT_TRANSLATION_DIRECTORY: &str = "translations";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct I18nConfigLayer {
	pub default_locale: Option<String>,
	pub default_timezone: Option<String>,
	pub domain: Option<String>,
	pub translation_directories: Option<Vec<String>>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
		if other.default_timezone.is_some() {
			self.default_timezone = other.default_timezone;
		}
		if other.domain.is_some() {
			self.domain = other.domain;
		}
		if other.translation_directories.is_some() {
			self.translation_directories = other.translation_directories;
		}
	}

	pub fn finalize(self) -> I18nConfig {
		I18nConfig {
			default_locale: self
				.default_locale
				.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
			default_timezone: self
				.default_timezone
				.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
			domain: self.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
			translation_directories: self
				.translation_directories
				.map(|dirs| dirs.into_iter().map(PathBuf::from).collect())
				.unwrap_or_else(|| vec![PathBuf::from(DEFAULT_TRANSLATION_DIRECTORY)]),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
	pub default_locale: String,
	pub default_timezone: String,
	pub domain: String,
	/// Searched in order; the first directory holding a catalog wins.
	pub translation_directories: Vec<PathBuf>,
}

impl Default for I18nConfig {
	fn default() -> Self {
		I18nConfigLayer::default().finalize()
	}
}

/// Split a comma-separated directory list, dropping empty entries.
pub fn parse_directory_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}
