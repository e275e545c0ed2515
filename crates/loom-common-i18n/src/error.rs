// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for locale resolution and translation.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::format::FormatError;

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Boxed error returned by user-supplied selectors.
pub type SelectorError = Box<dyn std::error::Error + Send + Sync>;

/// Which selector produced a [`I18nError::Selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
	Locale,
	Timezone,
}

impl fmt::Display for SelectorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SelectorKind::Locale => f.write_str("locale"),
			SelectorKind::Timezone => f.write_str("timezone"),
		}
	}
}

/// Errors that can occur while resolving locales or translating messages.
///
/// A missing translation is deliberately not represented here: lookups fall
/// back to the source string.
#[derive(Debug, Error)]
pub enum I18nError {
	#[error("invalid locale identifier: {0:?}")]
	InvalidLocale(String),

	#[error("invalid timezone: {0:?}")]
	InvalidTimezone(String),

	#[error("invalid currency code: {0:?}")]
	InvalidCurrency(String),

	#[error("invalid date pattern: {0:?}")]
	InvalidDatePattern(String),

	#[error("failed to parse catalog {path}: {source}")]
	CatalogParse {
		path: PathBuf,
		#[source]
		source: gettext::Error,
	},

	#[error("failed to read catalog {path}: {source}")]
	CatalogRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("{kind} selector failed: {source}")]
	Selector {
		kind: SelectorKind,
		#[source]
		source: SelectorError,
	},

	#[error("failed to format message {message:?}: {source}")]
	Format {
		message: String,
		#[source]
		source: FormatError,
	},

	#[error("no i18n request context is active")]
	NoRequestContext,

	#[error("local time {time} does not exist in timezone {timezone}")]
	NonexistentLocalTime {
		time: NaiveDateTime,
		timezone: String,
	},

	#[error("duplicate translation domain: {0}")]
	DuplicateDomain(String),
}

impl I18nError {
	/// Returns true if this error was raised by a user-supplied selector.
	pub fn is_selector_error(&self) -> bool {
		matches!(self, I18nError::Selector { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_selector_error_display() {
		let err = I18nError::Selector {
			kind: SelectorKind::Locale,
			source: "database unavailable".into(),
		};
		assert_eq!(
			err.to_string(),
			"locale selector failed: database unavailable"
		);
		assert!(err.is_selector_error());
	}

	#[test]
	fn test_invalid_locale_display() {
		let err = I18nError::InvalidLocale("!!".to_string());
		assert_eq!(err.to_string(), "invalid locale identifier: \"!!\"");
		assert!(!err.is_selector_error());
	}

	#[test]
	fn test_selector_error_has_source() {
		use std::error::Error as _;

		let err = I18nError::Selector {
			kind: SelectorKind::Timezone,
			source: "boom".into(),
		};
		assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
	}
}
