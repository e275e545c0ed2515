// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale identifiers.

use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use crate::error::{I18nError, Result};

/// Locale used when configuration does not name one.
pub const DEFAULT_LOCALE: &str = "en";

/// A normalized language/region identifier such as `en` or `de_DE`.
///
/// Equality and hashing use the normalized form, so `de-de`, `de_DE` and
/// `de-DE` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
	normalized: String,
	language: String,
	script: Option<String>,
	region: Option<String>,
}

impl Locale {
	/// Parse a language tag. Both `-` and `_` separators are accepted.
	///
	/// # Example
	///
	/// ```
	/// use loom_common_i18n::Locale;
	///
	/// let locale = Locale::parse("de-de").unwrap();
	/// assert_eq!(locale.as_str(), "de_DE");
	/// assert!(Locale::parse("not-a-real-locale!!").is_err());
	/// ```
	pub fn parse(tag: &str) -> Result<Self> {
		let trimmed = tag.trim();
		if trimmed.is_empty() {
			return Err(I18nError::InvalidLocale(tag.to_string()));
		}

		let langid: LanguageIdentifier = trimmed
			.replace('_', "-")
			.parse()
			.map_err(|_| I18nError::InvalidLocale(tag.to_string()))?;

		let language = langid.language.as_str().to_string();
		if language == "und" {
			return Err(I18nError::InvalidLocale(tag.to_string()));
		}

		let script = langid.script.map(|s| s.as_str().to_string());
		let region = langid.region.map(|r| r.as_str().to_string());

		let mut normalized = language.clone();
		for part in script.iter().chain(region.iter()) {
			normalized.push('_');
			normalized.push_str(part);
		}
		for variant in langid.variants() {
			normalized.push('_');
			normalized.push_str(variant.as_str());
		}

		Ok(Self {
			normalized,
			language,
			script,
			region,
		})
	}

	/// The normalized form, e.g. `zh_Hans_CN`.
	pub fn as_str(&self) -> &str {
		&self.normalized
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	pub fn script(&self) -> Option<&str> {
		self.script.as_deref()
	}

	pub fn region(&self) -> Option<&str> {
		self.region.as_deref()
	}

	/// BCP 47 rendering with `-` separators, suitable for `Content-Language`.
	pub fn to_language_tag(&self) -> String {
		self.normalized.replace('_', "-")
	}

	/// Catalog directory names to try for this locale, most specific first.
	///
	/// `zh_Hans_CN` yields `zh_Hans_CN`, `zh_Hans`, `zh`.
	pub fn candidates(&self) -> Vec<String> {
		let mut out = vec![self.normalized.clone()];
		if let Some(script) = &self.script {
			let with_script = format!("{}_{}", self.language, script);
			if !out.contains(&with_script) {
				out.push(with_script);
			}
		}
		if let Some(region) = &self.region {
			let with_region = format!("{}_{}", self.language, region);
			if !out.contains(&with_region) {
				out.push(with_region);
			}
		}
		if !out.contains(&self.language) {
			out.push(self.language.clone());
		}
		out
	}

	/// Returns true if both locales share a primary language.
	pub fn same_language(&self, other: &Locale) -> bool {
		self.language == other.language
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.normalized)
	}
}

impl FromStr for Locale {
	type Err = I18nError;

	fn from_str(s: &str) -> Result<Self> {
		Locale::parse(s)
	}
}

impl AsRef<str> for Locale {
	fn as_ref(&self) -> &str {
		&self.normalized
	}
}

/// Parse a locale tag, failing with [`I18nError::InvalidLocale`].
pub fn parse_locale(tag: &str) -> Result<Locale> {
	Locale::parse(tag)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_simple_language() {
		let locale = Locale::parse("en").unwrap();
		assert_eq!(locale.as_str(), "en");
		assert_eq!(locale.language(), "en");
		assert!(locale.region().is_none());
	}

	#[test]
	fn test_parse_normalizes_separators_and_case() {
		assert_eq!(Locale::parse("de-de").unwrap().as_str(), "de_DE");
		assert_eq!(Locale::parse("de_DE").unwrap().as_str(), "de_DE");
		assert_eq!(Locale::parse("DE-de").unwrap().as_str(), "de_DE");
		assert_eq!(Locale::parse("fr-CH").unwrap().to_language_tag(), "fr-CH");
	}

	#[test]
	fn test_parse_script() {
		let locale = Locale::parse("zh-hans-cn").unwrap();
		assert_eq!(locale.as_str(), "zh_Hans_CN");
		assert_eq!(locale.script(), Some("Hans"));
		assert_eq!(locale.region(), Some("CN"));
	}

	#[test]
	fn test_equality_by_normalized_form() {
		assert_eq!(
			Locale::parse("en-us").unwrap(),
			Locale::parse("en_US").unwrap()
		);
		assert_ne!(Locale::parse("en").unwrap(), Locale::parse("en_US").unwrap());
	}

	#[test]
	fn test_invalid_locales_error() {
		for tag in ["not-a-real-locale!!", "", "   ", "*", "und", "e"] {
			assert!(
				matches!(Locale::parse(tag), Err(I18nError::InvalidLocale(_))),
				"{tag:?} should be rejected"
			);
		}
	}

	#[test]
	fn test_candidates() {
		assert_eq!(
			Locale::parse("de_DE").unwrap().candidates(),
			vec!["de_DE".to_string(), "de".to_string()]
		);
		assert_eq!(
			Locale::parse("zh_Hans_CN").unwrap().candidates(),
			vec![
				"zh_Hans_CN".to_string(),
				"zh_Hans".to_string(),
				"zh_CN".to_string(),
				"zh".to_string()
			]
		);
		assert_eq!(Locale::parse("fr").unwrap().candidates(), vec!["fr".to_string()]);
	}

	#[test]
	fn test_from_str_and_display() {
		let locale: Locale = "pt-br".parse().unwrap();
		assert_eq!(locale.to_string(), "pt_BR");
	}
}
