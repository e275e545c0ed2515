// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide i18n configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{
	CatalogSource, CatalogStore, DEFAULT_DOMAIN, DEFAULT_FILENAME_TEMPLATE,
	DEFAULT_TRANSLATION_DIRECTORY,
};
use crate::context::RequestI18n;
use crate::domain::Domain;
use crate::error::{I18nError, Result};
use crate::locale::{Locale, DEFAULT_LOCALE};
use crate::request::RequestHandle;
use crate::selector::{LocaleSelector, TimezoneSelector};
use crate::timezone::{Timezone, DEFAULT_TIMEZONE};

/// Defaults, domains and selectors shared by every request.
///
/// Built once at startup with [`I18n::builder`] and shared behind an `Arc`.
pub struct I18n {
	default_locale: Locale,
	default_timezone: Timezone,
	default_domain: Domain,
	domains: HashMap<String, Domain>,
	translation_directories: Vec<PathBuf>,
	store: Arc<CatalogStore>,
	locale_selector: Option<Arc<dyn LocaleSelector>>,
	timezone_selector: Option<Arc<dyn TimezoneSelector>>,
}

impl std::fmt::Debug for I18n {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("I18n")
			.field("default_locale", &self.default_locale)
			.field("default_timezone", &self.default_timezone)
			.field("default_domain", &self.default_domain.name())
			.field("translation_directories", &self.translation_directories)
			.field("has_locale_selector", &self.locale_selector.is_some())
			.field("has_timezone_selector", &self.timezone_selector.is_some())
			.finish()
	}
}

impl I18n {
	pub fn builder() -> I18nBuilder {
		I18nBuilder::default()
	}

	pub fn default_locale(&self) -> &Locale {
		&self.default_locale
	}

	pub fn default_timezone(&self) -> &Timezone {
		&self.default_timezone
	}

	pub fn default_domain(&self) -> &Domain {
		&self.default_domain
	}

	/// A configured domain by name, including the default domain.
	pub fn domain(&self, name: &str) -> Option<&Domain> {
		if self.default_domain.name() == name {
			return Some(&self.default_domain);
		}
		self.domains.get(name)
	}

	pub fn translation_directories(&self) -> &[PathBuf] {
		&self.translation_directories
	}

	pub fn catalog_store(&self) -> &Arc<CatalogStore> {
		&self.store
	}

	pub fn locale_selector(&self) -> Option<&Arc<dyn LocaleSelector>> {
		self.locale_selector.as_ref()
	}

	pub fn timezone_selector(&self) -> Option<&Arc<dyn TimezoneSelector>> {
		self.timezone_selector.as_ref()
	}

	/// Locales with a catalog for the default domain. The default locale is
	/// always included, last if it has no catalog.
	pub fn list_translations(&self) -> Vec<Locale> {
		let mut locales = self.default_domain.available_locales();
		if !locales.contains(&self.default_locale) {
			locales.push(self.default_locale.clone());
		}
		locales
	}

	/// Create the per-request context for `request`.
	pub fn request(self: &Arc<Self>, request: RequestHandle) -> Arc<RequestI18n> {
		Arc::new(RequestI18n::new(Arc::clone(self), request))
	}
}

/// Builder for [`I18n`].
pub struct I18nBuilder {
	default_locale: String,
	default_timezone: String,
	default_domain: String,
	translation_directories: Vec<PathBuf>,
	filename_template: String,
	domains: Vec<(String, Option<Vec<PathBuf>>)>,
	locale_selector: Option<Arc<dyn LocaleSelector>>,
	timezone_selector: Option<Arc<dyn TimezoneSelector>>,
}

impl Default for I18nBuilder {
	fn default() -> Self {
		Self {
			default_locale: DEFAULT_LOCALE.to_string(),
			default_timezone: DEFAULT_TIMEZONE.to_string(),
			default_domain: DEFAULT_DOMAIN.to_string(),
			translation_directories: vec![PathBuf::from(DEFAULT_TRANSLATION_DIRECTORY)],
			filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
			domains: Vec::new(),
			locale_selector: None,
			timezone_selector: None,
		}
	}
}

impl I18nBuilder {
	pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
		self.default_locale = locale.into();
		self
	}

	pub fn default_timezone(mut self, timezone: impl Into<String>) -> Self {
		self.default_timezone = timezone.into();
		self
	}

	/// Name of the default translation domain.
	pub fn default_domain(mut self, name: impl Into<String>) -> Self {
		self.default_domain = name.into();
		self
	}

	/// Replace the translation directories. Earlier directories win.
	pub fn translation_directories<I, P>(mut self, dirs: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.translation_directories = dirs.into_iter().map(Into::into).collect();
		self
	}

	pub fn filename_template(mut self, template: impl Into<String>) -> Self {
		self.filename_template = template.into();
		self
	}

	/// Register an additional domain searched in the translation directories.
	pub fn domain(mut self, name: impl Into<String>) -> Self {
		self.domains.push((name.into(), None));
		self
	}

	/// Register an additional domain with its own search paths.
	pub fn domain_with_paths<I, P>(mut self, name: impl Into<String>, paths: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		let paths = paths.into_iter().map(Into::into).collect();
		self.domains.push((name.into(), Some(paths)));
		self
	}

	pub fn locale_selector(mut self, selector: impl LocaleSelector + 'static) -> Self {
		self.locale_selector = Some(Arc::new(selector));
		self
	}

	pub fn timezone_selector(mut self, selector: impl TimezoneSelector + 'static) -> Self {
		self.timezone_selector = Some(Arc::new(selector));
		self
	}

	/// Validate the defaults and create the domains.
	#[tracing::instrument(skip(self), fields(default_locale = %self.default_locale, default_timezone = %self.default_timezone))]
	pub fn build(self) -> Result<I18n> {
		let default_locale = Locale::parse(&self.default_locale)?;
		let default_timezone = Timezone::parse(&self.default_timezone)?;
		let store = Arc::new(CatalogStore::new());

		let make_source = |name: &str, paths: Vec<PathBuf>| {
			CatalogSource::new(name, paths).with_filename_template(self.filename_template.clone())
		};

		let default_domain = Domain::new(
			make_source(&self.default_domain, self.translation_directories.clone()),
			Arc::clone(&store),
		);

		let mut domains = HashMap::new();
		for (name, paths) in &self.domains {
			if *name == self.default_domain || domains.contains_key(name) {
				return Err(I18nError::DuplicateDomain(name.clone()));
			}
			let paths = paths
				.clone()
				.unwrap_or_else(|| self.translation_directories.clone());
			domains.insert(
				name.clone(),
				Domain::new(make_source(name, paths), Arc::clone(&store)),
			);
		}

		tracing::debug!(domains = domains.len() + 1, "i18n configured");

		Ok(I18n {
			default_locale,
			default_timezone,
			default_domain,
			domains,
			translation_directories: self.translation_directories,
			store,
			locale_selector: self.locale_selector,
			timezone_selector: self.timezone_selector,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::write_fixtures;
	use tempfile::TempDir;

	#[test]
	fn test_builder_defaults() {
		let app = I18n::builder().build().unwrap();
		assert_eq!(app.default_locale().as_str(), "en");
		assert_eq!(app.default_timezone().name(), "UTC");
		assert_eq!(app.default_domain().name(), "messages");
		assert_eq!(app.translation_directories(), &[PathBuf::from("translations")]);
		assert!(app.locale_selector().is_none());
	}

	#[test]
	fn test_builder_rejects_invalid_defaults() {
		assert!(matches!(
			I18n::builder().default_locale("!!").build(),
			Err(I18nError::InvalidLocale(_))
		));
		assert!(matches!(
			I18n::builder().default_timezone("Not/AZone").build(),
			Err(I18nError::InvalidTimezone(_))
		));
	}

	#[test]
	fn test_duplicate_domain_rejected() {
		assert!(matches!(
			I18n::builder().domain("messages").build(),
			Err(I18nError::DuplicateDomain(_))
		));
		assert!(matches!(
			I18n::builder().domain("a").domain("a").build(),
			Err(I18nError::DuplicateDomain(_))
		));
	}

	#[test]
	fn test_domains_share_store() {
		let dir = TempDir::new().unwrap();
		write_fixtures(dir.path()).unwrap();
		let app = I18n::builder()
			.translation_directories([dir.path()])
			.domain("test")
			.build()
			.unwrap();

		let de = Locale::parse("de").unwrap();
		let test = app.domain("test").unwrap();
		assert_eq!(
			test.translate_in(&de, "first", &crate::Args::new()).unwrap(),
			"erste"
		);
		app.default_domain().catalog(&de).unwrap();
		assert_eq!(app.catalog_store().len(), 2);
		assert!(app.domain("messages").unwrap().ptr_eq(app.default_domain()));
		assert!(app.domain("missing").is_none());
	}

	#[test]
	fn test_list_translations_includes_default() {
		let dir = TempDir::new().unwrap();
		write_fixtures(dir.path()).unwrap();
		let app = I18n::builder()
			.translation_directories([dir.path()])
			.build()
			.unwrap();
		let tags: Vec<String> = app.list_translations().iter().map(|l| l.to_string()).collect();
		assert_eq!(tags, vec!["de", "fr", "en"]);

		let app = I18n::builder()
			.default_locale("de")
			.translation_directories([dir.path()])
			.build()
			.unwrap();
		let tags: Vec<String> = app.list_translations().iter().map(|l| l.to_string()).collect();
		assert_eq!(tags, vec!["de", "fr"]);
	}
}
