// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Gettext catalog loading and the process-wide catalog cache.
//!
//! Catalogs are compiled `.mo` files found under one or more translation
//! directories using the layout `<dir>/<locale>/LC_MESSAGES/<domain>.mo`.
//! A locale with no catalog on disk gets a null catalog that returns every
//! message unchanged. Loaded catalogs are cached for the lifetime of the
//! store and never reloaded.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{I18nError, Result};
use crate::locale::Locale;

/// Default relative path of a catalog inside a translation directory.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{locale}/LC_MESSAGES/{domain}.mo";

/// Default translation domain name.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Default translation directory, relative to the working directory.
pub const DEFAULT_TRANSLATION_DIRECTORY: &str = "translations";

/// A parsed message catalog for one `(domain, locale)` pair.
pub struct Catalog {
	domain: String,
	locale: Locale,
	messages: gettext::Catalog,
	source: Option<PathBuf>,
}

impl Catalog {
	/// A catalog with no messages. Every lookup returns the source string and
	/// plurals use the English `n != 1` rule.
	pub fn null(domain: impl Into<String>, locale: Locale) -> Self {
		Self {
			domain: domain.into(),
			locale,
			messages: gettext::Catalog::empty(),
			source: None,
		}
	}

	/// Parse a catalog from `.mo` bytes.
	pub fn from_bytes(domain: impl Into<String>, locale: Locale, bytes: &[u8]) -> Result<Self> {
		let messages = gettext::Catalog::parse(bytes).map_err(|source| I18nError::CatalogParse {
			path: PathBuf::from("<memory>"),
			source,
		})?;
		Ok(Self {
			domain: domain.into(),
			locale,
			messages,
			source: None,
		})
	}

	/// Parse a catalog from a file on disk.
	pub fn from_path(domain: impl Into<String>, locale: Locale, path: &Path) -> Result<Self> {
		let file = File::open(path).map_err(|source| I18nError::CatalogRead {
			path: path.to_path_buf(),
			source,
		})?;
		let messages = gettext::Catalog::parse(BufReader::new(file)).map_err(|source| {
			I18nError::CatalogParse {
				path: path.to_path_buf(),
				source,
			}
		})?;
		Ok(Self {
			domain: domain.into(),
			locale,
			messages,
			source: Some(path.to_path_buf()),
		})
	}

	pub fn domain(&self) -> &str {
		&self.domain
	}

	pub fn locale(&self) -> &Locale {
		&self.locale
	}

	/// The file this catalog was loaded from, if any.
	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	pub fn is_null(&self) -> bool {
		self.source.is_none()
	}

	pub fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
		self.messages.gettext(msgid)
	}

	/// Plural lookup. The plural form is chosen by the catalog's
	/// `Plural-Forms` header.
	pub fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
		self.messages.ngettext(singular, plural, n)
	}

	pub fn pgettext<'a>(&'a self, context: &'a str, msgid: &'a str) -> &'a str {
		self.messages.pgettext(context, msgid)
	}

	pub fn npgettext<'a>(
		&'a self,
		context: &'a str,
		singular: &'a str,
		plural: &'a str,
		n: u64,
	) -> &'a str {
		self.messages.npgettext(context, singular, plural, n)
	}
}

impl fmt::Debug for Catalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Catalog")
			.field("domain", &self.domain)
			.field("locale", &self.locale)
			.field("source", &self.source)
			.finish_non_exhaustive()
	}
}

/// Where to look for a domain's catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
	name: String,
	search_paths: Vec<PathBuf>,
	filename_template: String,
}

impl CatalogSource {
	pub fn new(name: impl Into<String>, search_paths: Vec<PathBuf>) -> Self {
		Self {
			name: name.into(),
			search_paths,
			filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
		}
	}

	/// Override the relative catalog path. `{locale}` and `{domain}` are
	/// replaced when resolving.
	pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
		self.filename_template = template.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn search_paths(&self) -> &[PathBuf] {
		&self.search_paths
	}

	pub fn filename_template(&self) -> &str {
		&self.filename_template
	}

	/// Candidate catalog files for `locale`, in lookup order.
	///
	/// Directories are tried in configured order; within a directory the most
	/// specific locale form is tried first.
	pub fn candidate_paths(&self, locale: &Locale) -> Vec<PathBuf> {
		let candidates = locale.candidates();
		let mut out = Vec::with_capacity(self.search_paths.len() * candidates.len());
		for dir in &self.search_paths {
			for candidate in &candidates {
				let relative = self
					.filename_template
					.replace("{locale}", candidate)
					.replace("{domain}", &self.name);
				out.push(dir.join(relative));
			}
		}
		out
	}

	/// First candidate file that exists on disk.
	pub fn locate(&self, locale: &Locale) -> Option<PathBuf> {
		self.candidate_paths(locale).into_iter().find(|p| p.is_file())
	}

	/// Locales that have a catalog file for this source in any search path.
	///
	/// Only the `{locale}/...` layout is scanned; custom templates that do
	/// not start with `{locale}` yield an empty list.
	pub fn available_locales(&self) -> Vec<Locale> {
		let mut found = Vec::new();
		if !self.filename_template.starts_with("{locale}") {
			return found;
		}

		for dir in &self.search_paths {
			let entries = match std::fs::read_dir(dir) {
				Ok(entries) => entries,
				Err(e) => {
					tracing::debug!(dir = %dir.display(), error = %e, "Translation directory not readable");
					continue;
				}
			};
			for entry in entries.flatten() {
				let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
					continue;
				};
				let relative = self
					.filename_template
					.replace("{locale}", &dir_name)
					.replace("{domain}", &self.name);
				if !dir.join(relative).is_file() {
					continue;
				}
				if let Ok(locale) = Locale::parse(&dir_name) {
					if !found.contains(&locale) {
						found.push(locale);
					}
				}
			}
		}

		found.sort();
		found
	}
}

/// Process-wide cache of loaded catalogs keyed by `(domain, locale)`.
///
/// Concurrent first loads of the same key may each parse the file, but only
/// the first inserted catalog is kept and every caller receives that one.
#[derive(Debug, Default)]
pub struct CatalogStore {
	catalogs: RwLock<HashMap<(String, Locale), Arc<Catalog>>>,
}

impl CatalogStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fetch the catalog for `locale` in `source`, loading it on first use.
	///
	/// Missing files produce a cached null catalog. A file that exists but
	/// fails to parse is an error and is not cached, so a later call retries.
	#[tracing::instrument(skip(self, source), fields(domain = %source.name()))]
	pub fn get_catalog(&self, source: &CatalogSource, locale: &Locale) -> Result<Arc<Catalog>> {
		let key = (source.name().to_string(), locale.clone());
		if let Some(catalog) = self.catalogs.read().get(&key) {
			return Ok(Arc::clone(catalog));
		}

		let catalog = match source.locate(locale) {
			Some(path) => {
				let catalog = Catalog::from_path(source.name(), locale.clone(), &path)?;
				tracing::debug!(path = %path.display(), "Loaded translation catalog");
				catalog
			}
			None => {
				tracing::debug!("No catalog found, using null translations");
				Catalog::null(source.name(), locale.clone())
			}
		};

		let mut catalogs = self.catalogs.write();
		let stored = catalogs.entry(key).or_insert_with(|| Arc::new(catalog));
		Ok(Arc::clone(stored))
	}

	/// The cached catalog for a key without loading.
	pub fn cached(&self, domain: &str, locale: &Locale) -> Option<Arc<Catalog>> {
		self
			.catalogs
			.read()
			.get(&(domain.to_string(), locale.clone()))
			.cloned()
	}

	pub fn len(&self) -> usize {
		self.catalogs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.catalogs.read().is_empty()
	}
}
