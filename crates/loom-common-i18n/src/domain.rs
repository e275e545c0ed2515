// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation domains.
//!
//! A [`Domain`] names a family of catalogs (`messages`, `emails`, ...) and
//! where to find them. Translating through a domain picks the catalog for the
//! current request's locale; the `*_in` variants take the locale explicitly
//! and never touch request state.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::{Catalog, CatalogSource, CatalogStore, DEFAULT_DOMAIN};
use crate::context::RequestI18n;
use crate::error::{I18nError, Result};
use crate::format::{format_message, Args};
use crate::lazy::LazyString;
use crate::locale::{Locale, DEFAULT_LOCALE};

static EMPTY_DOMAIN: Lazy<Domain> = Lazy::new(|| {
	Domain::new(
		CatalogSource::new(DEFAULT_DOMAIN, Vec::new()),
		Arc::new(CatalogStore::new()),
	)
});

/// A named set of catalogs sharing a catalog store.
///
/// Cloning is cheap and clones share the same source and store.
#[derive(Clone)]
pub struct Domain {
	inner: Arc<DomainInner>,
}

struct DomainInner {
	source: CatalogSource,
	store: Arc<CatalogStore>,
}

impl fmt::Debug for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Domain")
			.field("source", &self.inner.source)
			.finish_non_exhaustive()
	}
}

impl Domain {
	pub fn new(source: CatalogSource, store: Arc<CatalogStore>) -> Self {
		Self {
			inner: Arc::new(DomainInner { source, store }),
		}
	}

	/// A domain with its own private catalog store.
	pub fn standalone(name: impl Into<String>, search_paths: Vec<PathBuf>) -> Self {
		Self::new(
			CatalogSource::new(name, search_paths),
			Arc::new(CatalogStore::new()),
		)
	}

	/// The built-in domain with no search paths. Every lookup returns the
	/// source string.
	pub fn empty() -> Domain {
		EMPTY_DOMAIN.clone()
	}

	pub fn name(&self) -> &str {
		self.inner.source.name()
	}

	pub fn source(&self) -> &CatalogSource {
		&self.inner.source
	}

	pub fn store(&self) -> &Arc<CatalogStore> {
		&self.inner.store
	}

	/// Returns true if both handles refer to the same domain instance.
	pub fn ptr_eq(&self, other: &Domain) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub fn catalog(&self, locale: &Locale) -> Result<Arc<Catalog>> {
		self.inner.store.get_catalog(&self.inner.source, locale)
	}

	/// Locales with a catalog for this domain on disk.
	pub fn available_locales(&self) -> Vec<Locale> {
		self.inner.source.available_locales()
	}

	pub fn translate_in(&self, locale: &Locale, msgid: &str, args: &Args) -> Result<String> {
		let catalog = self.catalog(locale)?;
		render(catalog.gettext(msgid), args)
	}

	/// Plural lookup for `count`. `num` is added to `args` unless already set.
	pub fn translate_plural_in(
		&self,
		locale: &Locale,
		singular: &str,
		plural: &str,
		count: u64,
		args: &Args,
	) -> Result<String> {
		let catalog = self.catalog(locale)?;
		render(
			catalog.ngettext(singular, plural, count),
			&with_num(args, count),
		)
	}

	pub fn translate_context_in(
		&self,
		locale: &Locale,
		context: &str,
		msgid: &str,
		args: &Args,
	) -> Result<String> {
		let catalog = self.catalog(locale)?;
		render(catalog.pgettext(context, msgid), args)
	}

	pub fn translate_plural_context_in(
		&self,
		locale: &Locale,
		context: &str,
		singular: &str,
		plural: &str,
		count: u64,
		args: &Args,
	) -> Result<String> {
		let catalog = self.catalog(locale)?;
		render(
			catalog.npgettext(context, singular, plural, count),
			&with_num(args, count),
		)
	}

	/// Translate `msgid` for the current request.
	///
	/// Outside a request the message is rendered untranslated.
	pub async fn translate(&self, msgid: &str, args: &Args) -> Result<String> {
		let catalog = self.current_catalog().await?;
		render(catalog.gettext(msgid), args)
	}

	pub async fn translate_plural(
		&self,
		singular: &str,
		plural: &str,
		count: u64,
		args: &Args,
	) -> Result<String> {
		let catalog = self.current_catalog().await?;
		render(
			catalog.ngettext(singular, plural, count),
			&with_num(args, count),
		)
	}

	pub async fn translate_context(&self, context: &str, msgid: &str, args: &Args) -> Result<String> {
		let catalog = self.current_catalog().await?;
		render(catalog.pgettext(context, msgid), args)
	}

	pub async fn translate_plural_context(
		&self,
		context: &str,
		singular: &str,
		plural: &str,
		count: u64,
		args: &Args,
	) -> Result<String> {
		let catalog = self.current_catalog().await?;
		render(
			catalog.npgettext(context, singular, plural, count),
			&with_num(args, count),
		)
	}

	/// The catalog for the current request's locale, or a null catalog
	/// outside a request.
	async fn current_catalog(&self) -> Result<Arc<Catalog>> {
		match RequestI18n::try_current() {
			Some(context) => {
				let locale = context.get_locale().await?;
				self.catalog(&locale)
			}
			None => Ok(Arc::new(Catalog::null(
				self.name(),
				Locale::parse(DEFAULT_LOCALE)?,
			))),
		}
	}

	/// Make this the default domain for the rest of the current request.
	pub fn as_default(&self) -> Result<()> {
		RequestI18n::current()?.set_default_domain(self.clone());
		Ok(())
	}

	pub fn lazy_translate(&self, msgid: impl Into<String>, args: Args) -> LazyString {
		LazyString::singular(msgid, args).with_domain(self.clone())
	}

	pub fn lazy_translate_plural(
		&self,
		singular: impl Into<String>,
		plural: impl Into<String>,
		count: u64,
		args: Args,
	) -> LazyString {
		LazyString::plural(singular, plural, count, args).with_domain(self.clone())
	}

	pub fn lazy_translate_context(
		&self,
		context: impl Into<String>,
		msgid: impl Into<String>,
		args: Args,
	) -> LazyString {
		LazyString::context(context, msgid, args).with_domain(self.clone())
	}

	pub fn lazy_translate_plural_context(
		&self,
		context: impl Into<String>,
		singular: impl Into<String>,
		plural: impl Into<String>,
		count: u64,
		args: Args,
	) -> LazyString {
		LazyString::plural_context(context, singular, plural, count, args).with_domain(self.clone())
	}
}

/// The domain that translation calls without an explicit domain use.
///
/// Inside a request this is the request's override or the application
/// default; outside a request it is [`Domain::empty`].
pub fn current_domain() -> Domain {
	match RequestI18n::try_current() {
		Some(context) => context.domain(),
		None => Domain::empty(),
	}
}

fn render(message: &str, args: &Args) -> Result<String> {
	format_message(message, args).map_err(|source| I18nError::Format {
		message: message.to_string(),
		source,
	})
}

fn with_num(args: &Args, count: u64) -> Args {
	let mut merged = args.clone();
	if merged.get("num").is_none() {
		merged.insert("num", count);
	}
	merged
}
