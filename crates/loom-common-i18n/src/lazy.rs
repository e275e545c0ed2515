// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deferred translations.
//!
//! A [`LazyString`] records what to translate but not when. It can be built
//! at startup (e.g. form labels or static error messages) and forced inside a
//! request, where it renders in that request's locale. Construction never
//! touches request state or the catalog store.
//!
//! Lazy strings deliberately do not implement `Display`, `PartialEq` or
//! `Hash`: those would need the request locale synchronously. Force them
//! first and compare the resulting `String`s.

use std::fmt;

use crate::domain::{current_domain, Domain};
use crate::error::Result;
use crate::format::Args;
use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Message {
	Singular {
		msgid: String,
	},
	Plural {
		singular: String,
		plural: String,
		count: u64,
	},
	Context {
		context: String,
		msgid: String,
	},
	PluralContext {
		context: String,
		singular: String,
		plural: String,
		count: u64,
	},
}

/// A translation evaluated when forced.
#[derive(Clone)]
pub struct LazyString {
	domain: Option<Domain>,
	message: Message,
	args: Args,
}

impl LazyString {
	pub fn singular(msgid: impl Into<String>, args: Args) -> Self {
		Self {
			domain: None,
			message: Message::Singular {
				msgid: msgid.into(),
			},
			args,
		}
	}

	pub fn plural(
		singular: impl Into<String>,
		plural: impl Into<String>,
		count: u64,
		args: Args,
	) -> Self {
		Self {
			domain: None,
			message: Message::Plural {
				singular: singular.into(),
				plural: plural.into(),
				count,
			},
			args,
		}
	}

	pub fn context(context: impl Into<String>, msgid: impl Into<String>, args: Args) -> Self {
		Self {
			domain: None,
			message: Message::Context {
				context: context.into(),
				msgid: msgid.into(),
			},
			args,
		}
	}

	pub fn plural_context(
		context: impl Into<String>,
		singular: impl Into<String>,
		plural: impl Into<String>,
		count: u64,
		args: Args,
	) -> Self {
		Self {
			domain: None,
			message: Message::PluralContext {
				context: context.into(),
				singular: singular.into(),
				plural: plural.into(),
				count,
			},
			args,
		}
	}

	/// Pin the domain. Without one, the domain current at force time is used.
	pub fn with_domain(mut self, domain: Domain) -> Self {
		self.domain = Some(domain);
		self
	}

	/// The untranslated message id (the singular form for plurals).
	pub fn msgid(&self) -> &str {
		match &self.message {
			Message::Singular { msgid } | Message::Context { msgid, .. } => msgid,
			Message::Plural { singular, .. } | Message::PluralContext { singular, .. } => singular,
		}
	}

	fn domain(&self) -> Domain {
		self.domain.clone().unwrap_or_else(current_domain)
	}

	/// Render in the current request's locale.
	///
	/// Every call re-reads the request state, so forcing after a refresh or
	/// inside a forced locale yields the new translation.
	pub async fn force(&self) -> Result<String> {
		let domain = self.domain();
		match &self.message {
			Message::Singular { msgid } => domain.translate(msgid, &self.args).await,
			Message::Plural {
				singular,
				plural,
				count,
			} => {
				domain
					.translate_plural(singular, plural, *count, &self.args)
					.await
			}
			Message::Context { context, msgid } => {
				domain.translate_context(context, msgid, &self.args).await
			}
			Message::PluralContext {
				context,
				singular,
				plural,
				count,
			} => {
				domain
					.translate_plural_context(context, singular, plural, *count, &self.args)
					.await
			}
		}
	}

	/// Render for an explicit locale without consulting request state.
	pub fn force_in(&self, locale: &Locale) -> Result<String> {
		let domain = self.domain();
		match &self.message {
			Message::Singular { msgid } => domain.translate_in(locale, msgid, &self.args),
			Message::Plural {
				singular,
				plural,
				count,
			} => domain.translate_plural_in(locale, singular, plural, *count, &self.args),
			Message::Context { context, msgid } => {
				domain.translate_context_in(locale, context, msgid, &self.args)
			}
			Message::PluralContext {
				context,
				singular,
				plural,
				count,
			} => domain.translate_plural_context_in(locale, context, singular, plural, *count, &self.args),
		}
	}
}

impl fmt::Debug for LazyString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyString")
			.field("message", &self.message)
			.field("domain", &self.domain.as_ref().map(Domain::name))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::args;
	use crate::testing::write_fixtures;
	use tempfile::TempDir;

	#[test]
	fn test_force_in_renders_per_locale() {
		let dir = TempDir::new().unwrap();
		write_fixtures(dir.path()).unwrap();
		let domain = Domain::standalone("messages", vec![dir.path().to_path_buf()]);

		let lazy = domain.lazy_translate("Yes", Args::new());
		assert_eq!(lazy.force_in(&Locale::parse("de").unwrap()).unwrap(), "Ja");
		assert_eq!(lazy.force_in(&Locale::parse("fr").unwrap()).unwrap(), "Oui");
		assert_eq!(lazy.force_in(&Locale::parse("en").unwrap()).unwrap(), "Yes");
	}

	#[test]
	fn test_plural_context_pinned_to_domain() {
		let dir = TempDir::new().unwrap();
		write_fixtures(dir.path()).unwrap();
		let domain = Domain::standalone("messages", vec![dir.path().to_path_buf()]);

		let lazy = domain.lazy_translate_plural_context("button", "%(num)s Apple", "%(num)s Apples", 1, Args::new());
		let de = Locale::parse("de").unwrap();
		assert_eq!(lazy.force_in(&de).unwrap(), "1 Apfel-Knopf");
		let lazy = domain.lazy_translate_plural_context("button", "%(num)s Apple", "%(num)s Apples", 4, Args::new());
		assert_eq!(lazy.force_in(&de).unwrap(), "4 Äpfel-Knöpfe");
	}

	#[test]
	fn test_construction_does_not_load_catalogs() {
		let dir = TempDir::new().unwrap();
		write_fixtures(dir.path()).unwrap();
		let domain = Domain::standalone("messages", vec![dir.path().to_path_buf()]);

		let _lazy = domain.lazy_translate_plural("%(num)s Apple", "%(num)s Apples", 2, Args::new());
		assert!(domain.store().is_empty());
	}

	#[tokio::test]
	async fn test_force_outside_request_is_untranslated() {
		let lazy = LazyString::singular("Hello %(name)s!", args! { name = "Peter" });
		assert_eq!(lazy.force().await.unwrap(), "Hello Peter!");
	}

	#[test]
	fn test_msgid_and_debug() {
		let lazy = LazyString::plural_context("button", "%(num)s Apple", "%(num)s Apples", 1, Args::new());
		assert_eq!(lazy.msgid(), "%(num)s Apple");
		assert!(format!("{lazy:?}").contains("PluralContext"));
	}
}
