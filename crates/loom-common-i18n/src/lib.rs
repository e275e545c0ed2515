// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped internationalization for Loom servers.
//!
//! This crate decides which locale and timezone apply to the request being
//! handled, loads gettext catalogs on demand, and translates messages in the
//! resolved locale.
//!
//! # Model
//!
//! - [`I18n`] holds process-wide defaults, the translation domains and the
//!   optional locale/timezone selectors. It is built once at startup.
//! - [`RequestI18n`] is created per request and installed as a task-local
//!   with [`RequestI18n::scope`]. It caches the selected locale and timezone
//!   for the rest of the request.
//! - [`Domain`] translates messages using catalogs found at
//!   `<dir>/<locale>/LC_MESSAGES/<domain>.mo`. Catalogs are loaded once per
//!   process and shared.
//! - [`LazyString`] defers a translation until it is forced.
//! - [`Formatter`] renders dates and numbers in the request's locale and
//!   timezone.
//!
//! Messages use `%(name)s` placeholders. Arguments are only substituted when
//! at least one is given.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use loom_common_i18n::{args, selector_fn, I18n, RequestHandle};
//!
//! # tokio_test::block_on(async {
//! let app = Arc::new(
//! 	I18n::builder()
//! 		.locale_selector(selector_fn(|_| Ok(Some("de".to_string()))))
//! 		.build()
//! 		.unwrap(),
//! );
//!
//! let context = app.request(RequestHandle::new());
//! let greeting = context
//! 	.scope(async {
//! 		assert_eq!(loom_common_i18n::get_locale().await.unwrap().as_str(), "de");
//! 		loom_common_i18n::translate("Hello %(name)s!", &args! { name = "Peter" }).await
//! 	})
//! 	.await
//! 	.unwrap();
//! // No catalogs on disk, so the source string is returned.
//! assert_eq!(greeting, "Hello Peter!");
//! # });
//! ```

mod app;
mod catalog;
mod context;
mod domain;
mod error;
mod format;
mod formatting;
mod lazy;
mod locale;
mod negotiate;
mod request;
mod selector;
mod timezone;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub use app::{I18n, I18nBuilder};
pub use catalog::{
	Catalog, CatalogSource, CatalogStore, DEFAULT_DOMAIN, DEFAULT_FILENAME_TEMPLATE,
	DEFAULT_TRANSLATION_DIRECTORY,
};
pub use context::{DefaultDomainGuard, ForcedLocaleGuard, RequestI18n, ResolutionCache, Slot};
pub use domain::{current_domain, Domain};
pub use error::{I18nError, Result, SelectorError, SelectorKind};
pub use format::{format_message, substitute, Arg, Args, FormatError};
pub use formatting::{
	format_currency, format_date, format_datetime, format_decimal, format_number, format_percent,
	format_scientific, format_time, format_timedelta, DateTimeFormat, Formatter, Granularity,
	TimedeltaFormat, DEFAULT_FRACTION_DIGITS, DEFAULT_TIMEDELTA_THRESHOLD,
};
pub use lazy::LazyString;
pub use locale::{parse_locale, Locale, DEFAULT_LOCALE};
pub use negotiate::{
	client_ip, negotiate_locale, parse_accept_language, select_locale_by_request,
	select_timezone_by_request, LanguageRange,
};
pub use request::RequestHandle;
pub use selector::{
	async_selector_fn, selector_fn, AcceptLanguageSelector, AsyncFnSelector, FnSelector,
	GeoTimezoneSelector, LocaleSelector, SelectorResult, TimezoneLookup, TimezoneSelector,
};
pub use timezone::{parse_timezone, Timezone, DEFAULT_TIMEZONE};

/// The current request's locale, running the locale selector on first use.
pub async fn get_locale() -> Result<Locale> {
	RequestI18n::current()?.get_locale().await
}

/// The current request's timezone, running the timezone selector on first use.
pub async fn get_timezone() -> Result<Timezone> {
	RequestI18n::current()?.get_timezone().await
}

/// Forget the current request's locale.
pub fn refresh_locale() -> Result<()> {
	RequestI18n::current()?.refresh_locale();
	Ok(())
}

/// Forget the current request's timezone.
pub fn refresh_timezone() -> Result<()> {
	RequestI18n::current()?.refresh_timezone();
	Ok(())
}

/// Forget both cached values for the current request.
pub fn refresh() -> Result<()> {
	RequestI18n::current()?.refresh();
	Ok(())
}

/// Translate `msgid` in the current domain and locale.
pub async fn translate(msgid: &str, args: &Args) -> Result<String> {
	current_domain().translate(msgid, args).await
}

/// Translate a message with plural forms. `num` is set to `count` unless
/// supplied in `args`.
pub async fn translate_plural(singular: &str, plural: &str, count: u64, args: &Args) -> Result<String> {
	current_domain()
		.translate_plural(singular, plural, count, args)
		.await
}

/// Translate `msgid` within a message context.
pub async fn translate_context(context: &str, msgid: &str, args: &Args) -> Result<String> {
	current_domain()
		.translate_context(context, msgid, args)
		.await
}

/// Translate a plural message within a message context. `num` is set to
/// `count` unless supplied in `args`.
pub async fn translate_plural_context(
	context: &str,
	singular: &str,
	plural: &str,
	count: u64,
	args: &Args,
) -> Result<String> {
	current_domain()
		.translate_plural_context(context, singular, plural, count, args)
		.await
}

/// A deferred [`translate`] using the domain current when forced.
pub fn lazy_translate(msgid: impl Into<String>, args: Args) -> LazyString {
	LazyString::singular(msgid, args)
}

/// A deferred [`translate_plural`] using the domain current when forced.
pub fn lazy_translate_plural(
	singular: impl Into<String>,
	plural: impl Into<String>,
	count: u64,
	args: Args,
) -> LazyString {
	LazyString::plural(singular, plural, count, args)
}

/// A deferred [`translate_context`] using the domain current when forced.
pub fn lazy_translate_context(
	context: impl Into<String>,
	msgid: impl Into<String>,
	args: Args,
) -> LazyString {
	LazyString::context(context, msgid, args)
}

/// A deferred [`translate_plural_context`] using the domain current when forced.
pub fn lazy_translate_plural_context(
	context: impl Into<String>,
	singular: impl Into<String>,
	plural: impl Into<String>,
	count: u64,
	args: Args,
) -> LazyString {
	LazyString::plural_context(context, singular, plural, count, args)
}

/// Rebase an instant into the current request's timezone.
pub async fn to_user_timezone(instant: DateTime<Utc>) -> Result<DateTime<Tz>> {
	RequestI18n::current()?.to_user_timezone(instant).await
}

/// Interpret a wall-clock time in the current request's timezone as UTC.
pub async fn to_utc(local: NaiveDateTime) -> Result<DateTime<Utc>> {
	RequestI18n::current()?.to_utc(local).await
}
