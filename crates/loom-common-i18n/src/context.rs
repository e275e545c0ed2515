// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request i18n state.
//!
//! A [`RequestI18n`] is created for every incoming request and installed as a
//! tokio task-local for the duration of the handler via [`RequestI18n::scope`].
//! It owns the [`ResolutionCache`], so the locale and timezone selectors run
//! at most once per request unless the cache is explicitly refreshed.
//!
//! Work spawned onto other tasks does not inherit the context. Capture the
//! `Arc<RequestI18n>` and re-enter it with `scope` if needed.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;

use crate::app::I18n;
use crate::domain::Domain;
use crate::error::{I18nError, Result, SelectorKind};
use crate::format::Args;
use crate::locale::Locale;
use crate::request::RequestHandle;
use crate::timezone::Timezone;

tokio::task_local! {
	static CURRENT: Arc<RequestI18n>;
}

/// A lazily filled, clearable value with single-flight resolution.
///
/// The value itself sits behind a synchronous lock that is never held across
/// an await. A separate async lock serializes resolvers so concurrent readers
/// within one request observe a single resolution.
///
/// Every `set` or `clear` bumps a generation counter. A resolver only caches
/// its result if the generation is unchanged when it finishes, so a refresh
/// issued mid-resolution is never overwritten by the stale result.
#[derive(Debug)]
pub struct Slot<T> {
	state: Mutex<SlotState<T>>,
	resolving: tokio::sync::Mutex<()>,
}

#[derive(Debug)]
struct SlotState<T> {
	value: Option<T>,
	generation: u64,
}

impl<T> Default for Slot<T> {
	fn default() -> Self {
		Self {
			state: Mutex::new(SlotState {
				value: None,
				generation: 0,
			}),
			resolving: tokio::sync::Mutex::new(()),
		}
	}
}

impl<T: Clone> Slot<T> {
	pub fn get(&self) -> Option<T> {
		self.state.lock().value.clone()
	}

	pub fn set(&self, value: T) {
		let mut state = self.state.lock();
		state.value = Some(value);
		state.generation = state.generation.wrapping_add(1);
	}

	pub fn clear(&self) {
		let mut state = self.state.lock();
		state.value = None;
		state.generation = state.generation.wrapping_add(1);
	}

	/// Number of times the slot has been set or cleared.
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// Return the cached value or run `resolve` and cache its result.
	///
	/// Errors are returned and leave the slot unset. If the slot is set or
	/// cleared while `resolve` runs, the result is returned to this caller
	/// but not cached.
	pub async fn get_or_try_resolve<F, Fut>(&self, resolve: F) -> Result<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		if let Some(value) = self.get() {
			return Ok(value);
		}

		let _resolving = self.resolving.lock().await;
		let started = {
			let state = self.state.lock();
			if let Some(value) = &state.value {
				return Ok(value.clone());
			}
			state.generation
		};

		let value = resolve().await?;

		let mut state = self.state.lock();
		if state.generation == started {
			state.value = Some(value.clone());
		}
		Ok(value)
	}
}

/// The resolved locale and timezone for one request.
#[derive(Debug, Default)]
pub struct ResolutionCache {
	locale: Slot<Locale>,
	timezone: Slot<Timezone>,
}

impl ResolutionCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn locale(&self) -> &Slot<Locale> {
		&self.locale
	}

	pub fn timezone(&self) -> &Slot<Timezone> {
		&self.timezone
	}

	pub fn clear(&self) {
		self.locale.clear();
		self.timezone.clear();
	}
}

/// i18n state for a single request.
pub struct RequestI18n {
	app: Arc<I18n>,
	request: RequestHandle,
	cache: ResolutionCache,
	domain_override: Mutex<Option<Domain>>,
	forced_locale: Mutex<Option<Locale>>,
}

impl std::fmt::Debug for RequestI18n {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestI18n")
			.field("request", &self.request)
			.field("cache", &self.cache)
			.finish_non_exhaustive()
	}
}

impl RequestI18n {
	pub fn new(app: Arc<I18n>, request: RequestHandle) -> Self {
		Self {
			app,
			request,
			cache: ResolutionCache::new(),
			domain_override: Mutex::new(None),
			forced_locale: Mutex::new(None),
		}
	}

	/// Run `fut` with this context installed as the current request.
	pub async fn scope<F: Future>(self: Arc<Self>, fut: F) -> F::Output {
		CURRENT.scope(self, fut).await
	}

	/// The context of the request being handled on this task.
	pub fn current() -> Result<Arc<RequestI18n>> {
		Self::try_current().ok_or(I18nError::NoRequestContext)
	}

	pub fn try_current() -> Option<Arc<RequestI18n>> {
		CURRENT.try_with(Arc::clone).ok()
	}

	pub fn app(&self) -> &Arc<I18n> {
		&self.app
	}

	pub fn request(&self) -> &RequestHandle {
		&self.request
	}

	pub fn cache(&self) -> &ResolutionCache {
		&self.cache
	}

	/// The locale for this request, running the locale selector on first use.
	///
	/// A locale forced with [`force_locale`](Self::force_locale) takes
	/// precedence over the cache.
	pub async fn get_locale(&self) -> Result<Locale> {
		let forced = self.forced_locale.lock().clone();
		if let Some(forced) = forced {
			return Ok(forced);
		}
		self
			.cache
			.locale()
			.get_or_try_resolve(|| self.select_locale())
			.await
	}

	/// The timezone for this request, running the timezone selector on first use.
	pub async fn get_timezone(&self) -> Result<Timezone> {
		self
			.cache
			.timezone()
			.get_or_try_resolve(|| self.select_timezone())
			.await
	}

	/// The cached locale, without running a selector.
	pub fn cached_locale(&self) -> Option<Locale> {
		self.forced_locale.lock().clone().or_else(|| self.cache.locale().get())
	}

	pub fn cached_timezone(&self) -> Option<Timezone> {
		self.cache.timezone().get()
	}

	pub fn refresh_locale(&self) {
		self.cache.locale().clear();
	}

	pub fn refresh_timezone(&self) {
		self.cache.timezone().clear();
	}

	/// Drop both cached values so the next access re-runs the selectors.
	pub fn refresh(&self) {
		self.cache.clear();
	}

	#[tracing::instrument(skip(self), fields(path = %self.request.uri().path()))]
	async fn select_locale(&self) -> Result<Locale> {
		let selected = match self.app.locale_selector() {
			Some(selector) => selector
				.select_locale(&self.request)
				.await
				.map_err(|source| I18nError::Selector {
					kind: SelectorKind::Locale,
					source,
				})?,
			None => None,
		};

		let locale = match selected {
			Some(tag) => Locale::parse(&tag)?,
			None => self.app.default_locale().clone(),
		};
		tracing::debug!(locale = %locale, "Resolved request locale");
		Ok(locale)
	}

	#[tracing::instrument(skip(self), fields(path = %self.request.uri().path()))]
	async fn select_timezone(&self) -> Result<Timezone> {
		let selected = match self.app.timezone_selector() {
			Some(selector) => selector
				.select_timezone(&self.request)
				.await
				.map_err(|source| I18nError::Selector {
					kind: SelectorKind::Timezone,
					source,
				})?,
			None => None,
		};

		let timezone = match selected {
			Some(name) => Timezone::parse(&name)?,
			None => *self.app.default_timezone(),
		};
		tracing::debug!(timezone = %timezone, "Resolved request timezone");
		Ok(timezone)
	}

	/// Temporarily use `locale` for this request.
	///
	/// The previous state is restored when the guard drops. Refreshing while
	/// the guard is alive does not undo the override.
	pub fn force_locale(&self, locale: &str) -> Result<ForcedLocaleGuard<'_>> {
		let locale = Locale::parse(locale)?;
		let previous = self.forced_locale.lock().replace(locale);
		Ok(ForcedLocaleGuard {
			context: self,
			previous,
		})
	}

	/// Make `domain` the default for the rest of this request.
	pub fn set_default_domain(&self, domain: Domain) {
		*self.domain_override.lock() = Some(domain);
	}

	/// Make `domain` the default until the guard drops.
	pub fn with_default_domain(&self, domain: Domain) -> DefaultDomainGuard<'_> {
		let previous = self.domain_override.lock().replace(domain);
		DefaultDomainGuard {
			context: self,
			previous,
		}
	}

	/// The domain used when a translation call names none.
	pub fn domain(&self) -> Domain {
		self
			.domain_override
			.lock()
			.clone()
			.unwrap_or_else(|| self.app.default_domain().clone())
	}

	pub async fn translate(&self, msgid: &str, args: &Args) -> Result<String> {
		let locale = self.get_locale().await?;
		self.domain().translate_in(&locale, msgid, args)
	}

	pub async fn translate_plural(
		&self,
		singular: &str,
		plural: &str,
		count: u64,
		args: &Args,
	) -> Result<String> {
		let locale = self.get_locale().await?;
		self
			.domain()
			.translate_plural_in(&locale, singular, plural, count, args)
	}

	/// Rebase an instant into the request's timezone.
	pub async fn to_user_timezone(&self, instant: DateTime<Utc>) -> Result<DateTime<Tz>> {
		Ok(self.get_timezone().await?.from_utc(instant))
	}

	/// Interpret a wall-clock time in the request's timezone as UTC.
	pub async fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
		self.get_timezone().await?.to_utc(local)
	}
}

/// Restores the previous forced locale on drop.
#[must_use = "the locale override ends when the guard is dropped"]
pub struct ForcedLocaleGuard<'a> {
	context: &'a RequestI18n,
	previous: Option<Locale>,
}

impl Drop for ForcedLocaleGuard<'_> {
	fn drop(&mut self) {
		*self.context.forced_locale.lock() = self.previous.take();
	}
}

/// Restores the previous domain override on drop.
#[must_use = "the domain override ends when the guard is dropped"]
pub struct DefaultDomainGuard<'a> {
	context: &'a RequestI18n,
	previous: Option<Domain>,
}

impl Drop for DefaultDomainGuard<'_> {
	fn drop(&mut self) {
		*self.context.domain_override.lock() = self.previous.take();
	}
}
