// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pluggable locale and timezone selectors.
//!
//! A selector inspects the current request and returns a locale or timezone
//! name, or `None` to fall back to the configured default. Returned names are
//! parsed by the engine; a name that does not parse is an error, not a
//! silent fallback.
//!
//! Synchronous closures are adapted with [`selector_fn`], async closures with
//! [`async_selector_fn`]. Both implement both selector traits.

use std::future::Future;
use std::marker::PhantomData;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SelectorError;
use crate::negotiate::{client_ip, select_locale_by_request};
use crate::request::RequestHandle;

pub type SelectorResult = std::result::Result<Option<String>, SelectorError>;

/// Chooses the locale for a request.
#[async_trait]
pub trait LocaleSelector: Send + Sync {
	async fn select_locale(&self, request: &RequestHandle) -> SelectorResult;
}

/// Chooses the timezone for a request.
#[async_trait]
pub trait TimezoneSelector: Send + Sync {
	async fn select_timezone(&self, request: &RequestHandle) -> SelectorResult;
}

/// Resolves an IP address to an IANA timezone name.
#[async_trait]
pub trait TimezoneLookup: Send + Sync {
	async fn timezone_for(&self, ip: IpAddr) -> Option<String>;
}

/// Adapter for a synchronous closure.
pub struct FnSelector<F> {
	f: F,
}

/// Wrap a synchronous closure as a selector.
///
/// ```
/// use loom_common_i18n::{selector_fn, LocaleSelector};
///
/// let selector = selector_fn(|request| Ok(request.query_param("lang")));
/// # let _: &dyn LocaleSelector = &selector;
/// ```
pub fn selector_fn<F>(f: F) -> FnSelector<F>
where
	F: Fn(&RequestHandle) -> SelectorResult + Send + Sync + 'static,
{
	FnSelector { f }
}

#[async_trait]
impl<F> LocaleSelector for FnSelector<F>
where
	F: Fn(&RequestHandle) -> SelectorResult + Send + Sync + 'static,
{
	async fn select_locale(&self, request: &RequestHandle) -> SelectorResult {
		(self.f)(request)
	}
}

#[async_trait]
impl<F> TimezoneSelector for FnSelector<F>
where
	F: Fn(&RequestHandle) -> SelectorResult + Send + Sync + 'static,
{
	async fn select_timezone(&self, request: &RequestHandle) -> SelectorResult {
		(self.f)(request)
	}
}

/// Adapter for an async closure. The closure receives an owned request
/// handle so the returned future can be `'static`.
pub struct AsyncFnSelector<F, Fut> {
	f: F,
	_fut: PhantomData<fn() -> Fut>,
}

/// Wrap an async closure as a selector.
pub fn async_selector_fn<F, Fut>(f: F) -> AsyncFnSelector<F, Fut>
where
	F: Fn(RequestHandle) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = SelectorResult> + Send + 'static,
{
	AsyncFnSelector {
		f,
		_fut: PhantomData,
	}
}

#[async_trait]
impl<F, Fut> LocaleSelector for AsyncFnSelector<F, Fut>
where
	F: Fn(RequestHandle) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = SelectorResult> + Send + 'static,
{
	async fn select_locale(&self, request: &RequestHandle) -> SelectorResult {
		(self.f)(request.clone()).await
	}
}

#[async_trait]
impl<F, Fut> TimezoneSelector for AsyncFnSelector<F, Fut>
where
	F: Fn(RequestHandle) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = SelectorResult> + Send + 'static,
{
	async fn select_timezone(&self, request: &RequestHandle) -> SelectorResult {
		(self.f)(request.clone()).await
	}
}

/// Picks the client's most preferred `Accept-Language` entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptLanguageSelector;

#[async_trait]
impl LocaleSelector for AcceptLanguageSelector {
	async fn select_locale(&self, request: &RequestHandle) -> SelectorResult {
		Ok(select_locale_by_request(request).map(|l| l.to_string()))
	}
}

/// Chooses a timezone by geolocating the client address.
pub struct GeoTimezoneSelector<L> {
	lookup: Arc<L>,
}

impl<L: TimezoneLookup> GeoTimezoneSelector<L> {
	pub fn new(lookup: Arc<L>) -> Self {
		Self { lookup }
	}
}

#[async_trait]
impl<L: TimezoneLookup + 'static> TimezoneSelector for GeoTimezoneSelector<L> {
	async fn select_timezone(&self, request: &RequestHandle) -> SelectorResult {
		let Some(ip) = client_ip(request) else {
			return Ok(None);
		};
		Ok(self.lookup.timezone_for(ip).await)
	}
}
