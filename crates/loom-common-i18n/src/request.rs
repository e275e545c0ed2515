// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The request data visible to selectors.

use std::net::SocketAddr;

use http::header::{HeaderMap, HeaderName, ACCEPT_LANGUAGE};
use http::{Method, Uri};
use url::form_urlencoded;

/// A framework-neutral snapshot of an incoming request.
///
/// Selectors receive this instead of a framework request type so the engine
/// does not depend on any particular server.
#[derive(Debug, Clone, Default)]
pub struct RequestHandle {
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	remote_addr: Option<SocketAddr>,
}

impl RequestHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Capture the parts of an `http` request that selectors may inspect.
	pub fn from_parts(parts: &http::request::Parts) -> Self {
		Self {
			method: parts.method.clone(),
			uri: parts.uri.clone(),
			headers: parts.headers.clone(),
			remote_addr: None,
		}
	}

	pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn with_uri(mut self, uri: Uri) -> Self {
		self.uri = uri;
		self
	}

	/// Append a header. Invalid header values are ignored.
	pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
		if let Ok(value) = value.parse() {
			self.headers.append(name, value);
		}
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn uri(&self) -> &Uri {
		&self.uri
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn remote_addr(&self) -> Option<SocketAddr> {
		self.remote_addr
	}

	/// First value of `name` as a string, if present and valid UTF-8.
	pub fn header_str(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn accept_language(&self) -> Option<&str> {
		self.header_str(ACCEPT_LANGUAGE)
	}

	/// First value of a query-string parameter, percent-decoded.
	pub fn query_param(&self, name: &str) -> Option<String> {
		let query = self.uri.query()?;
		form_urlencoded::parse(query.as_bytes())
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.into_owned())
	}
}
