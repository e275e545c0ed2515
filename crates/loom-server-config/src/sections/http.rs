// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP listener section.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HttpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	/// Public URL of the server. Defaults to `http://localhost:<port>`.
	pub base_url: Option<String>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: Self) {
		self.host = other.host.or(self.host.take());
		self.port = other.port.or(self.port);
		self.base_url = other.base_url.or(self.base_url.take());
	}

	pub fn finalize(self) -> HttpConfig {
		let port = self.port.unwrap_or(DEFAULT_PORT);
		let base_url = match self.base_url {
			Some(url) => url.trim_end_matches('/').to_string(),
			None => format!("http://localhost:{port}"),
		};
		HttpConfig {
			host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
			port,
			base_url,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	pub base_url: String,
}

impl Default for HttpConfig {
	fn default() -> Self {
		HttpConfigLayer::default().finalize()
	}
}
