// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stateless locale and timezone detection from request data.
//!
//! These helpers never touch the per-request cache. They are the building
//! blocks the default selectors are made of, and can be called directly from
//! custom selectors.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use http::header::HeaderName;

use crate::locale::Locale;
use crate::request::RequestHandle;
use crate::selector::TimezoneLookup;
use crate::timezone::Timezone;

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
	pub tag: String,
	pub quality: f32,
}

/// Parse an `Accept-Language` value, highest quality first.
///
/// Wildcards, entries with `q=0` and entries with an unparseable weight are
/// dropped. Entries of equal weight keep their header order.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
	let mut ranges: Vec<LanguageRange> = header
		.split(',')
		.filter_map(|item| {
			let mut params = item.split(';');
			let tag = params.next()?.trim();
			if tag.is_empty() || tag == "*" {
				return None;
			}

			let mut quality = 1.0f32;
			for param in params {
				let param = param.trim();
				if let Some(q) = param.strip_prefix("q=") {
					quality = q.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
				}
			}
			if quality <= 0.0 {
				return None;
			}

			Some(LanguageRange {
				tag: tag.to_string(),
				quality,
			})
		})
		.collect();

	ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
	ranges
}

/// The client's most preferred locale according to `Accept-Language`.
///
/// Tags that do not parse as locales are skipped.
pub fn select_locale_by_request(request: &RequestHandle) -> Option<Locale> {
	let header = request.accept_language()?;
	parse_accept_language(header)
		.into_iter()
		.find_map(|range| Locale::parse(&range.tag).ok())
}

/// Pick the best match for the client's preferences among `supported`.
///
/// Each preference is matched exactly first, then by primary language, before
/// moving on to the next preference.
pub fn negotiate_locale(request: &RequestHandle, supported: &[Locale]) -> Option<Locale> {
	let header = request.accept_language()?;
	for range in parse_accept_language(header) {
		let Ok(wanted) = Locale::parse(&range.tag) else {
			continue;
		};
		if let Some(exact) = supported.iter().find(|s| **s == wanted) {
			return Some(exact.clone());
		}
		if let Some(partial) = supported.iter().find(|s| s.same_language(&wanted)) {
			return Some(partial.clone());
		}
	}
	None
}

const FORWARDING_HEADERS: [&str; 3] = ["x-forwarded-for", "forwarded", "x-real-ip"];

/// Best guess at the originating client address.
///
/// Proxy headers are checked in order (`X-Forwarded-For`, `Forwarded`,
/// `X-Real-IP`), taking the first hop of each. Addresses that are private,
/// loopback, link-local, multicast or otherwise reserved are skipped. The
/// socket peer address is the final fallback and is returned unfiltered.
pub fn client_ip(request: &RequestHandle) -> Option<IpAddr> {
	for name in FORWARDING_HEADERS {
		let Some(value) = request.header_str(HeaderName::from_static(name)) else {
			continue;
		};
		let Some(ip) = first_hop(value) else {
			continue;
		};
		if is_public(&ip) {
			return Some(ip);
		}
	}
	request.remote_addr().map(|addr| addr.ip())
}

fn first_hop(value: &str) -> Option<IpAddr> {
	let first = value.split(',').next()?.trim();
	let candidate = first
		.split(';')
		.find_map(|part| {
			let (key, v) = part.trim().split_once('=')?;
			key.eq_ignore_ascii_case("for").then_some(v)
		})
		.unwrap_or(first)
		.trim()
		.trim_matches('"');

	if let Ok(ip) = candidate.parse() {
		return Some(ip);
	}
	// Forwarded allows "[v6]:port" and "v4:port".
	let unbracketed = candidate.strip_prefix('[').and_then(|s| s.split(']').next());
	if let Some(v6) = unbracketed {
		return v6.parse().ok();
	}
	candidate
		.rsplit_once(':')
		.and_then(|(host, _)| host.parse::<Ipv4Addr>().ok())
		.map(IpAddr::V4)
}

fn is_public(ip: &IpAddr) -> bool {
	match ip {
		IpAddr::V4(v4) => is_public_v4(v4),
		IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
			Some(v4) => is_public_v4(&v4),
			None => is_public_v6(v6),
		},
	}
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
	let [a, b, _, _] = ip.octets();
	let shared = a == 100 && (64..128).contains(&b);
	let reserved = a >= 240 || a == 0;
	!(ip.is_private()
		|| ip.is_loopback()
		|| ip.is_link_local()
		|| ip.is_multicast()
		|| ip.is_unspecified()
		|| ip.is_broadcast()
		|| ip.is_documentation()
		|| shared
		|| reserved)
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
	let first = ip.segments()[0];
	let unique_local = (first & 0xfe00) == 0xfc00;
	let link_local = (first & 0xffc0) == 0xfe80;
	let documentation = first == 0x2001 && ip.segments()[1] == 0x0db8;
	!(ip.is_loopback()
		|| ip.is_unspecified()
		|| ip.is_multicast()
		|| unique_local
		|| link_local
		|| documentation)
}

/// Timezone of the client address according to `lookup`.
///
/// Returns `None` when no address is known, the lookup has no answer, or the
/// answer is not a known IANA zone.
pub async fn select_timezone_by_request(
	request: &RequestHandle,
	lookup: &dyn TimezoneLookup,
) -> Option<Timezone> {
	let ip = client_ip(request)?;
	let name = lookup.timezone_for(ip).await?;
	match Timezone::parse(&name) {
		Ok(tz) => Some(tz),
		Err(e) => {
			tracing::debug!(%ip, error = %e, "GeoIP returned unknown timezone");
			None
		}
	}
}
