// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timezone identifiers and conversions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{I18nError, Result};

/// Timezone used when configuration does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A resolved IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timezone(Tz);

impl Timezone {
	/// Parse an IANA zone name such as `America/New_York`.
	pub fn parse(name: &str) -> Result<Self> {
		name
			.trim()
			.parse::<Tz>()
			.map(Timezone)
			.map_err(|_| I18nError::InvalidTimezone(name.to_string()))
	}

	pub fn utc() -> Self {
		Timezone(Tz::UTC)
	}

	pub fn name(&self) -> &'static str {
		self.0.name()
	}

	pub fn tz(&self) -> Tz {
		self.0
	}

	/// Rebase an instant into this timezone.
	pub fn from_utc(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
		instant.with_timezone(&self.0)
	}

	/// Interpret a wall-clock time in this timezone and convert it to UTC.
	///
	/// Ambiguous times (DST fall-back) resolve to the earlier instant.
	pub fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
		self
			.0
			.from_local_datetime(&local)
			.earliest()
			.map(|dt| dt.with_timezone(&Utc))
			.ok_or_else(|| I18nError::NonexistentLocalTime {
				time: local,
				timezone: self.name().to_string(),
			})
	}
}

impl Default for Timezone {
	fn default() -> Self {
		Timezone::utc()
	}
}

impl fmt::Display for Timezone {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Timezone {
	type Err = I18nError;

	fn from_str(s: &str) -> Result<Self> {
		Timezone::parse(s)
	}
}

impl From<Tz> for Timezone {
	fn from(tz: Tz) -> Self {
		Timezone(tz)
	}
}

/// Parse a timezone name, failing with [`I18nError::InvalidTimezone`].
pub fn parse_timezone(name: &str) -> Result<Timezone> {
	Timezone::parse(name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{NaiveDate, Timelike};

	fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(y, m, d)
			.unwrap()
			.and_hms_opt(h, min, 0)
			.unwrap()
	}

	#[test]
	fn test_parse_known_zone() {
		let tz = Timezone::parse("America/Los_Angeles").unwrap();
		assert_eq!(tz.name(), "America/Los_Angeles");
		assert_eq!(tz.to_string(), "America/Los_Angeles");
	}

	#[test]
	fn test_parse_unknown_zone() {
		assert!(matches!(
			Timezone::parse("Mars/Olympus_Mons"),
			Err(I18nError::InvalidTimezone(_))
		));
	}

	#[test]
	fn test_default_is_utc() {
		assert_eq!(Timezone::default().name(), "UTC");
	}

	#[test]
	fn test_from_utc_rebases() {
		let tz = Timezone::parse("Europe/Vienna").unwrap();
		let instant = Utc.from_utc_datetime(&naive(2010, 4, 12, 13, 46));
		let local = tz.from_utc(instant);
		assert_eq!(local.hour(), 15);
		assert_eq!(local.minute(), 46);
	}

	#[test]
	fn test_to_utc_round_trips_wall_clock() {
		let tz = Timezone::parse("Europe/Vienna").unwrap();
		let utc = tz.to_utc(naive(2010, 4, 12, 15, 46)).unwrap();
		assert_eq!(utc.naive_utc(), naive(2010, 4, 12, 13, 46));
	}

	#[test]
	fn test_to_utc_rejects_gap() {
		let tz = Timezone::parse("Europe/Vienna").unwrap();
		let result = tz.to_utc(naive(2010, 3, 28, 2, 30));
		assert!(matches!(
			result,
			Err(I18nError::NonexistentLocalTime { .. })
		));
	}
}
