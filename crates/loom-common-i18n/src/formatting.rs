// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale-aware date, time and number formatting.
//!
//! A [`Formatter`] is bound to one locale and timezone. Inside a request,
//! [`RequestI18n::formatter`] builds one from the resolved values and the free
//! functions (`format_datetime`, `format_number`, ...) use the current
//! request.
//!
//! Dates are rendered with chrono's localized strftime tables. Numbers use the
//! CLDR separators shipped with `num-format`.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use num_format::{Locale as NumberLocale, ToFormattedString};

use crate::context::RequestI18n;
use crate::error::{I18nError, Result};
use crate::format::Args;
use crate::locale::Locale;
use crate::timezone::Timezone;

const NO_BREAK_SPACE: char = '\u{a0}';

/// Maximum fraction digits rendered by [`Formatter::format_number`].
pub const DEFAULT_FRACTION_DIGITS: usize = 3;

/// Threshold at which [`Formatter`] timedeltas switch to the next larger unit.
pub const DEFAULT_TIMEDELTA_THRESHOLD: f64 = 0.85;

/// Width of a formatted date or time, or an explicit strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateTimeFormat {
	Short,
	#[default]
	Medium,
	Long,
	Full,
	/// A chrono strftime pattern, rendered with the locale's names.
	Pattern(String),
}

impl DateTimeFormat {
	fn date_pattern(&self) -> &str {
		match self {
			DateTimeFormat::Short => "%x",
			DateTimeFormat::Medium => "%-d %b %Y",
			DateTimeFormat::Long => "%-d %B %Y",
			DateTimeFormat::Full => "%A, %-d %B %Y",
			DateTimeFormat::Pattern(pattern) => pattern,
		}
	}

	fn time_pattern(&self) -> &str {
		match self {
			DateTimeFormat::Short => "%H:%M",
			DateTimeFormat::Medium => "%X",
			DateTimeFormat::Long | DateTimeFormat::Full => "%X %Z",
			DateTimeFormat::Pattern(pattern) => pattern,
		}
	}

	fn datetime_pattern(&self) -> String {
		match self {
			DateTimeFormat::Pattern(pattern) => pattern.clone(),
			width => format!("{} {}", width.date_pattern(), width.time_pattern()),
		}
	}
}

/// The smallest unit a timedelta is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
	Year,
	Month,
	Week,
	Day,
	Hour,
	Minute,
	#[default]
	Second,
}

const TIMEDELTA_UNITS: [(Granularity, f64, &str, &str); 7] = [
	(Granularity::Year, 31_536_000.0, "%(num)s year", "%(num)s years"),
	(Granularity::Month, 2_592_000.0, "%(num)s month", "%(num)s months"),
	(Granularity::Week, 604_800.0, "%(num)s week", "%(num)s weeks"),
	(Granularity::Day, 86_400.0, "%(num)s day", "%(num)s days"),
	(Granularity::Hour, 3_600.0, "%(num)s hour", "%(num)s hours"),
	(Granularity::Minute, 60.0, "%(num)s minute", "%(num)s minutes"),
	(Granularity::Second, 1.0, "%(num)s second", "%(num)s seconds"),
];

/// Options for [`RequestI18n::format_timedelta`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedeltaFormat {
	pub granularity: Granularity,
	/// Fraction of the next larger unit at which that unit is used instead.
	pub threshold: f64,
	/// Render `in 3 days` / `3 days ago` instead of `3 days`.
	pub add_direction: bool,
}

impl Default for TimedeltaFormat {
	fn default() -> Self {
		Self {
			granularity: Granularity::Second,
			threshold: DEFAULT_TIMEDELTA_THRESHOLD,
			add_direction: false,
		}
	}
}

/// Formats dates and numbers for one locale and timezone.
#[derive(Debug, Clone)]
pub struct Formatter {
	locale: Locale,
	timezone: Timezone,
	rebase: bool,
	dates: chrono::Locale,
	numbers: NumberLocale,
}

impl Formatter {
	pub fn new(locale: Locale, timezone: Timezone) -> Self {
		let dates = date_locale(&locale);
		let numbers = number_locale(&locale);
		Self {
			locale,
			timezone,
			rebase: true,
			dates,
			numbers,
		}
	}

	/// Render instants in UTC instead of the bound timezone.
	pub fn without_rebase(mut self) -> Self {
		self.rebase = false;
		self
	}

	pub fn locale(&self) -> &Locale {
		&self.locale
	}

	pub fn timezone(&self) -> &Timezone {
		&self.timezone
	}

	pub fn format_datetime(&self, instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
		self.render_date(instant, &format.datetime_pattern())
	}

	pub fn format_date(&self, instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
		self.render_date(instant, format.date_pattern())
	}

	pub fn format_time(&self, instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
		self.render_date(instant, format.time_pattern())
	}

	fn render_date(&self, instant: DateTime<Utc>, pattern: &str) -> Result<String> {
		let local: DateTime<Tz> = if self.rebase {
			self.timezone.from_utc(instant)
		} else {
			instant.with_timezone(&Tz::UTC)
		};

		// An unknown specifier surfaces as a fmt::Error from the delayed format.
		let mut out = String::new();
		write!(out, "{}", local.format_localized(pattern, self.dates))
			.map_err(|_| I18nError::InvalidDatePattern(pattern.to_string()))?;
		Ok(out)
	}

	/// Group and round `value` to at most three fraction digits.
	pub fn format_number(&self, value: f64) -> String {
		self.render_decimal(value, 0, DEFAULT_FRACTION_DIGITS)
	}

	/// Like [`format_number`](Self::format_number), but with exactly
	/// `fraction_digits` digits after the separator when given.
	pub fn format_decimal(&self, value: f64, fraction_digits: Option<usize>) -> String {
		match fraction_digits {
			Some(digits) => self.render_decimal(value, digits, digits),
			None => self.format_number(value),
		}
	}

	/// `value` in `currency`, an ISO 4217 code such as `EUR`.
	pub fn format_currency(&self, value: f64, currency: &str) -> Result<String> {
		if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
			return Err(I18nError::InvalidCurrency(currency.to_string()));
		}

		let digits = currency_digits(currency);
		let amount = self.render_decimal(value.abs(), digits, digits);
		let sign = if value < 0.0 && amount.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
			self.numbers.minus_sign()
		} else {
			""
		};
		let symbol = currency_symbol(currency);

		Ok(if self.locale.language() == "en" {
			let gap = if symbol == currency { " " } else { "" };
			format!("{sign}{symbol}{gap}{amount}")
		} else {
			format!("{sign}{amount}{NO_BREAK_SPACE}{symbol}")
		})
	}

	/// `value` as a whole percentage; `0.25` renders as `25%`.
	pub fn format_percent(&self, value: f64) -> String {
		let number = self.render_decimal(value * 100.0, 0, 0);
		if self.locale.language() == "en" {
			format!("{number}%")
		} else {
			format!("{number}{NO_BREAK_SPACE}%")
		}
	}

	/// `value` in scientific notation, such as `1.2345E4`.
	pub fn format_scientific(&self, value: f64) -> String {
		if !value.is_finite() {
			return self.render_decimal(value, 0, 0);
		}
		format!("{value:E}")
			.replace('.', self.numbers.decimal())
			.replace('-', self.numbers.minus_sign())
	}

	fn render_decimal(&self, value: f64, min_fraction: usize, max_fraction: usize) -> String {
		if value.is_nan() {
			return self.numbers.nan().to_string();
		}
		if value.is_infinite() {
			let sign = if value < 0.0 { self.numbers.minus_sign() } else { "" };
			return format!("{sign}{}", self.numbers.infinity());
		}

		let rounded = format!("{:.*}", max_fraction, value.abs());
		let (integer, fraction) = rounded.split_once('.').unwrap_or((&rounded, ""));
		let mut fraction = fraction.trim_end_matches('0').to_string();
		while fraction.len() < min_fraction {
			fraction.push('0');
		}

		let grouped = match integer.parse::<u128>() {
			Ok(n) => n.to_formatted_string(&self.numbers),
			Err(_) => integer.to_string(),
		};
		let is_zero = integer.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');

		let mut out = String::new();
		if value < 0.0 && !is_zero {
			out.push_str(self.numbers.minus_sign());
		}
		out.push_str(&grouped);
		if !fraction.is_empty() {
			out.push_str(self.numbers.decimal());
			out.push_str(&fraction);
		}
		out
	}
}

fn date_locale(locale: &Locale) -> chrono::Locale {
	let language = locale.language();
	let mut candidates = vec![locale.as_str().to_string()];
	if let Some(region) = locale.region() {
		candidates.push(format!("{language}_{region}"));
	}
	candidates.push(format!("{language}_{}", language.to_ascii_uppercase()));
	if language == "en" {
		candidates.push("en_US".to_string());
	}

	candidates
		.iter()
		.find_map(|name| chrono::Locale::try_from(name.as_str()).ok())
		.unwrap_or(chrono::Locale::POSIX)
}

fn number_locale(locale: &Locale) -> NumberLocale {
	NumberLocale::from_name(locale.to_language_tag())
		.or_else(|_| NumberLocale::from_name(locale.language()))
		.unwrap_or(NumberLocale::en)
}

fn currency_symbol(code: &str) -> &str {
	match code {
		"USD" => "$",
		"EUR" => "€",
		"GBP" => "£",
		"JPY" => "¥",
		other => other,
	}
}

fn currency_digits(code: &str) -> usize {
	match code {
		"JPY" | "KRW" | "ISK" => 0,
		_ => 2,
	}
}

impl RequestI18n {
	/// A formatter for this request's locale and timezone.
	pub async fn formatter(&self) -> Result<Formatter> {
		let locale = self.get_locale().await?;
		let timezone = self.get_timezone().await?;
		Ok(Formatter::new(locale, timezone))
	}

	/// Render `delta` in its largest fitting unit, translated through the
	/// request's default domain.
	pub async fn format_timedelta(&self, delta: Duration, format: &TimedeltaFormat) -> Result<String> {
		let locale = self.get_locale().await?;
		let domain = self.domain();

		let seconds = delta.num_milliseconds() as f64 / 1000.0;
		for (unit, unit_seconds, singular, plural) in TIMEDELTA_UNITS {
			let mut value = seconds.abs() / unit_seconds;
			if value < format.threshold && unit != format.granularity {
				continue;
			}
			if unit == format.granularity && value > 0.0 {
				value = value.max(1.0);
			}

			let count = value.round() as u64;
			let rendered = domain.translate_plural_in(&locale, singular, plural, count, &Args::new())?;
			if !format.add_direction {
				return Ok(rendered);
			}

			let template = if seconds >= 0.0 { "in %(time)s" } else { "%(time)s ago" };
			return domain.translate_in(&locale, template, &Args::new().with("time", rendered));
		}

		Ok(String::new())
	}
}

/// Format an instant's date and time for the current request.
pub async fn format_datetime(instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
	RequestI18n::current()?
		.formatter()
		.await?
		.format_datetime(instant, format)
}

pub async fn format_date(instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
	RequestI18n::current()?
		.formatter()
		.await?
		.format_date(instant, format)
}

pub async fn format_time(instant: DateTime<Utc>, format: &DateTimeFormat) -> Result<String> {
	RequestI18n::current()?
		.formatter()
		.await?
		.format_time(instant, format)
}

pub async fn format_timedelta(delta: Duration, format: &TimedeltaFormat) -> Result<String> {
	RequestI18n::current()?.format_timedelta(delta, format).await
}

pub async fn format_number(value: f64) -> Result<String> {
	Ok(RequestI18n::current()?.formatter().await?.format_number(value))
}

pub async fn format_decimal(value: f64, fraction_digits: Option<usize>) -> Result<String> {
	Ok(RequestI18n::current()?
		.formatter()
		.await?
		.format_decimal(value, fraction_digits))
}

pub async fn format_currency(value: f64, currency: &str) -> Result<String> {
	RequestI18n::current()?
		.formatter()
		.await?
		.format_currency(value, currency)
}

pub async fn format_percent(value: f64) -> Result<String> {
	Ok(RequestI18n::current()?.formatter().await?.format_percent(value))
}

pub async fn format_scientific(value: f64) -> Result<String> {
	Ok(RequestI18n::current()?.formatter().await?.format_scientific(value))
}
