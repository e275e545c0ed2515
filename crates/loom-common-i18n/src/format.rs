// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named placeholder substitution for translated messages.
//!
//! Catalogs use gettext's `python-format` convention: `%(name)s`, `%(num)d`,
//! `%(ratio).2f`, with `%%` for a literal percent sign. Substitution only
//! happens when at least one argument is supplied, so messages such as
//! `"Test %s"` pass through untouched when rendered without arguments.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Errors raised while substituting arguments into a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
	#[error("placeholder references missing argument {0:?}")]
	MissingArgument(String),

	#[error("unsupported conversion '%{0}'")]
	UnsupportedConversion(char),

	#[error("positional placeholder at byte {0} requires named arguments")]
	PositionalPlaceholder(usize),

	#[error("incomplete placeholder at byte {0}")]
	Incomplete(usize),

	#[error("argument {name:?} cannot be formatted with '%{conversion}'")]
	TypeMismatch { name: String, conversion: char },
}

/// A substitution value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
	Str(String),
	Int(i64),
	/// Unsigned values above `i64::MAX`.
	UInt(u64),
	Float(f64),
}

impl fmt::Display for Arg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arg::Str(s) => f.write_str(s),
			Arg::Int(n) => write!(f, "{n}"),
			Arg::UInt(n) => write!(f, "{n}"),
			Arg::Float(x) => write!(f, "{x}"),
		}
	}
}

impl From<&str> for Arg {
	fn from(value: &str) -> Self {
		Arg::Str(value.to_string())
	}
}

impl From<String> for Arg {
	fn from(value: String) -> Self {
		Arg::Str(value)
	}
}

impl From<&String> for Arg {
	fn from(value: &String) -> Self {
		Arg::Str(value.clone())
	}
}

macro_rules! int_arg {
	($($t:ty),*) => {
		$(
			impl From<$t> for Arg {
				fn from(value: $t) -> Self {
					Arg::Int(i64::from(value))
				}
			}
		)*
	};
}

int_arg!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_arg {
	($($t:ty),*) => {
		$(
			impl From<$t> for Arg {
				fn from(value: $t) -> Self {
					match i64::try_from(value) {
						Ok(n) => Arg::Int(n),
						Err(_) => match u64::try_from(value) {
							Ok(n) => Arg::UInt(n),
							Err(_) => Arg::Str(value.to_string()),
						},
					}
				}
			}
		)*
	};
}

wide_int_arg!(u64, usize, isize, i128, u128);

impl From<f32> for Arg {
	fn from(value: f32) -> Self {
		Arg::Float(value as f64)
	}
}

impl From<f64> for Arg {
	fn from(value: f64) -> Self {
		Arg::Float(value)
	}
}

/// Named substitution arguments for a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(BTreeMap<String, Arg>);

impl Args {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Arg>) {
		self.0.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&Arg> {
		self.0.get(name)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for Args {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut args = Args::new();
		for (k, v) in iter {
			args.insert(k, v);
		}
		args
	}
}

/// Build [`Args`] from `name = value` pairs.
///
/// ```
/// use loom_common_i18n::args;
///
/// let args = args! { name = "Peter", num = 3 };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
	() => { $crate::Args::new() };
	($($name:ident = $value:expr),+ $(,)?) => {
		$crate::Args::new()$(.with(stringify!($name), $value))+
	};
}

/// Render `template` with `args`, returning it unchanged when `args` is empty.
pub fn format_message(template: &str, args: &Args) -> Result<String, FormatError> {
	if args.is_empty() {
		return Ok(template.to_string());
	}
	substitute(template, args)
}

#[derive(Default)]
struct Spec {
	left_align: bool,
	zero_pad: bool,
	plus_sign: bool,
	width: Option<usize>,
	precision: Option<usize>,
}

/// Substitute named placeholders unconditionally.
pub fn substitute(template: &str, args: &Args) -> Result<String, FormatError> {
	let mut out = String::with_capacity(template.len());
	let mut chars = template.char_indices().peekable();

	while let Some((pos, c)) = chars.next() {
		if c != '%' {
			out.push(c);
			continue;
		}

		match chars.next() {
			Some((_, '%')) => out.push('%'),
			Some((_, '(')) => {
				let mut name = String::new();
				let mut closed = false;
				for (_, nc) in chars.by_ref() {
					if nc == ')' {
						closed = true;
						break;
					}
					name.push(nc);
				}
				if !closed {
					return Err(FormatError::Incomplete(pos));
				}

				let mut spec = Spec::default();
				while let Some(&(_, flag)) = chars.peek() {
					match flag {
						'-' => spec.left_align = true,
						'0' => spec.zero_pad = true,
						'+' => spec.plus_sign = true,
						' ' | '#' => {}
						_ => break,
					}
					chars.next();
				}
				spec.width = take_number(&mut chars);
				if let Some(&(_, '.')) = chars.peek() {
					chars.next();
					spec.precision = Some(take_number(&mut chars).unwrap_or(0));
				}

				let (_, conversion) = chars.next().ok_or(FormatError::Incomplete(pos))?;
				let value = args
					.get(&name)
					.ok_or_else(|| FormatError::MissingArgument(name.clone()))?;
				let rendered = render(&name, value, conversion, &spec)?;
				pad_into(&mut out, &rendered, &spec, conversion);
			}
			Some(_) => return Err(FormatError::PositionalPlaceholder(pos)),
			None => return Err(FormatError::Incomplete(pos)),
		}
	}

	Ok(out)
}

fn take_number(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<usize> {
	let mut digits = String::new();
	while let Some(&(_, d)) = chars.peek() {
		if !d.is_ascii_digit() {
			break;
		}
		digits.push(d);
		chars.next();
	}
	digits.parse().ok()
}

fn render(name: &str, value: &Arg, conversion: char, spec: &Spec) -> Result<String, FormatError> {
	let mismatch = || FormatError::TypeMismatch {
		name: name.to_string(),
		conversion,
	};

	let rendered = match conversion {
		's' => match (value, spec.precision) {
			(Arg::Str(s), Some(p)) => s.chars().take(p).collect(),
			_ => value.to_string(),
		},
		'd' | 'i' => {
			let (digits, negative) = match value {
				Arg::Int(n) => (n.to_string(), *n < 0),
				Arg::UInt(n) => (n.to_string(), false),
				Arg::Float(x) => {
					let n = x.trunc() as i64;
					(n.to_string(), n < 0)
				}
				Arg::Str(_) => return Err(mismatch()),
			};
			if spec.plus_sign && !negative {
				format!("+{digits}")
			} else {
				digits
			}
		}
		'f' | 'F' => {
			let x = match value {
				Arg::Int(n) => *n as f64,
				Arg::UInt(n) => *n as f64,
				Arg::Float(x) => *x,
				Arg::Str(_) => return Err(mismatch()),
			};
			let precision = spec.precision.unwrap_or(6);
			if spec.plus_sign && x >= 0.0 {
				format!("+{x:.precision$}")
			} else {
				format!("{x:.precision$}")
			}
		}
		other => return Err(FormatError::UnsupportedConversion(other)),
	};

	Ok(rendered)
}

fn pad_into(out: &mut String, rendered: &str, spec: &Spec, conversion: char) {
	let len = rendered.chars().count();
	let width = spec.width.unwrap_or(0);
	if len >= width {
		out.push_str(rendered);
		return;
	}

	let fill = width - len;
	if spec.left_align {
		out.push_str(rendered);
		out.extend(std::iter::repeat(' ').take(fill));
	} else if spec.zero_pad && conversion != 's' {
		let (sign, digits) = match rendered.strip_prefix(['-', '+']) {
			Some(rest) => (&rendered[..1], rest),
			None => ("", rendered),
		};
		out.push_str(sign);
		out.extend(std::iter::repeat('0').take(fill));
		out.push_str(digits);
	} else {
		out.extend(std::iter::repeat(' ').take(fill));
		out.push_str(rendered);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_args_leaves_template_untouched() {
		assert_eq!(format_message("Test %s", &Args::new()).unwrap(), "Test %s");
		assert_eq!(format_message("100%", &Args::new()).unwrap(), "100%");
	}

	#[test]
	fn test_named_string() {
		let args = args! { name = "Peter" };
		assert_eq!(
			format_message("Hallo %(name)s!", &args).unwrap(),
			"Hallo Peter!"
		);
	}

	#[test]
	fn test_int_conversions() {
		let args = args! { num = 3 };
		assert_eq!(format_message("%(num)s Äpfel", &args).unwrap(), "3 Äpfel");
		assert_eq!(format_message("%(num)d Äpfel", &args).unwrap(), "3 Äpfel");
		assert_eq!(format_message("[%(num)03d]", &args).unwrap(), "[003]");
		assert_eq!(format_message("[%(num)-3d]", &args).unwrap(), "[3  ]");
		assert_eq!(format_message("[%(num)+d]", &args).unwrap(), "[+3]");
	}

	#[test]
	fn test_large_unsigned_counts_do_not_wrap() {
		let args = args! { num = u64::MAX };
		assert_eq!(args.get("num"), Some(&Arg::UInt(u64::MAX)));
		assert_eq!(
			format_message("%(num)s Apples", &args).unwrap(),
			"18446744073709551615 Apples"
		);
		assert_eq!(
			format_message("%(num)d Apples", &args).unwrap(),
			"18446744073709551615 Apples"
		);
		assert_eq!(
			format_message("[%(num)+d]", &args).unwrap(),
			"[+18446744073709551615]"
		);
	}

	#[test]
	fn test_unsigned_within_range_is_int() {
		assert_eq!(Arg::from(42u64), Arg::Int(42));
		assert_eq!(Arg::from(7usize), Arg::Int(7));
		assert_eq!(Arg::from(-3isize), Arg::Int(-3));
	}

	#[test]
	fn test_float_precision() {
		let args = args! { ratio = 0.5 };
		assert_eq!(format_message("%(ratio).2f", &args).unwrap(), "0.50");
		assert_eq!(format_message("%(ratio)f", &args).unwrap(), "0.500000");
	}

	#[test]
	fn test_escaped_percent() {
		let args = args! { pct = 40 };
		assert_eq!(format_message("%(pct)d%%", &args).unwrap(), "40%");
	}

	#[test]
	fn test_missing_argument_is_error() {
		let args = args! { name = "Peter" };
		assert_eq!(
			format_message("Hello %(user)s", &args),
			Err(FormatError::MissingArgument("user".to_string()))
		);
	}

	#[test]
	fn test_positional_with_args_is_error() {
		let args = args! { name = "Peter" };
		assert_eq!(
			format_message("Test %s", &args),
			Err(FormatError::PositionalPlaceholder(5))
		);
	}

	#[test]
	fn test_string_with_numeric_conversion_is_error() {
		let args = args! { name = "Peter" };
		assert!(matches!(
			format_message("%(name)d", &args),
			Err(FormatError::TypeMismatch { .. })
		));
	}

	#[test]
	fn test_incomplete_placeholders() {
		let args = args! { name = "Peter" };
		assert_eq!(
			format_message("oops %(name", &args),
			Err(FormatError::Incomplete(5))
		);
		assert_eq!(
			format_message("trailing %", &args),
			Err(FormatError::Incomplete(9))
		);
		assert_eq!(
			format_message("%(name)", &args),
			Err(FormatError::Incomplete(0))
		);
	}

	#[test]
	fn test_unsupported_conversion() {
		let args = args! { name = "Peter" };
		assert_eq!(
			format_message("%(name)x", &args),
			Err(FormatError::UnsupportedConversion('x'))
		);
	}

	#[test]
	fn test_args_from_iter() {
		let args: Args = vec![("a", "1"), ("b", "2")].into_iter().collect();
		assert_eq!(args.len(), 2);
		assert_eq!(args.get("a"), Some(&Arg::Str("1".to_string())));
	}
}
