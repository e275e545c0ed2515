// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers for building `.mo` catalogs in memory.
//!
//! Available to this crate's tests and, with the `testing` feature, to
//! downstream crates.

use std::io;
use std::path::{Path, PathBuf};

const MO_MAGIC: u32 = 0x950412de;
const HEADER_SIZE: u32 = 28;

/// Builds a little-endian GNU `.mo` file.
#[derive(Debug, Clone)]
pub struct MoBuilder {
	plural_forms: String,
	entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Default for MoBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl MoBuilder {
	pub fn new() -> Self {
		Self {
			plural_forms: "nplurals=2; plural=(n != 1);".to_string(),
			entries: Vec::new(),
		}
	}

	pub fn plural_forms(mut self, rule: impl Into<String>) -> Self {
		self.plural_forms = rule.into();
		self
	}

	pub fn message(mut self, msgid: &str, translation: &str) -> Self {
		self
			.entries
			.push((msgid.as_bytes().to_vec(), translation.as_bytes().to_vec()));
		self
	}

	pub fn plural(mut self, singular: &str, plural: &str, forms: &[&str]) -> Self {
		self.entries.push((
			join_nul(&[singular, plural]),
			join_nul(forms),
		));
		self
	}

	pub fn context(mut self, context: &str, msgid: &str, translation: &str) -> Self {
		self.entries.push((
			format!("{context}\x04{msgid}").into_bytes(),
			translation.as_bytes().to_vec(),
		));
		self
	}

	pub fn context_plural(
		mut self,
		context: &str,
		singular: &str,
		plural: &str,
		forms: &[&str],
	) -> Self {
		let key = format!("{context}\x04{singular}");
		self
			.entries
			.push((join_nul(&[key.as_str(), plural]), join_nul(forms)));
		self
	}

	pub fn build(&self) -> Vec<u8> {
		let header = format!(
			"Content-Type: text/plain; charset=UTF-8\nPlural-Forms: {}\n",
			self.plural_forms
		);
		let mut entries = self.entries.clone();
		entries.push((Vec::new(), header.into_bytes()));
		entries.sort_by(|a, b| a.0.cmp(&b.0));

		let count = entries.len() as u32;
		let originals_offset = HEADER_SIZE;
		let translations_offset = originals_offset + 8 * count;
		let strings_offset = translations_offset + 8 * count;

		let mut tables = Vec::new();
		let mut strings = Vec::new();
		let mut descriptors = Vec::with_capacity(entries.len() * 2);
		for (original, _) in &entries {
			descriptors.push(push_string(&mut strings, original, strings_offset));
		}
		for (_, translation) in &entries {
			descriptors.push(push_string(&mut strings, translation, strings_offset));
		}
		for (len, offset) in descriptors {
			tables.extend_from_slice(&len.to_le_bytes());
			tables.extend_from_slice(&offset.to_le_bytes());
		}

		let mut out = Vec::with_capacity((strings_offset as usize) + strings.len());
		for word in [
			MO_MAGIC,
			0,
			count,
			originals_offset,
			translations_offset,
			0,
			strings_offset,
		] {
			out.extend_from_slice(&word.to_le_bytes());
		}
		out.extend_from_slice(&tables);
		out.extend_from_slice(&strings);
		out
	}
}

fn join_nul(parts: &[&str]) -> Vec<u8> {
	parts.join("\0").into_bytes()
}

fn push_string(strings: &mut Vec<u8>, value: &[u8], base: u32) -> (u32, u32) {
	let offset = base + strings.len() as u32;
	strings.extend_from_slice(value);
	strings.push(0);
	(value.len() as u32, offset)
}

/// Write `bytes` to `<dir>/<locale>/LC_MESSAGES/<domain>.mo`.
pub fn write_catalog(dir: &Path, locale: &str, domain: &str, bytes: &[u8]) -> io::Result<PathBuf> {
	let messages = dir.join(locale).join("LC_MESSAGES");
	std::fs::create_dir_all(&messages)?;
	let path = messages.join(format!("{domain}.mo"));
	std::fs::write(&path, bytes)?;
	Ok(path)
}

/// German fixture for the default `messages` domain.
pub fn german_catalog() -> Vec<u8> {
	MoBuilder::new()
		.message("Hello %(name)s!", "Hallo %(name)s!")
		.message("Yes", "Ja")
		.message("Test %s", "Test %s")
		.plural("%(num)s Apple", "%(num)s Apples", &["%(num)s Apfel", "%(num)s Äpfel"])
		.context("button", "Hello Guest!", "Hallo Gast!")
		.context_plural(
			"button",
			"%(num)s Apple",
			"%(num)s Apples",
			&["%(num)s Apfel-Knopf", "%(num)s Äpfel-Knöpfe"],
		)
		.plural("%(num)s day", "%(num)s days", &["%(num)s Tag", "%(num)s Tage"])
		.plural("%(num)s hour", "%(num)s hours", &["%(num)s Stunde", "%(num)s Stunden"])
		.message("in %(time)s", "in %(time)s")
		.message("%(time)s ago", "vor %(time)s")
		.build()
}

/// German fixture for a secondary `test` domain.
pub fn german_test_domain_catalog() -> Vec<u8> {
	MoBuilder::new().message("first", "erste").build()
}

/// French fixture for the default `messages` domain.
pub fn french_catalog() -> Vec<u8> {
	MoBuilder::new()
		.plural_forms("nplurals=2; plural=(n > 1);")
		.message("Hello World!", "Bonjour le monde!")
		.message("Yes", "Oui")
		.plural("%(num)s Apple", "%(num)s Apples", &["%(num)s pomme", "%(num)s pommes"])
		.build()
}

/// Write the German and French fixtures into `dir`.
pub fn write_fixtures(dir: &Path) -> io::Result<()> {
	write_catalog(dir, "de", "messages", &german_catalog())?;
	write_catalog(dir, "de", "test", &german_test_domain_catalog())?;
	write_catalog(dir, "fr", "messages", &french_catalog())?;
	Ok(())
}
