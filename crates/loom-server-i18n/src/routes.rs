// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers.

use axum::{extract::Query, Json};
use chrono::{NaiveDateTime, SecondsFormat, Utc};
use loom_common_i18n::{args, translate, DateTimeFormat};
use serde::{Deserialize, Serialize};

use crate::error::ServerI18nError;
use crate::middleware::I18nContext;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LocaleInfo {
	pub locale: String,
	pub language_tag: String,
	pub timezone: String,
	pub available: Vec<String>,
}

pub async fn get_locale_info(
	I18nContext(context): I18nContext,
) -> Result<Json<LocaleInfo>, ServerI18nError> {
	let locale = context.get_locale().await?;
	let timezone = context.get_timezone().await?;
	let available = context
		.app()
		.list_translations()
		.iter()
		.map(ToString::to_string)
		.collect();

	Ok(Json(LocaleInfo {
		locale: locale.to_string(),
		language_tag: locale.to_language_tag(),
		timezone: timezone.name().to_string(),
		available,
	}))
}

#[derive(Debug, Deserialize)]
pub struct HelloQuery {
	pub name: Option<String>,
}

pub async fn get_hello(Query(query): Query<HelloQuery>) -> Result<String, ServerI18nError> {
	let name = query.name.unwrap_or_else(|| "Guest".to_string());
	Ok(translate("Hello %(name)s!", &args! { name = name }).await?)
}

#[derive(Debug, Deserialize)]
pub struct ApplesQuery {
	#[serde(default = "default_count")]
	pub count: u64,
}

fn default_count() -> u64 {
	1
}

pub async fn get_apples(
	I18nContext(context): I18nContext,
	Query(query): Query<ApplesQuery>,
) -> Result<String, ServerI18nError> {
	Ok(context
		.translate_plural("%(num)s Apple", "%(num)s Apples", query.count, &args! {})
		.await?)
}

#[derive(Debug, Deserialize)]
pub struct TimeQuery {
	/// Wall-clock time in the request's timezone, `YYYY-MM-DDTHH:MM:SS`.
	pub at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeInfo {
	pub timezone: String,
	pub utc: String,
	pub local: String,
	/// `local` rendered in the request locale.
	pub formatted: String,
}

pub async fn get_time(
	I18nContext(context): I18nContext,
	Query(query): Query<TimeQuery>,
) -> Result<Json<TimeInfo>, ServerI18nError> {
	let timezone = context.get_timezone().await?;

	let (utc, local) = match query.at {
		Some(at) => {
			let naive = NaiveDateTime::parse_from_str(&at, LOCAL_TIME_FORMAT)
				.map_err(|e| ServerI18nError::BadRequest(format!("invalid time {at:?}: {e}")))?;
			let utc = context.to_utc(naive).await?;
			(utc, context.to_user_timezone(utc).await?)
		}
		None => {
			let now = Utc::now();
			(now, context.to_user_timezone(now).await?)
		}
	};

	let formatted = context
		.formatter()
		.await?
		.format_datetime(utc, &DateTimeFormat::Medium)?;

	Ok(Json(TimeInfo {
		timezone: timezone.name().to_string(),
		utc: utc.to_rfc3339_opts(SecondsFormat::Secs, true),
		local: local.to_rfc3339_opts(SecondsFormat::Secs, false),
		formatted,
	}))
}
