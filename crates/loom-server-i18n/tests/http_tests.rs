// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the i18n HTTP endpoints.
//!
//! Tests cover:
//! - Locale negotiation from `Accept-Language` and `?locale=`
//! - Translations and plurals rendered in the request locale
//! - Timezone selection and conversion

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header::ACCEPT_LANGUAGE, Request, StatusCode},
	Router,
};
use loom_common_i18n::testing::write_fixtures;
use loom_server_config::I18nConfig;
use loom_server_i18n::{build_i18n, create_router};
use tempfile::TempDir;
use tower::ServiceExt;

fn setup_test_app() -> (Router, TempDir) {
	let dir = tempfile::tempdir().unwrap();
	write_fixtures(dir.path()).unwrap();
	let config = I18nConfig {
		default_timezone: "Europe/Berlin".to_string(),
		translation_directories: vec![dir.path().to_path_buf()],
		..Default::default()
	};
	let i18n = build_i18n(&config, None).unwrap();
	(create_router(Arc::new(i18n)), dir)
}

async fn get(app: Router, uri: &str, accept_language: Option<&str>) -> (StatusCode, String) {
	let mut request = Request::builder().uri(uri);
	if let Some(value) = accept_language {
		request = request.header(ACCEPT_LANGUAGE, value);
	}
	let response = app
		.oneshot(request.body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, String::from_utf8(body.to_vec()).unwrap())
}

// ============================================================================
// Locale Tests
// ============================================================================

#[tokio::test]
async fn test_locale_negotiated_from_header() {
	let (app, _dir) = setup_test_app();
	let (status, body) = get(app, "/locale", Some("de-AT,de;q=0.9,en;q=0.5")).await;
	assert_eq!(status, StatusCode::OK);

	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["locale"], "de");
	assert_eq!(json["language_tag"], "de");
	assert_eq!(json["timezone"], "Europe/Berlin");
	let available: Vec<&str> = json["available"]
		.as_array()
		.unwrap()
		.iter()
		.map(|v| v.as_str().unwrap())
		.collect();
	assert!(available.contains(&"de"));
	assert!(available.contains(&"fr"));
	assert!(available.contains(&"en"));
}

#[tokio::test]
async fn test_unsupported_language_uses_default() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app, "/locale", Some("ja")).await;
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["locale"], "en");
}

#[tokio::test]
async fn test_query_locale_overrides_header() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app, "/hello?locale=fr&name=Ada", Some("de")).await;
	// The French fixture has no greeting, so the source string comes back.
	assert_eq!(body, "Hello Ada!");
}

// ============================================================================
// Translation Tests
// ============================================================================

#[tokio::test]
async fn test_hello_translated() {
	let (app, _dir) = setup_test_app();
	let (status, body) = get(app, "/hello?name=Peter", Some("de")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, "Hallo Peter!");
}

#[tokio::test]
async fn test_hello_without_header_is_untranslated() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app, "/hello", None).await;
	assert_eq!(body, "Hello Guest!");
}

#[tokio::test]
async fn test_plural_forms_follow_catalog_rules() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app.clone(), "/apples?count=1", Some("de")).await;
	assert_eq!(body, "1 Apfel");
	let (_, body) = get(app.clone(), "/apples?count=5", Some("de")).await;
	assert_eq!(body, "5 Äpfel");

	// French treats zero as singular.
	let (_, body) = get(app.clone(), "/apples?count=0", Some("fr")).await;
	assert_eq!(body, "0 pomme");
	let (_, body) = get(app, "/apples?count=0", Some("en")).await;
	assert_eq!(body, "0 Apples");
}

#[tokio::test]
async fn test_invalid_count_rejected() {
	let (app, _dir) = setup_test_app();
	let (status, _) = get(app, "/apples?count=many", Some("de")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Timezone Tests
// ============================================================================

#[tokio::test]
async fn test_time_in_default_timezone() {
	let (app, _dir) = setup_test_app();
	let (status, body) = get(app, "/time?at=2010-04-12T15:46:00", None).await;
	assert_eq!(status, StatusCode::OK);

	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["timezone"], "Europe/Berlin");
	assert_eq!(json["utc"], "2010-04-12T13:46:00Z");
	assert_eq!(json["local"], "2010-04-12T15:46:00+02:00");
}

#[tokio::test]
async fn test_time_formatted_in_request_locale() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app.clone(), "/time?at=2010-04-12T15:46:00", Some("de")).await;
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["formatted"], "12 Apr 2010 15:46:00");

	let (_, body) = get(app, "/time?at=2010-03-01T15:46:00", Some("de")).await;
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["formatted"], "1 Mär 2010 15:46:00");
}

#[tokio::test]
async fn test_time_with_query_timezone() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app, "/time?tz=America/New_York&at=2010-01-15T08:00:00", None).await;
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["timezone"], "America/New_York");
	assert_eq!(json["utc"], "2010-01-15T13:00:00Z");
}

#[tokio::test]
async fn test_time_with_percent_encoded_timezone() {
	let (app, _dir) = setup_test_app();
	let (status, body) = get(
		app,
		"/time?tz=America%2FNew_York&at=2010-01-15T08:00:00",
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["timezone"], "America/New_York");
	assert_eq!(json["utc"], "2010-01-15T13:00:00Z");
	assert_eq!(json["local"], "2010-01-15T08:00:00-05:00");
}

#[tokio::test]
async fn test_locale_info_with_percent_encoded_timezone() {
	let (app, _dir) = setup_test_app();
	let (_, body) = get(app, "/locale?tz=Asia%2FTokyo&locale=de", None).await;
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["locale"], "de");
	assert_eq!(json["timezone"], "Asia/Tokyo");
}

#[tokio::test]
async fn test_nonexistent_local_time_is_error() {
	let (app, _dir) = setup_test_app();
	// Clocks in Berlin jumped from 02:00 to 03:00 on this date.
	let (status, body) = get(app, "/time?at=2010-03-28T02:30:00", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["error"], "nonexistent_local_time");
}

#[tokio::test]
async fn test_malformed_time_is_bad_request() {
	let (app, _dir) = setup_test_app();
	let (status, body) = get(app, "/time?at=yesterday", None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	let json: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(json["error"], "bad_request");
}
