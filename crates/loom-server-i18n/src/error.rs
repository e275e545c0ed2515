// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use loom_common_i18n::I18nError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerI18nError {
	#[error(transparent)]
	I18n(#[from] I18nError),

	#[error("i18n middleware is not installed on this route")]
	MissingContext,

	#[error("{0}")]
	BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ServerI18nError {
	fn code(&self) -> (StatusCode, &'static str) {
		match self {
			ServerI18nError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
			ServerI18nError::MissingContext => (StatusCode::INTERNAL_SERVER_ERROR, "missing_context"),
			ServerI18nError::I18n(e) if e.is_selector_error() => {
				(StatusCode::INTERNAL_SERVER_ERROR, "selector_failed")
			}
			ServerI18nError::I18n(I18nError::NonexistentLocalTime { .. }) => {
				(StatusCode::BAD_REQUEST, "nonexistent_local_time")
			}
			ServerI18nError::I18n(I18nError::InvalidLocale(_)) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "invalid_locale")
			}
			ServerI18nError::I18n(I18nError::InvalidTimezone(_)) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "invalid_timezone")
			}
			ServerI18nError::I18n(_) => (StatusCode::INTERNAL_SERVER_ERROR, "i18n_error"),
		}
	}
}

impl IntoResponse for ServerI18nError {
	fn into_response(self) -> Response {
		let (status, error) = self.code();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(
			status,
			Json(ErrorResponse {
				error: error.to_string(),
				message: self.to_string(),
			}),
		)
			.into_response()
	}
}
