// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request i18n middleware and extractor for Axum.
//!
//! [`i18n_layer`] creates a [`RequestI18n`] for every request, stores it in
//! the request extensions and runs the rest of the stack inside its
//! task-local scope. Handlers can then use either the [`I18nContext`]
//! extractor or the free functions in `loom_common_i18n`.
//!
//! ```ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let app = Router::new()
//!     .route("/hello", get(hello))
//!     .layer(from_fn_with_state(i18n.clone(), i18n_layer));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
	body::Body,
	extract::{ConnectInfo, FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::Response,
};
use loom_common_i18n::{I18n, RequestHandle, RequestI18n};
use tracing::instrument;

use crate::error::ServerI18nError;

#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn i18n_layer(State(app): State<Arc<I18n>>, request: Request<Body>, next: Next) -> Response {
	let (parts, body) = request.into_parts();

	let mut handle = RequestHandle::from_parts(&parts);
	if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
		handle = handle.with_remote_addr(*addr);
	}

	let context = app.request(handle);
	let mut request = Request::from_parts(parts, body);
	request.extensions_mut().insert(Arc::clone(&context));

	context.scope(next.run(request)).await
}

/// Extractor for the request's i18n context.
///
/// Rejects with 500 when [`i18n_layer`] is not installed.
pub struct I18nContext(pub Arc<RequestI18n>);

impl<S> FromRequestParts<S> for I18nContext
where
	S: Send + Sync,
{
	type Rejection = ServerI18nError;

	#[instrument(name = "I18nContext::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<Arc<RequestI18n>>()
			.cloned()
			.map(I18nContext)
			.ok_or(ServerI18nError::MissingContext)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
	use tower::ServiceExt;

	async fn remote_addr(I18nContext(context): I18nContext) -> String {
		context
			.request()
			.remote_addr()
			.map(|addr| addr.to_string())
			.unwrap_or_default()
	}

	async fn locale(I18nContext(context): I18nContext) -> Result<String, ServerI18nError> {
		Ok(context.get_locale().await?.to_string())
	}

	fn app() -> Arc<I18n> {
		Arc::new(I18n::builder().default_locale("fr").build().unwrap())
	}

	#[tokio::test]
	async fn test_extractor_without_layer_is_rejected() {
		let router = Router::new().route("/", get(locale));
		let response = router
			.oneshot(Request::get("/").body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[tokio::test]
	async fn test_layer_installs_context() {
		let router = Router::new()
			.route("/", get(locale))
			.layer(from_fn_with_state(app(), i18n_layer));
		let response = router
			.oneshot(Request::get("/").body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		assert_eq!(&body[..], b"fr");
	}

	#[tokio::test]
	async fn test_connect_info_becomes_remote_addr() {
		let router = Router::new()
			.route("/", get(remote_addr))
			.layer(from_fn_with_state(app(), i18n_layer));
		let mut request = Request::get("/").body(Body::empty()).unwrap();
		let addr: SocketAddr = "203.0.113.9:4000".parse().unwrap();
		request.extensions_mut().insert(ConnectInfo(addr));

		let response = router.oneshot(request).await.unwrap();
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		assert_eq!(&body[..], b"203.0.113.9:4000");
	}
}
