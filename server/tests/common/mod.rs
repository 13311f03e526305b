//! Test app builder and request helpers

#![allow(dead_code)]

use axum::{
	Router,
	body::{Body, to_bytes},
	http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use tabula::{AppBuilder, TokenAdminGuard, TracingAuditSink, routes};
use tabula_store_adapter_sqlite::StoreAdapterSqlite;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

/// Router over a fresh SQLite store, the TempDir keeps the database alive
pub async fn create_test_app() -> (Router, TempDir) {
	setup_test_logging();
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = StoreAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	let mut builder = AppBuilder::new();
	builder
		.store_adapter(Arc::new(store))
		.audit_sink(Arc::new(TracingAuditSink))
		.admin_guard(Arc::new(TokenAdminGuard::new(ADMIN_TOKEN).expect("Valid token")));
	let app = builder.build().expect("Failed to build app");

	(routes::init(app), temp_dir)
}

/// Sends an authorized request and returns the status and the JSON body (Null if empty)
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	send_as(router, Some(ADMIN_TOKEN), method, uri, body).await
}

pub async fn send_as(
	router: &Router,
	token: Option<&str>,
	method: Method,
	uri: &str,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut req = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
	}
	let req = match body {
		Some(body) => req
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string())),
		None => req.body(Body::empty()),
	}
	.expect("Valid request");

	let response = router.clone().oneshot(req).await.expect("Infallible");
	let status = response.status();
	let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("Readable body");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or(Value::Null)
	};
	(status, json)
}

// vim: ts=4
