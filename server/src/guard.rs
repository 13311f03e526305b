//! Admin authorization collaborator
//!
//! The host application decides who may manage settings. The admin routes
//! only ask the injected [`AdminGuard`].

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait AdminGuard: Debug + Send + Sync {
	/// Returns a subject to log on success, `Error::PermissionDenied` otherwise
	async fn authorize(&self, headers: &HeaderMap) -> ClResult<Box<str>>;
}

/// Accepts a single static bearer token
pub struct TokenAdminGuard {
	token: Box<str>,
}

impl TokenAdminGuard {
	pub fn new(token: impl Into<Box<str>>) -> ClResult<Self> {
		let token = token.into();
		if token.trim().is_empty() {
			return Err(Error::ConfigError("admin token must not be empty".into()));
		}
		Ok(Self { token })
	}
}

impl Debug for TokenAdminGuard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenAdminGuard").finish_non_exhaustive()
	}
}

/// Compares without an early exit on the first differing byte
fn token_eq(a: &[u8], b: &[u8]) -> bool {
	a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait]
impl AdminGuard for TokenAdminGuard {
	async fn authorize(&self, headers: &HeaderMap) -> ClResult<Box<str>> {
		let token = headers
			.get(header::AUTHORIZATION)
			.and_then(|h| h.to_str().ok())
			.and_then(|h| h.strip_prefix("Bearer "))
			.map(str::trim)
			.ok_or(Error::PermissionDenied)?;

		if token_eq(token.as_bytes(), self.token.as_bytes()) {
			Ok("admin-token".into())
		} else {
			Err(Error::PermissionDenied)
		}
	}
}


// vim: ts=4
