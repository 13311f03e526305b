//! Tabula is a key-value settings store with typed values.
//!
//! # Features
//!
//! - Typed values (strings, numbers, booleans, lists, objects) over a text column
//! - Process-local read cache, invalidated on every local write
//! - Field validation and protected system settings
//! - Optional audit sink for every successful write
//! - Admin HTTP API (list, search, create, update, delete, bulk update)
//!
//! The store itself is pluggable through
//! [`StoreAdapter`](tabula_types::store_adapter::StoreAdapter), see
//! `tabula-store-adapter-sqlite` for the default one.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod audit;
pub mod extract;
pub mod guard;
pub mod handler;
pub mod middleware;
pub mod prelude;
pub mod routes;
pub mod types;

pub use crate::app::{App, AppBuilder, AppState};
pub use crate::audit::TracingAuditSink;
pub use crate::guard::{AdminGuard, TokenAdminGuard};

pub use tabula_core::{SettingsConfig, SettingsService};
pub use tabula_types::{setting, store_adapter, value};

// vim: ts=4
