//! Settings service for Tabula.
//!
//! Sits between callers (HTTP handlers, application code) and a
//! [`StoreAdapter`](tabula_types::store_adapter::StoreAdapter). Values are
//! encoded to text on write and decoded on read, reads are served from a
//! process-local snapshot, and writes are validated before they reach the store.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod codec;
pub mod config;
pub mod prelude;
pub mod repository;
pub mod service;
pub mod validate;

pub use cache::SettingsCache;
pub use config::SettingsConfig;
pub use repository::SettingsRepository;
pub use service::SettingsService;

// vim: ts=4
