//! Shared types, adapter traits, and the error type for Tabula.
//!
//! This crate holds what the core, the store adapters and the HTTP layer
//! all need to agree on, so adapter crates do not depend on the core.

#![forbid(unsafe_code)]

pub mod audit;
pub mod error;
pub mod prelude;
pub mod setting;
pub mod store_adapter;
pub mod types;
pub mod value;

// vim: ts=4
