//! Scenaris domain types and pure helpers.
//!
//! This crate has no internal dependencies. Everything here is usable by
//! both the API server and the worker without pulling in sqlx or axum.

pub mod engines;
pub mod error;
pub mod export;
pub mod hashing;
pub mod manifest;
pub mod naming;
pub mod types;
