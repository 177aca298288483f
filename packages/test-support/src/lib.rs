//! Shared helpers for the websites test suites.
//!
//! Quiet, idempotent tracing setup for test binaries plus ULID-based
//! generators so parallel or repeated runs never collide on the unique
//! `name` column.

pub mod logging;
pub mod unique;

pub use unique::{unique_name, unique_url};
