//! Repository contract for the domain layer.

pub mod websites;

pub use websites::{Website, WebsiteRepo};
