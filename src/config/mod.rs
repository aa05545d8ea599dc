//! Configuration module
//!
//! Provides types and parsing for `tilechip.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
