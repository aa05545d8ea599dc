//! Tilechip - Library for importing images into fixed-capacity tile chips
//!
//! This library provides functionality to:
//! - Reconcile an image palette against an existing, bounded palette
//! - Rewrite image pixels as indices into that palette
//! - Cut indexed images into fixed-size tiles and commit them to a sprite
//!   chip, deduplicating or keeping positions
//! - Persist the resulting chips as JSON

pub mod chips;
pub mod cli;
pub mod color;
pub mod config;
pub mod import;
pub mod output;
