//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`estimate`] - Export size estimate without network traffic
//! - [`export`] - Bounding-box export to a stitched image file

pub mod common;
pub mod config;
pub mod estimate;
pub mod export;
