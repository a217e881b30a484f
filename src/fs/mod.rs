//! Filesystem module.
//!
//! Provides:
//! - Directory management and temporary download paths
//! - Filename generation and sanitizing

pub mod naming;
pub mod paths;

pub use naming::{filename_from_disposition, inject_date_into_filename, sanitize_filename};
pub use paths::{ensure_dir, partial_path};
