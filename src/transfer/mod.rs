//! File transfer module.
//!
//! This module provides:
//! - The [`Transfer`] trait the batch downloader fetches files through
//! - An HTTP implementation streaming bodies to disk

pub mod client;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpTransfer;

/// A file saved by a [`Transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Where the file was written, named after the server's filename.
    pub path: PathBuf,

    /// Number of bytes written.
    pub bytes: u64,
}

/// Fetches one URL into a directory.
///
/// Implementations save the body under the authoritative filename supplied by
/// the server, which may differ from the name the caller expects.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedFile>;
}
