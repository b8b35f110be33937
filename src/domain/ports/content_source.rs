//! Content Source Port
//!
//! Reads the local content tree that gets mirrored into the bucket.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::value_objects::ContentHash;

/// Content source failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("source folder not found: {0}")]
    MissingRoot(PathBuf),

    #[error("invalid ignore file {path}: {message}")]
    InvalidIgnore { path: PathBuf, message: String },

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// A file in the local content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalObject {
    /// Bucket key (forward slashes, no leading slash)
    pub key: String,
    pub path: PathBuf,
    pub hash: ContentHash,
    pub size: u64,
    pub content_type: String,
}

/// Local content tree
pub trait ContentSource: Send + Sync {
    /// List every file under `root`, sorted by key
    fn scan(&self, root: &Path) -> Result<Vec<LocalObject>, ContentError>;

    /// Read one object's body
    fn read(&self, object: &LocalObject) -> Result<Vec<u8>, ContentError>;
}
