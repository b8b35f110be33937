//! Ignore patterns value object
//!
//! Loads `.siteignore` from the root of a source folder. Matching follows
//! gitignore semantics; matched paths are left out of the published tree.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use thiserror::Error;

/// File name looked up at the source root
pub const IGNORE_FILE: &str = ".siteignore";

/// Maximum size of an ignore file (64KB)
const MAX_FILE_SIZE: u64 = 65536;

/// Errors loading ignore patterns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IgnoreError {
    #[error("{} exceeds {}KB ({size} bytes)", .path.display(), .limit / 1024)]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid pattern at {}:{line}: '{pattern}' - {message}", .path.display())]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },

    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
}

/// Compiled `.siteignore` patterns
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    pattern_count: usize,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnorePatterns {
    /// Matches nothing
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            pattern_count: 0,
        }
    }

    /// Load `.siteignore` under `root`; a missing file means no patterns
    pub fn load(root: &Path) -> Result<Self, IgnoreError> {
        let path = root.join(IGNORE_FILE);
        if !path.is_file() {
            return Ok(Self::empty());
        }

        let read_err = |e: std::io::Error| IgnoreError::Read {
            path: path.clone(),
            message: e.to_string(),
        };
        let size = fs::metadata(&path).map_err(read_err)?.len();
        if size > MAX_FILE_SIZE {
            return Err(IgnoreError::FileTooLarge {
                path,
                size,
                limit: MAX_FILE_SIZE,
            });
        }
        let content = fs::read_to_string(&path).map_err(read_err)?;
        Self::from_content(root, &path, &content)
    }

    pub fn from_content(root: &Path, source: &Path, content: &str) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        let mut pattern_count = 0;

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            builder
                .add_line(Some(source.to_path_buf()), line)
                .map_err(|e| IgnoreError::InvalidPattern {
                    path: source.to_path_buf(),
                    line: idx + 1,
                    pattern: line.to_string(),
                    message: e.to_string(),
                })?;
            pattern_count += 1;
        }

        let matcher = builder.build().map_err(|e| IgnoreError::InvalidPattern {
            path: source.to_path_buf(),
            line: 0,
            pattern: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self {
            matcher,
            pattern_count,
        })
    }

    /// Check a path relative to the source root
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    /// Check a bucket key
    pub fn is_key_ignored(&self, key: &str) -> bool {
        key == IGNORE_FILE || self.is_ignored(Path::new(key), false)
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}
