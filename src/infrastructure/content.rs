//! Local content tree
//!
//! Walks the source folder, applies `.siteignore`, and hashes every file.
//! Hidden files are published; only `.siteignore` decides what is left out.

use std::fs;
use std::path::Path;

use ignore::WalkBuilder;

use crate::domain::ports::{ContentError, ContentSource, LocalObject};
use crate::domain::value_objects::{ContentHash, IgnorePatterns, IGNORE_FILE};

/// Filesystem-backed content source
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentSource;

impl FsContentSource {
    pub fn new() -> Self {
        Self
    }
}

impl ContentSource for FsContentSource {
    fn scan(&self, root: &Path) -> Result<Vec<LocalObject>, ContentError> {
        if !root.is_dir() {
            return Err(ContentError::MissingRoot(root.to_path_buf()));
        }
        let patterns = IgnorePatterns::load(root).map_err(|e| ContentError::InvalidIgnore {
            path: root.join(IGNORE_FILE),
            message: e.to_string(),
        })?;

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .build();

        let mut objects = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ContentError::Read {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let key = object_key(rel);
            if patterns.is_key_ignored(&key) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let body = read_file(&path)?;
            objects.push(LocalObject {
                content_type: content_type_for(&key).to_string(),
                hash: ContentHash::from_bytes(&body),
                size: body.len() as u64,
                key,
                path,
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn read(&self, object: &LocalObject) -> Result<Vec<u8>, ContentError> {
        read_file(&object.path)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ContentError> {
    fs::read(path).map_err(|e| ContentError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Bucket key for a path relative to the source root
pub fn object_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Content type served for a key, by extension
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_scan_lists_files_sorted_with_forward_slash_keys() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.html", "<h1>hi</h1>");
        write(dir.path(), "css/site.css", "body{}");
        write(dir.path(), "a/b/c.txt", "deep");

        let objects = FsContentSource::new().scan(dir.path()).unwrap();
        let keys: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/b/c.txt", "css/site.css", "index.html"]);
        assert_eq!(objects[2].content_type, "text/html; charset=utf-8");
        assert_eq!(objects[2].size, 11);
        assert_eq!(objects[2].hash, ContentHash::from_bytes(b"<h1>hi</h1>"));
    }

    #[test]
    fn test_scan_applies_siteignore_and_keeps_hidden_files() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".siteignore", "drafts/\n");
        write(dir.path(), "drafts/wip.html", "wip");
        write(dir.path(), ".well-known/security.txt", "contact");
        write(dir.path(), "index.html", "home");

        let objects = FsContentSource::new().scan(dir.path()).unwrap();
        let keys: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec![".well-known/security.txt", "index.html"]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(
            FsContentSource::new().scan(&missing),
            Err(ContentError::MissingRoot(missing))
        );
    }

    #[test]
    fn test_read_returns_body() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.html", "home");
        let source = FsContentSource::new();
        let objects = source.scan(dir.path()).unwrap();
        assert_eq!(source.read(&objects[0]).unwrap(), b"home");
    }

    #[test]
    fn test_content_types_fall_back_to_octet_stream() {
        assert_eq!(content_type_for("logo.SVG"), "image/svg+xml");
        assert_eq!(content_type_for("LICENSE"), "application/octet-stream");
    }
}
