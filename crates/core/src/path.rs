//! Object path normalization
//!
//! Callers write paths the way they would on a filesystem (`/docs/a.txt`,
//! `docs\sub\`, `/`). Internally a key never carries a leading separator and
//! a folder key carries exactly one trailing separator. The bucket root is
//! the empty key. Every facade operation goes through [`ObjectPath`] so the
//! convention is applied once, at the boundary.

use crate::error::{Error, Result};

/// The path separator used by object keys
pub const SEPARATOR: char = '/';

/// A normalized object key inside one bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath {
    key: String,
}

impl ObjectPath {
    /// Parse a caller-supplied path
    ///
    /// Backslashes are treated as separators and leading separators are
    /// stripped. An empty string is rejected; use `/` for the bucket root.
    /// So is any `.` or `..` segment, which HTTP URL normalization would
    /// fold away before the request is sent.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidPath("Path cannot be empty".into()));
        }

        let normalized = path.replace('\\', "/");
        let key = normalized.trim_start_matches(SEPARATOR);
        if has_dot_segment(key) {
            return Err(Error::InvalidPath(format!(
                "Path cannot contain '.' or '..' segments: {path}"
            )));
        }

        Ok(Self {
            key: key.to_string(),
        })
    }

    /// The bucket root
    pub fn root() -> Self {
        Self { key: String::new() }
    }

    /// Key as sent to the service (no leading separator)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this is the bucket root
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// Whether the path has folder semantics (root, or trailing separator)
    pub fn is_folder(&self) -> bool {
        self.is_root() || self.key.ends_with(SEPARATOR)
    }

    /// The same path with exactly one trailing separator
    pub fn to_folder(&self) -> Self {
        if self.is_folder() {
            return self.clone();
        }
        Self {
            key: format!("{}{SEPARATOR}", self.key),
        }
    }

    /// The same path without trailing separators
    ///
    /// Fails for the root, which cannot name a file.
    pub fn to_file(&self) -> Result<Self> {
        let key = self.key.trim_end_matches(SEPARATOR);
        if key.is_empty() {
            return Err(Error::InvalidPath(
                "The bucket root is not a file".into(),
            ));
        }
        Ok(Self {
            key: key.to_string(),
        })
    }

    /// Resource path used both for signing and for the request URL
    pub fn resource(&self) -> String {
        format!("{SEPARATOR}{}", self.key)
    }

    /// Listing prefix for this path treated as a folder (empty at the root)
    pub fn listing_prefix(&self) -> String {
        self.to_folder().key
    }

    /// Last path component, without any trailing separator
    pub fn file_name(&self) -> &str {
        let trimmed = self.key.trim_end_matches(SEPARATOR);
        match trimmed.rfind(SEPARATOR) {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        }
    }

    /// Get the parent folder (one level up)
    pub fn parent(&self) -> Option<Self> {
        if self.key.is_empty() {
            return None;
        }

        let key = self.key.trim_end_matches(SEPARATOR);
        match key.rfind(SEPARATOR) {
            Some(pos) => Some(Self {
                key: key[..=pos].to_string(),
            }),
            None => Some(Self::root()),
        }
    }

    /// Join a relative child path onto this path treated as a folder
    pub fn join(&self, child: &str) -> Self {
        let child = child.replace('\\', "/");
        let child = child.trim_start_matches(SEPARATOR);
        Self {
            key: format!("{}{child}", self.listing_prefix()),
        }
    }
}

/// Whether any segment of `key` is `.` or `..`
pub fn has_dot_segment(key: &str) -> bool {
    key.split(SEPARATOR).any(|segment| segment == "." || segment == "..")
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource())
    }
}
