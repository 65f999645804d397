//! Object model
//!
//! Value types produced by listings and the rules that classify a raw key
//! as a file or a folder. Nothing here performs I/O.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::path::SEPARATOR;

/// Owner of an object or of a set of buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

/// One row of a listing page, exactly as the service returned it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObjectEntry {
    pub key: String,
    pub last_modified: String,
    pub etag: String,
    pub object_type: String,
    /// Decimal byte count as returned by the service
    pub size: String,
    pub storage_class: String,
    pub owner: Owner,
}

impl RawObjectEntry {
    /// Whether the entry names a file rather than a folder marker
    pub fn is_file(&self) -> bool {
        is_file_key(&self.key)
    }

    /// Size in bytes, when the service returned a parseable number
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.trim().parse().ok()
    }
}

/// A listing entry taken as a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct File(pub RawObjectEntry);

impl Deref for File {
    type Target = RawObjectEntry;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<RawObjectEntry> for File {
    fn from(entry: RawObjectEntry) -> Self {
        Self(entry)
    }
}

/// A folder path ending in the separator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Folder(pub String);

impl Folder {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Folder {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bucket owned by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub location: String,
    pub creation_date: String,
}

/// Result of the service-level bucket listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketList {
    pub owner: Owner,
    pub buckets: Vec<Bucket>,
}

/// One decoded page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub is_truncated: bool,
    pub next_marker: String,
    pub entries: Vec<RawObjectEntry>,
    pub common_prefixes: Vec<String>,
}

impl ListingPage {
    /// A page carrying neither entries nor common prefixes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.common_prefixes.is_empty()
    }
}

/// Continuation marker threaded through page requests
///
/// An empty marker means the start of the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCursor {
    pub marker: String,
}

/// Listing depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// One level, folders come from the service's common prefixes
    Shallow,
    /// Whole subtree, folders are derived from the returned keys
    Recursive,
}

impl ListMode {
    pub fn from_recursive(recursive: bool) -> Self {
        if recursive {
            ListMode::Recursive
        } else {
            ListMode::Shallow
        }
    }

    /// Delimiter sent with every page request
    pub fn delimiter(self) -> &'static str {
        match self {
            ListMode::Shallow => "/",
            ListMode::Recursive => "",
        }
    }
}

/// Files and folders under a queried folder, both relative to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub files: Vec<File>,
    pub folders: Vec<Folder>,
}

impl Listing {
    /// Folders ordered so that every folder comes before its parent
    pub fn folders_innermost_first(&self) -> Vec<&Folder> {
        let mut folders: Vec<_> = self.folders.iter().collect();
        folders.sort_by(|a, b| b.cmp(a));
        folders
    }
}

/// A key names a file when it does not end with the separator
pub fn is_file_key(key: &str) -> bool {
    !key.ends_with(SEPARATOR)
}

/// Everything up to and including the last separator, empty when there is none
pub fn dir_name(key: &str) -> &str {
    match key.rfind(SEPARATOR) {
        Some(pos) => &key[..=pos],
        None => "",
    }
}

/// Every prefix of `key` ending in the separator, shallowest first
///
/// A folder key yields itself as the last item.
pub fn ancestors(key: &str) -> impl Iterator<Item = &str> {
    key.match_indices(SEPARATOR).map(move |(pos, _)| &key[..=pos])
}
