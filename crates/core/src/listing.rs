//! Paginated listing engine
//!
//! The service returns a flat, cursor-paginated key listing. This module
//! drives the page requests and folds every page into a file/folder view of
//! one folder, either one level deep (the service groups sub-folders into
//! common prefixes) or recursively (folders are derived from the keys).

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{File, Folder, ListMode, Listing, ListingCursor, ListingPage, ancestors, dir_name};

/// Page size requested from the service
pub const MAX_KEYS: u32 = 1000;

/// Parameters of one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub prefix: String,
    pub delimiter: String,
    pub max_keys: u32,
    pub marker: String,
}

impl PageRequest {
    pub fn new(prefix: &str, mode: ListMode, cursor: &ListingCursor) -> Self {
        Self {
            prefix: prefix.to_string(),
            delimiter: mode.delimiter().to_string(),
            max_keys: MAX_KEYS,
            marker: cursor.marker.clone(),
        }
    }

    /// Query parameters, sorted by name
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("delimiter", self.delimiter.clone()),
            ("marker", self.marker.clone()),
            ("max-keys", self.max_keys.to_string()),
            ("prefix", self.prefix.clone()),
        ]
    }
}

/// Anything that can fetch and decode one listing page
///
/// Implementations map non-success statuses to errors (403 to
/// `BucketNotFound`) and undecodable bodies to `MalformedResponse`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage>;
}

/// Lazy page iterator over one listing
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    prefix: String,
    mode: ListMode,
    cursor: ListingCursor,
    fetched: usize,
    done: bool,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S, prefix: &str, mode: ListMode) -> Self {
        Self {
            source,
            prefix: prefix.to_string(),
            mode,
            cursor: ListingCursor::default(),
            fetched: 0,
            done: false,
        }
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Fetch the next page, or `None` once the service reported the last one
    ///
    /// An empty first page means the folder does not exist. A truncated page
    /// must move the cursor forward; anything else would request the same
    /// page forever.
    pub async fn next_page(&mut self) -> Result<Option<ListingPage>> {
        if self.done {
            return Ok(None);
        }

        let request = PageRequest::new(&self.prefix, self.mode, &self.cursor);
        let page = match self.source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        debug!(
            prefix = %self.prefix,
            marker = %self.cursor.marker,
            entries = page.entries.len(),
            common_prefixes = page.common_prefixes.len(),
            truncated = page.is_truncated,
            "Fetched listing page"
        );

        if self.fetched == 0 && page.is_empty() {
            self.done = true;
            return Err(Error::NotFound(format!("/{}", self.prefix)));
        }
        self.fetched += 1;

        if page.is_truncated {
            if page.next_marker.is_empty() || page.next_marker == self.cursor.marker {
                self.done = true;
                return Err(Error::MalformedResponse(format!(
                    "truncated page without a new marker (marker: {:?})",
                    page.next_marker
                )));
            }
            self.cursor.marker = page.next_marker.clone();
        } else {
            self.done = true;
        }

        Ok(Some(page))
    }
}

/// Folds listing pages into a [`Listing`]
#[derive(Debug)]
pub struct ListingAccumulator {
    prefix: String,
    mode: ListMode,
    files: Vec<File>,
    folders: Vec<Folder>,
    derived: BTreeSet<String>,
}

impl ListingAccumulator {
    pub fn new(prefix: &str, mode: ListMode) -> Self {
        Self {
            prefix: prefix.to_string(),
            mode,
            files: Vec::new(),
            folders: Vec::new(),
            derived: BTreeSet::new(),
        }
    }

    fn relative<'k>(&self, key: &'k str) -> Option<&'k str> {
        match key.strip_prefix(self.prefix.as_str()) {
            Some(rel) => Some(rel),
            None => {
                warn!(key, prefix = %self.prefix, "Listing returned a key outside the prefix");
                None
            }
        }
    }

    pub fn fold(&mut self, page: ListingPage) {
        for mut entry in page.entries {
            let rel = match self.relative(&entry.key) {
                Some(rel) if !rel.is_empty() => rel.to_string(),
                _ => continue,
            };

            match self.mode {
                ListMode::Shallow => {
                    entry.key = rel;
                    self.files.push(File(entry));
                }
                ListMode::Recursive => {
                    if entry.is_file() {
                        self.derived.extend(ancestors(dir_name(&rel)).map(str::to_string));
                        entry.key = rel;
                        self.files.push(File(entry));
                    } else {
                        self.derived.extend(ancestors(&rel).map(str::to_string));
                    }
                }
            }
        }

        if self.mode == ListMode::Shallow {
            for prefix in page.common_prefixes {
                match self.relative(&prefix) {
                    Some(rel) if !rel.is_empty() => self.folders.push(Folder(rel.to_string())),
                    _ => {}
                }
            }
        }
    }

    pub fn finish(self) -> Listing {
        let folders = match self.mode {
            ListMode::Shallow => self.folders,
            ListMode::Recursive => self.derived.into_iter().map(Folder).collect(),
        };
        Listing {
            files: self.files,
            folders,
        }
    }
}

/// List everything under `prefix`, following the cursor to the last page
pub async fn list_all<S: PageSource + ?Sized>(
    source: &S,
    prefix: &str,
    mode: ListMode,
) -> Result<Listing> {
    let mut pages = Paginator::new(source, prefix, mode);
    let mut acc = ListingAccumulator::new(prefix, mode);

    while let Some(page) = pages.next_page().await? {
        acc.fold(page);
    }

    let listing = acc.finish();
    info!(
        prefix,
        pages = pages.pages_fetched(),
        files = listing.files.len(),
        folders = listing.folders.len(),
        "Listing complete"
    );
    Ok(listing)
}
