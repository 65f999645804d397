//! ObjectStore trait definition
//!
//! This trait is the facade the CLI talks to. It keeps the commands
//! independent of the HTTP client so they can be driven by a fake store.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;
use crate::model::{BucketList, Listing};
use crate::path::ObjectPath;

/// Byte source for an upload
pub type ObjectReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Status and headers of a HEAD request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    pub status: u16,
    /// Header names and values in the order the service sent them
    pub headers: Vec<(String, String)>,
}

impl ObjectHead {
    /// First header value with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Content length announced by the service
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }
}

/// Operations against one bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the buckets owned by the account
    async fn list_buckets(&self) -> Result<BucketList>;

    /// List a folder, one level deep or recursively
    async fn list_folder(&self, path: &ObjectPath, recursive: bool) -> Result<Listing>;

    /// Issue a HEAD request for an object
    async fn head_object(&self, path: &ObjectPath) -> Result<ObjectHead>;

    /// Whether a file exists at `path`
    async fn file_exists(&self, path: &ObjectPath) -> Result<bool>;

    /// Stream an object into `sink`, returning the number of bytes written
    async fn get_file(
        &self,
        path: &ObjectPath,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64>;

    /// Upload `source` to `path`
    async fn put_file(
        &self,
        path: &ObjectPath,
        source: ObjectReader,
        content_length: Option<u64>,
    ) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, path: &ObjectPath) -> Result<()>;

    /// Delete a folder and everything below it
    ///
    /// `confirm` is asked once per object (files first, then sub-folders
    /// innermost first, then the folder itself); objects it rejects are kept.
    /// Returns the number of objects deleted.
    async fn delete_folder(
        &self,
        path: &ObjectPath,
        confirm: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<usize>;

    /// Create an empty folder marker
    async fn create_folder(&self, path: &ObjectPath) -> Result<()>;

    /// Build a share link, signed and expiring after `expires_in` seconds
    /// unless `expires_in` is zero
    async fn make_share(&self, path: &ObjectPath, expires_in: u64) -> Result<String>;
}
