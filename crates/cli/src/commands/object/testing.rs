//! In-memory object store for command tests
//!
//! Listings go through the real listing engine: the store only answers
//! single pages the way the service would.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use oss_core::{
    Bucket, BucketList, Error, ListMode, Listing, ListingPage, ObjectHead, ObjectPath,
    ObjectReader, ObjectStore, Owner, PageRequest, PageSource, RawObjectEntry, Result, list_all,
};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::output::{Formatter, OutputConfig};

/// Formatter that prints nothing but errors
pub(crate) fn quiet() -> Formatter {
    Formatter::new(OutputConfig {
        quiet: true,
        ..Default::default()
    })
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub(crate) fn with(objects: &[(&str, &str)]) -> Self {
        let objects = objects
            .iter()
            .map(|(key, body)| (key.to_string(), body.as_bytes().to_vec()))
            .collect();
        Self {
            objects: Mutex::new(objects),
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub(crate) fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    fn entry(key: &str, body: &[u8]) -> RawObjectEntry {
        RawObjectEntry {
            key: key.to_string(),
            last_modified: "2021-01-01T00:00:00.000Z".to_string(),
            size: body.len().to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageSource for MemoryStore {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage> {
        let objects = self.objects.lock().unwrap();
        let mut page = ListingPage::default();
        let mut prefixes = BTreeSet::new();

        for (key, body) in objects.iter() {
            if !key.starts_with(&request.prefix) || key.as_str() <= request.marker.as_str() {
                continue;
            }
            let rel = &key[request.prefix.len()..];
            match rel.find('/') {
                Some(pos) if !request.delimiter.is_empty() => {
                    prefixes.insert(format!("{}{}", request.prefix, &rel[..=pos]));
                }
                _ => page.entries.push(Self::entry(key, body)),
            }
        }

        page.common_prefixes = prefixes.into_iter().collect();
        Ok(page)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<BucketList> {
        Ok(BucketList {
            owner: Owner {
                id: "1".to_string(),
                display_name: "tester".to_string(),
            },
            buckets: vec![Bucket {
                name: "memory".to_string(),
                location: "oss-cn-hangzhou".to_string(),
                creation_date: "2021-01-01T00:00:00.000Z".to_string(),
            }],
        })
    }

    async fn list_folder(&self, path: &ObjectPath, recursive: bool) -> Result<Listing> {
        list_all(
            self,
            &path.listing_prefix(),
            ListMode::from_recursive(recursive),
        )
        .await
    }

    async fn head_object(&self, path: &ObjectPath) -> Result<ObjectHead> {
        Ok(match self.body(path.key()) {
            Some(body) => ObjectHead {
                status: 200,
                headers: vec![("Content-Length".to_string(), body.len().to_string())],
            },
            None => ObjectHead {
                status: 404,
                headers: Vec::new(),
            },
        })
    }

    async fn file_exists(&self, path: &ObjectPath) -> Result<bool> {
        if path.is_folder() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(self.body(path.key()).is_some())
    }

    async fn get_file(
        &self,
        path: &ObjectPath,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64> {
        let body = self
            .body(path.key())
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        sink.write_all(&body).await?;
        Ok(body.len() as u64)
    }

    async fn put_file(
        &self,
        path: &ObjectPath,
        mut source: ObjectReader,
        _content_length: Option<u64>,
    ) -> Result<()> {
        let mut body = Vec::new();
        source.read_to_end(&mut body).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(path.key().to_string(), body);
        Ok(())
    }

    async fn delete_object(&self, path: &ObjectPath) -> Result<()> {
        self.objects.lock().unwrap().remove(path.key());
        Ok(())
    }

    async fn delete_folder(
        &self,
        path: &ObjectPath,
        confirm: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<usize> {
        if path.is_root() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        let folder = path.to_folder();
        let listing = self.list_folder(&folder, true).await?;

        let mut targets: Vec<ObjectPath> =
            listing.files.iter().map(|f| folder.join(&f.key)).collect();
        targets.extend(
            listing
                .folders_innermost_first()
                .into_iter()
                .map(|sub| folder.join(sub)),
        );
        targets.push(folder.clone());

        let mut deleted = 0;
        for target in targets {
            if confirm(&target.to_string()) {
                self.delete_object(&target).await?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn create_folder(&self, path: &ObjectPath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        let folder = path.to_folder();
        if self.file_exists(&folder.to_file()?).await? {
            return Err(Error::Conflict(folder.to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .entry(folder.key().to_string())
            .or_default();
        Ok(())
    }

    async fn make_share(&self, path: &ObjectPath, expires_in: u64) -> Result<String> {
        if path.is_folder() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        if expires_in == 0 {
            return Ok(format!("https://memory.example{}", path.resource()));
        }
        Ok(format!(
            "https://memory.example{}?Expires={expires_in}",
            path.resource()
        ))
    }
}
