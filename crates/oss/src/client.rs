//! OSS client implementation
//!
//! Implements the ObjectStore trait on top of two signed transports: one
//! scoped to the alias's bucket and one for service-level calls.

use async_trait::async_trait;
use jiff::Timestamp;
use oss_core::listing::{PageRequest, PageSource, list_all};
use oss_core::{
    AccessKey, Alias, BucketList, EndpointConfig, Error, ListMode, Listing, ListingPage,
    ObjectHead, ObjectPath, ObjectReader, ObjectStore, Result,
};
use reqwest::{Client, Method};
use tokio::io::AsyncWrite;
use tracing::{debug, info};
use url::Url;

use crate::sign::sign_url;
use crate::transport::{Payload, Response, Transport};
use crate::xml;

/// Client for one bucket
#[derive(Debug, Clone)]
pub struct OssClient {
    bucket: String,
    objects: Transport,
    service: Transport,
}

impl OssClient {
    /// Create a new OssClient from an Alias
    pub fn new(alias: &Alias) -> Result<Self> {
        let endpoint = EndpointConfig::from(alias);
        let http = Client::builder()
            .danger_accept_invalid_certs(alias.insecure)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        debug!(alias = %alias.name, host = %endpoint.host(), "Creating OSS client");
        Ok(Self::from_parts(
            http,
            &endpoint.bucket,
            endpoint.base_url()?,
            endpoint.service_url()?,
            AccessKey::from(alias),
        ))
    }

    /// Assemble a client from explicit URLs
    pub fn from_parts(
        http: Client,
        bucket: &str,
        base_url: Url,
        service_url: Url,
        key: AccessKey,
    ) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Transport::new(
                http.clone(),
                base_url,
                Some(bucket.to_string()),
                key.clone(),
            ),
            service: Transport::new(http, service_url, None, key),
        }
    }

    /// Share link for a file, signed until `expires_at` when given
    pub fn share_url(&self, path: &ObjectPath, expires_at: Option<Timestamp>) -> Result<String> {
        require_file(path)?;
        let resource = path.resource();
        let query = match expires_at {
            Some(ts) => sign_url(
                self.objects.key(),
                ts.as_second(),
                &self.objects.sign_resource(&resource),
            ),
            None => Vec::new(),
        };
        Ok(self.objects.request_url(&resource, &query).to_string())
    }

    async fn send(&self, method: Method, path: &ObjectPath) -> Result<Response> {
        self.objects
            .execute(method, &path.resource(), &[], Payload::Empty, None)
            .await
    }
}

fn require_file(path: &ObjectPath) -> Result<()> {
    if path.is_folder() {
        return Err(Error::InvalidPath(format!("{path} is a folder, not a file")));
    }
    Ok(())
}

fn unexpected(response: &Response) -> Error {
    Error::protocol(response.status, &response.body)
}

#[async_trait]
impl PageSource for OssClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage> {
        let response = self
            .objects
            .execute(
                Method::GET,
                "/",
                &request.query_pairs(),
                Payload::Empty,
                None,
            )
            .await?;

        match response.status {
            200 => xml::parse_listing(&response.body),
            403 => Err(Error::BucketNotFound(self.bucket.clone())),
            _ => Err(unexpected(&response)),
        }
    }
}

#[async_trait]
impl ObjectStore for OssClient {
    async fn list_buckets(&self) -> Result<BucketList> {
        let response = self
            .service
            .execute(Method::GET, "/", &[], Payload::Empty, None)
            .await?;

        match response.status {
            200 => xml::parse_bucket_list(&response.body),
            _ => Err(unexpected(&response)),
        }
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
        let response = self.send(Method::HEAD, path).await?;
        Ok(ObjectHead {
            status: response.status,
            headers: response.headers,
        })
    }

    async fn file_exists(&self, path: &ObjectPath) -> Result<bool> {
        require_file(path)?;
        let response = self.send(Method::HEAD, path).await?;
        match response.status {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(unexpected(&response)),
        }
    }

    async fn get_file(
        &self,
        path: &ObjectPath,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64> {
        require_file(path)?;
        let response = self
            .objects
            .execute(
                Method::GET,
                &path.resource(),
                &[],
                Payload::Empty,
                Some(sink),
            )
            .await?;

        match response.status {
            200 => {
                info!(path = %path, bytes = response.streamed, "Downloaded object");
                Ok(response.streamed)
            }
            404 => Err(Error::NotFound(path.to_string())),
            _ => Err(unexpected(&response)),
        }
    }

    async fn put_file(
        &self,
        path: &ObjectPath,
        source: ObjectReader,
        content_length: Option<u64>,
    ) -> Result<()> {
        require_file(path)?;
        let payload = Payload::Stream {
            reader: source,
            len: content_length,
        };
        let response = self
            .objects
            .execute(Method::PUT, &path.resource(), &[], payload, None)
            .await?;

        match response.status {
            200 => {
                info!(path = %path, bytes = ?content_length, "Uploaded object");
                Ok(())
            }
            _ => Err(unexpected(&response)),
        }
    }

    async fn delete_object(&self, path: &ObjectPath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidPath("Cannot delete the bucket root".into()));
        }
        let response = self.send(Method::DELETE, path).await?;
        match response.status {
            200 | 204 => {
                debug!(path = %path, "Deleted object");
                Ok(())
            }
            _ => Err(unexpected(&response)),
        }
    }

    async fn delete_folder(
        &self,
        path: &ObjectPath,
        confirm: &mut (dyn for<'a> FnMut(&'a str) -> bool + Send),
    ) -> Result<usize> {
        if path.is_root() {
            return Err(Error::InvalidPath("Cannot delete the bucket root".into()));
        }

        let folder = path.to_folder();
        let listing = self.list_folder(&folder, true).await?;

        let mut targets: Vec<ObjectPath> = listing
            .files
            .iter()
            .map(|file| folder.join(&file.key))
            .collect();
        targets.extend(
            listing
                .folders_innermost_first()
                .into_iter()
                .map(|sub| folder.join(sub)),
        );
        targets.push(folder.clone());

        let mut deleted = 0;
        for target in targets {
            if !confirm(&target.to_string()) {
                continue;
            }
            self.delete_object(&target).await?;
            deleted += 1;
        }

        info!(path = %folder, deleted, "Deleted folder");
        Ok(deleted)
    }

    async fn create_folder(&self, path: &ObjectPath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidPath("Cannot create the bucket root".into()));
        }

        let folder = path.to_folder();
        let file = folder.to_file()?;
        if self.file_exists(&file).await? {
            return Err(Error::Conflict(format!(
                "a file already exists at {file}"
            )));
        }

        let response = self.send(Method::PUT, &folder).await?;
        match response.status {
            200 => {
                debug!(path = %folder, "Created folder");
                Ok(())
            }
            _ => Err(unexpected(&response)),
        }
    }

    async fn make_share(&self, path: &ObjectPath, expires_in: u64) -> Result<String> {
        if expires_in == 0 {
            return self.share_url(path, None);
        }

        let seconds = i64::try_from(expires_in)
            .map_err(|_| Error::General(format!("expiry too large: {expires_in}s")))?;
        let expires_at = Timestamp::now()
            .checked_add(jiff::SignedDuration::from_secs(seconds))
            .map_err(|e| Error::General(format!("invalid expiry: {e}")))?;
        self.share_url(path, Some(expires_at))
    }
}
