//! Endpoint and credential values
//!
//! Both are built once per client from an alias and never change afterwards.

use url::Url;

use crate::alias::Alias;
use crate::error::{Error, Result};

/// Domain appended to `bucket.location` when an alias does not set one
pub const DEFAULT_DOMAIN: &str = "aliyuncs.com";

/// Host answering service-level calls such as the bucket listing
pub const SERVICE_HOST: &str = "oss.aliyuncs.com";

/// Data-center locations known to exist
pub const KNOWN_LOCATIONS: &[&str] = &[
    "oss-cn-hangzhou",
    "oss-cn-qingdao",
    "oss-cn-beijing",
    "oss-cn-hongkong",
    "oss-cn-shenzhen",
];

/// Whether `location` is one of [`KNOWN_LOCATIONS`]
pub fn is_known_location(location: &str) -> bool {
    KNOWN_LOCATIONS.contains(&location)
}

/// Access key pair used to sign requests
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey {
    pub id: String,
    pub secret: String,
}

impl AccessKey {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Where a bucket lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub bucket: String,
    pub location: String,
    pub domain: String,
    pub secure: bool,
}

impl EndpointConfig {
    pub fn new(bucket: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            location: location.into(),
            domain: DEFAULT_DOMAIN.to_string(),
            secure: true,
        }
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// Request host, `bucket.location.domain`
    pub fn host(&self) -> String {
        format!("{}.{}.{}", self.bucket, self.location, self.domain)
    }

    /// Base URL for object requests against this bucket
    pub fn base_url(&self) -> Result<Url> {
        if self.bucket.is_empty() || self.location.is_empty() {
            return Err(Error::Config(
                "bucket and location must both be set".into(),
            ));
        }
        Ok(Url::parse(&format!("{}://{}/", self.scheme(), self.host()))?)
    }

    /// Base URL for service-level calls
    pub fn service_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("{}://{SERVICE_HOST}/", self.scheme()))?)
    }
}

impl From<&Alias> for EndpointConfig {
    fn from(alias: &Alias) -> Self {
        Self {
            bucket: alias.bucket.clone(),
            location: alias.location.clone(),
            domain: alias.domain.clone(),
            secure: alias.secure,
        }
    }
}

impl From<&Alias> for AccessKey {
    fn from(alias: &Alias) -> Self {
        Self::new(&alias.access_key_id, &alias.access_key_secret)
    }
}
