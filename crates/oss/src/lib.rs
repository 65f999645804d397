//! oss-client: OSS REST adapter for the ossc client
//!
//! This crate implements the ObjectStore trait over the OSS REST protocol:
//! HMAC-SHA1 request signing, a signed HTTP transport and XML decoding of
//! listing, bucket and error documents.

pub mod client;
pub mod sign;
pub mod transport;
pub mod xml;

#[cfg(test)]
mod mock_server;

pub use client::OssClient;
pub use xml::ServiceError;
