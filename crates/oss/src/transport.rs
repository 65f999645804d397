//! Signed HTTP round trips
//!
//! One [`Transport`] is bound to one base URL and one signing scope (a bucket,
//! or the service itself). Each call builds the escaped URL, stamps `Date`
//! and `Authorization`, performs exactly one request and hands the status
//! back to the caller without interpreting it.

use std::borrow::Cow;

use jiff::Timestamp;
use oss_core::path::has_dot_segment;
use oss_core::{AccessKey, Error, ObjectReader, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, DATE};
use reqwest::{Body, Client, Method};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

use crate::sign::sign_header;

/// Hex lookup table for percent encoding
static HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~')
}

fn is_path_safe(byte: u8) -> bool {
    is_unreserved(byte) || byte == b'/'
}

fn percent_encode(input: &str, keep: fn(u8) -> bool) -> Cow<'_, str> {
    if input.bytes().all(keep) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for byte in input.bytes() {
        if keep(byte) {
            result.push(byte as char);
        } else {
            result.push('%');
            result.push(HEX_UPPER[(byte >> 4) as usize] as char);
            result.push(HEX_UPPER[(byte & 0xf) as usize] as char);
        }
    }
    Cow::Owned(result)
}

/// Percent-encode a request path
///
/// Unreserved characters and `/` are kept, every other byte becomes `%XX`.
pub fn escape_path(path: &str) -> Cow<'_, str> {
    percent_encode(path, is_path_safe)
}

/// Percent-encode a query name or value
///
/// Same rule as [`escape_path`] except that `/` is encoded too, and a space
/// becomes `%20` rather than the form encoding `+`.
pub fn escape_query(value: &str) -> Cow<'_, str> {
    percent_encode(value, is_unreserved)
}

/// Format a timestamp as an HTTP date (RFC 1123, always GMT)
pub fn http_date(ts: Timestamp) -> String {
    ts.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Request body
pub enum Payload {
    /// No body; PUT requests still send `Content-Length: 0`
    Empty,
    /// Streamed body with an optional known length
    Stream {
        reader: ObjectReader,
        len: Option<u64>,
    },
}

/// Outcome of one round trip
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Buffered body; empty when it was streamed to a sink
    pub body: Vec<u8>,
    /// Bytes written to the sink
    pub streamed: u64,
}

/// Signed HTTP client for one signing scope
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: Url,
    bucket: Option<String>,
    key: AccessKey,
}

impl Transport {
    /// `bucket` is `None` for service-level calls, which sign the bare resource
    pub fn new(http: Client, base_url: Url, bucket: Option<String>, key: AccessKey) -> Self {
        Self {
            http,
            base_url,
            bucket,
            key,
        }
    }

    pub fn key(&self) -> &AccessKey {
        &self.key
    }

    /// Resource string covered by the signature
    pub fn sign_resource(&self, resource: &str) -> String {
        match &self.bucket {
            Some(bucket) => format!("/{bucket}{resource}"),
            None => resource.to_string(),
        }
    }

    /// Full request URL with the escaped path and query
    pub fn request_url(&self, resource: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&escape_path(resource));
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(k, v)| format!("{}={}", escape_query(k), escape_query(v)))
                .collect();
            url.set_query(Some(&encoded.join("&")));
        }
        url
    }

    /// Perform one signed request
    ///
    /// With a sink and a 200 status the body is streamed into the sink and
    /// not retained. Any status is returned as a [`Response`]. A resource
    /// with a `.` or `..` segment is refused, since the URL would not name
    /// the object that gets signed.
    pub async fn execute(
        &self,
        method: Method,
        resource: &str,
        query: &[(&str, String)],
        payload: Payload,
        sink: Option<&mut (dyn AsyncWrite + Send + Unpin)>,
    ) -> Result<Response> {
        if has_dot_segment(resource) {
            return Err(Error::InvalidPath(format!(
                "Cannot address {resource}: '.' or '..' segment"
            )));
        }

        let url = self.request_url(resource, query);
        let date = http_date(Timestamp::now());
        let authorization = sign_header(
            &self.key,
            method.as_str(),
            &date,
            &self.sign_resource(resource),
        );

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(DATE, &date)
            .header(AUTHORIZATION, authorization);

        request = match payload {
            Payload::Empty if method == Method::PUT => request.body(Vec::new()),
            Payload::Empty => request,
            Payload::Stream { reader, len } => {
                if let Some(len) = len {
                    request = request.header(CONTENT_LENGTH, len);
                }
                request.body(Body::wrap_stream(ReaderStream::new(reader)))
            }
        };

        debug!(%method, %url, "Sending request");
        let mut response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {e}")))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        debug!(%method, %url, status, "Received response");

        if let Some(sink) = sink.filter(|_| status == 200) {
            let mut streamed = 0u64;
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| Error::Network(format!("Failed to read response: {e}")))?
            {
                sink.write_all(&chunk)
                    .await
                    .map_err(|e| Error::Network(format!("Failed to write body: {e}")))?;
                streamed += chunk.len() as u64;
            }
            sink.flush()
                .await
                .map_err(|e| Error::Network(format!("Failed to write body: {e}")))?;

            return Ok(Response {
                status,
                headers,
                body: Vec::new(),
                streamed,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {e}")))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
            streamed: 0,
        })
    }
}
