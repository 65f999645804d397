//! XML response bodies
//!
//! Wire structs mirror the service's documents field for field and are
//! converted into the core model right after decoding. Object listings are
//! read with the event reader instead, which keeps element text verbatim.

use oss_core::{Bucket, BucketList, Error, ListingPage, Owner, RawObjectEntry, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct XmlOwner {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(default)]
    display_name: String,
}

impl From<XmlOwner> for Owner {
    fn from(owner: XmlOwner) -> Self {
        Owner {
            id: owner.id,
            display_name: owner.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct XmlBucket {
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    creation_date: String,
}

#[derive(Debug, Default, Deserialize)]
struct XmlBuckets {
    #[serde(rename = "Bucket", default)]
    bucket: Vec<XmlBucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", rename = "ListAllMyBucketsResult")]
struct ListAllMyBucketsResult {
    #[serde(default)]
    owner: XmlOwner,
    #[serde(default)]
    buckets: XmlBuckets,
}

fn utf8(body: &[u8]) -> Result<&str> {
    std::str::from_utf8(body)
        .map_err(|e| Error::MalformedResponse(format!("response is not UTF-8: {e}")))
}

fn malformed(e: impl std::fmt::Display) -> Error {
    Error::MalformedResponse(format!("invalid ListBucketResult: {e}"))
}

fn parse_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(malformed(format!("IsTruncated is not a boolean: {other:?}"))),
    }
}

/// Decode one page of an object listing
///
/// Walks the document event by event so that element text reaches the page
/// untouched: a key, prefix or marker may start or end with whitespace.
pub fn parse_listing(body: &[u8]) -> Result<ListingPage> {
    let mut reader = Reader::from_str(utf8(body)?);
    reader.config_mut().trim_text(false);

    let mut page = ListingPage::default();
    let mut entry = RawObjectEntry::default();
    let mut is_truncated = None;
    let mut open: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                if open.is_empty() && name != "ListBucketResult" {
                    return Err(malformed(format!("unexpected root element <{name}>")));
                }
                open.push(name);
                text.clear();
            }
            Event::Empty(start) if open.is_empty() => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                return Err(malformed(format!("empty root element <{name}/>")));
            }
            Event::Text(t) => text.push_str(&t.unescape().map_err(malformed)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::End(_) => {
                let names: Vec<&str> = open.iter().skip(1).map(String::as_str).collect();
                let value = std::mem::take(&mut text);
                match names.as_slice() {
                    ["IsTruncated"] => is_truncated = Some(parse_bool(&value)?),
                    ["NextMarker"] => page.next_marker = value,
                    ["Contents"] => page.entries.push(std::mem::take(&mut entry)),
                    ["Contents", "Key"] => entry.key = value,
                    ["Contents", "LastModified"] => entry.last_modified = value,
                    ["Contents", "ETag"] => entry.etag = value,
                    ["Contents", "Type"] => entry.object_type = value,
                    ["Contents", "Size"] => entry.size = value,
                    ["Contents", "StorageClass"] => entry.storage_class = value,
                    ["Contents", "Owner", "ID"] => entry.owner.id = value,
                    ["Contents", "Owner", "DisplayName"] => entry.owner.display_name = value,
                    ["CommonPrefixes", "Prefix"] => page.common_prefixes.push(value),
                    _ => {}
                }
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(malformed("document ended inside an element"));
    }
    page.is_truncated = is_truncated.ok_or_else(|| malformed("missing IsTruncated"))?;
    Ok(page)
}

/// Decode the service-level bucket listing
pub fn parse_bucket_list(body: &[u8]) -> Result<BucketList> {
    let result: ListAllMyBucketsResult = quick_xml::de::from_str(utf8(body)?)
        .map_err(|e| Error::MalformedResponse(format!("invalid ListAllMyBucketsResult: {e}")))?;

    Ok(BucketList {
        owner: result.owner.into(),
        buckets: result
            .buckets
            .bucket
            .into_iter()
            .map(|b| Bucket {
                name: b.name,
                location: b.location,
                creation_date: b.creation_date,
            })
            .collect(),
    })
}

/// Error document returned with non-success statuses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", rename = "Error")]
pub struct ServiceError {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub host_id: String,
}

impl ServiceError {
    /// Decode an error body, or `None` when it is not an error document
    pub fn parse(body: &str) -> Option<Self> {
        quick_xml::de::from_str::<ServiceError>(body)
            .ok()
            .filter(|e| !e.code.is_empty())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
