//! OSS request signatures
//!
//! Requests are authenticated with HMAC-SHA1 over a canonical string:
//!
//! ```text
//! VERB \n Content-MD5 \n Content-Type \n DATE \n RESOURCE
//! ```
//!
//! The client never sends Content-MD5 or Content-Type, so both slots stay
//! empty. RESOURCE is `/bucket` followed by the unescaped object path, or `/`
//! for service-level calls. Share links sign the same string with the
//! expiry timestamp in place of the date.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use oss_core::AccessKey;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Canonical string for header authentication
pub fn canonical_string(verb: &str, date: &str, resource: &str) -> String {
    format!("{verb}\n\n\n{date}\n{resource}")
}

/// Canonical string for a signed GET link expiring at `expires` (unix seconds)
pub fn url_canonical_string(expires: i64, resource: &str) -> String {
    canonical_string("GET", &expires.to_string(), resource)
}

/// Standard base64 of HMAC-SHA1(secret, data)
pub fn hmac_sha1_base64(secret: &str, data: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// `Authorization` header value for a request
pub fn sign_header(key: &AccessKey, verb: &str, date: &str, resource: &str) -> String {
    let signature = hmac_sha1_base64(&key.secret, &canonical_string(verb, date, resource));
    format!("OSS {}:{}", key.id, signature)
}

/// Query parameters authenticating a GET link until `expires`
pub fn sign_url(key: &AccessKey, expires: i64, resource: &str) -> Vec<(&'static str, String)> {
    let signature = hmac_sha1_base64(&key.secret, &url_canonical_string(expires, resource));
    vec![
        ("Expires", expires.to_string()),
        ("OSSAccessKeyId", key.id.clone()),
        ("Signature", signature),
    ]
}
