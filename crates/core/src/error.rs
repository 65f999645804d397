//! Error types for oss-core
//!
//! Every operation of the client returns this error type. Variants are split
//! along the lines a caller cares about: bad arguments (caught before any
//! network call), transport failures, protocol-level rejections by the
//! service, and response bodies that cannot be decoded.

use thiserror::Error;

/// Result type alias for oss-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for oss-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied path violates a structural precondition
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Alias already exists
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, TLS or body transfer failure
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a status outside the expected set
    #[error("Service returned HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    /// Listing was refused with 403, which the service uses for unknown buckets
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A listing or bucket-list body that does not decode
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Build a protocol error from a status code and the raw response body
    pub fn protocol(status: u16, body: impl AsRef<[u8]>) -> Self {
        Error::Protocol {
            status,
            message: String::from_utf8_lossy(body.as_ref()).trim().to_string(),
        }
    }

    /// Only transport failures are worth retrying; everything else is terminal
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                        // UsageError
            Error::Config(_) => 2,                             // UsageError
            Error::Network(_) => 3,                            // NetworkError
            Error::BucketNotFound(_) => 4,                     // AccessError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5, // NotFound
            Error::Conflict(_) | Error::AliasExists(_) => 6,   // Conflict
            Error::Protocol { .. } | Error::MalformedResponse(_) => 7, // ProtocolError
            _ => 1,                                            // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::BucketNotFound("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AliasNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::AliasExists("test".into()).exit_code(), 6);
        assert_eq!(Error::protocol(500, "boom").exit_code(), 7);
        assert_eq!(Error::MalformedResponse("test".into()).exit_code(), 7);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(Error::Network("reset".into()).is_retryable());
        assert!(!Error::protocol(503, "").is_retryable());
        assert!(!Error::MalformedResponse("bad xml".into()).is_retryable());
        assert!(!Error::InvalidPath("".into()).is_retryable());
    }

    #[test]
    fn test_protocol_error_keeps_body() {
        let err = Error::protocol(409, b"<Error><Code>BucketNotEmpty</Code></Error>\n");
        assert_eq!(
            err.to_string(),
            "Service returned HTTP 409: <Error><Code>BucketNotEmpty</Code></Error>"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::AliasNotFound("prod".into());
        assert_eq!(err.to_string(), "Alias not found: prod");

        let err = Error::BucketNotFound("media".into());
        assert_eq!(err.to_string(), "Bucket not found: media");
    }
}
