//! oss-core: Core library for the ossc object-storage client
//!
//! This crate provides the parts of the client that do not speak HTTP:
//! - Error taxonomy
//! - Object paths and the object model
//! - The paginated listing engine
//! - Endpoint and credential values
//! - Configuration and alias management
//! - The ObjectStore trait implemented by the HTTP client

pub mod alias;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod listing;
pub mod model;
pub mod path;
pub mod traits;

pub use alias::{Alias, AliasManager};
pub use config::{Config, ConfigManager};
pub use endpoint::{AccessKey, EndpointConfig};
pub use error::{Error, Result};
pub use listing::{PageRequest, PageSource, Paginator, list_all};
pub use model::{Bucket, BucketList, File, Folder, ListMode, Listing, ListingPage, Owner, RawObjectEntry};
pub use path::ObjectPath;
pub use traits::{ObjectHead, ObjectReader, ObjectStore};
