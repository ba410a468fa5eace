//! lg-core: Core library for the lakegate listing gateway
//!
//! This crate provides the pieces of lakegate that do not depend on the
//! S3 wire protocol, including:
//! - Compound `ref/path` key encoding and resolution
//! - The `Catalog` trait the listing engine queries
//! - An in-memory catalog seeded from TOML
//! - Configuration management
//! - Catalog-side retry with exponential backoff
//!
//! The real versioned catalog lives elsewhere; anything implementing
//! [`Catalog`] can be plugged into the gateway.

pub mod config;
pub mod error;
pub mod memory;
pub mod path;
pub mod retry;
pub mod traits;

pub use config::{CatalogConfig, Config, ConfigManager, ListingConfig, RetryConfig, ServerConfig};
pub use error::{Error, Result};
pub use memory::{MemoryCatalog, Seed};
pub use path::{ResolvedPath, SEPARATOR, decode, encode};
pub use retry::{RetryingCatalog, is_retryable_error, retry_with_backoff};
pub use traits::{Branch, Catalog, Entry, EntryType};
