//! lg-s3: S3 ListObjects protocol engine for lakegate
//!
//! Answers `ListObjects` and `ListObjectsV2` queries over a branch-addressed
//! namespace. Keys have the form `ref/path`: a prefix without a separator
//! lists branches, a prefix with one lists entries inside that ref.
//!
//! The request pipeline is:
//! - [`params`]: validate query parameters into a [`ListRequest`]
//! - [`dispatch`]: make the single catalog call
//! - [`assemble`]: turn catalog records into S3 prefixes and contents
//! - [`truncation`]: decide how a truncated page is reported
//! - [`list`]: the V1/V2 adapters and the top-level handler
//!
//! [`server`] exposes the handler over HTTP with axum.

pub mod assemble;
pub mod dispatch;
pub mod error;
pub mod list;
pub mod params;
pub mod response;
pub mod server;
pub mod truncation;

pub use error::{ApiError, ApiResult, ErrorKind};
pub use list::{ListObjects, is_versioning_request};
pub use params::{ListRequest, ListType, QueryParams, Traversal};
pub use response::{
    CommonPrefix, Contents, ListBucketResult, ListBucketResultV2, ListObjectsOutput, XmlResponse,
};
pub use server::{router, serve};
