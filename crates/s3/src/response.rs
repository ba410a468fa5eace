//! S3 response bodies
//!
//! Wire shapes for `ListObjects` (V1) and `ListObjectsV2`, the canned
//! versioning answer and the `<Error>` document, serialized to XML with
//! quick-xml.

use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use jiff::Timestamp;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// S3 XML namespace
pub const S3_XMLNS: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Answer to `GET /{bucket}?versioning`: versioning was never enabled
pub const VERSIONING_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<VersioningConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#;

/// Storage class reported for every object
pub const STORAGE_CLASS: &str = "STANDARD";

/// A `<CommonPrefixes>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonPrefix {
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

/// A `<Contents>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contents {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LastModified")]
    pub last_modified: String,
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(rename = "Size")]
    pub size: i64,
    #[serde(rename = "StorageClass")]
    pub storage_class: String,
}

/// ListObjects (V1) result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "ListBucketResult")]
pub struct ListBucketResult {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Prefix")]
    pub prefix: String,
    #[serde(rename = "Delimiter")]
    pub delimiter: String,
    #[serde(rename = "Marker")]
    pub marker: String,
    #[serde(rename = "KeyCount")]
    pub key_count: usize,
    #[serde(rename = "MaxKeys")]
    pub max_keys: usize,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker", skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
    #[serde(rename = "CommonPrefixes")]
    pub common_prefixes: Vec<CommonPrefix>,
    #[serde(rename = "Contents")]
    pub contents: Vec<Contents>,
}

/// ListObjectsV2 result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "ListBucketResult")]
pub struct ListBucketResultV2 {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Prefix")]
    pub prefix: String,
    #[serde(rename = "Delimiter")]
    pub delimiter: String,
    #[serde(rename = "StartAfter", skip_serializing_if = "Option::is_none")]
    pub start_after: Option<String>,
    #[serde(rename = "ContinuationToken", skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    #[serde(rename = "KeyCount")]
    pub key_count: usize,
    #[serde(rename = "MaxKeys")]
    pub max_keys: usize,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(
        rename = "NextContinuationToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_continuation_token: Option<String>,
    #[serde(rename = "CommonPrefixes")]
    pub common_prefixes: Vec<CommonPrefix>,
    #[serde(rename = "Contents")]
    pub contents: Vec<Contents>,
}

#[derive(Debug, Serialize)]
#[serde(rename = "Error")]
struct ErrorBody<'a> {
    #[serde(rename = "Code")]
    code: &'a str,
    #[serde(rename = "Message")]
    message: &'a str,
    #[serde(rename = "Resource")]
    resource: &'a str,
}

/// What a successful request produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListObjectsOutput {
    Versioning,
    V1(ListBucketResult),
    V2(ListBucketResultV2),
}

/// Format a timestamp the way S3 does: UTC, millisecond precision
pub fn format_timestamp(ts: Timestamp) -> String {
    format!(
        "{}.{:03}Z",
        ts.strftime("%Y-%m-%dT%H:%M:%S"),
        ts.subsec_millisecond().unsigned_abs()
    )
}

/// Quote a checksum into an ETag value
pub fn etag(checksum: &str) -> String {
    format!("\"{checksum}\"")
}

/// Serialize a document with the XML declaration in front
pub fn to_xml<T: Serialize>(value: &T) -> ApiResult<String> {
    let body = quick_xml::se::to_string(value)
        .map_err(|e| {
            tracing::error!(error = %e, "could not encode response");
            ApiError::internal(format!("could not encode response: {e}"))
        })?;
    Ok(format!("{XML_HEADER}\n{body}"))
}

/// Encoded HTTP answer: status plus XML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlResponse {
    pub status: StatusCode,
    pub body: String,
}

impl XmlResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// Render an error as an S3 `<Error>` document
    pub fn error(err: &ApiError, resource: &str) -> Self {
        let body = ErrorBody {
            code: err.kind.code(),
            message: &err.message,
            resource,
        };
        let body = to_xml(&body).unwrap_or_else(|_| {
            format!(
                "{XML_HEADER}\n<Error><Code>{}</Code></Error>",
                err.kind.code()
            )
        });
        Self {
            status: err.kind.status(),
            body,
        }
    }

    /// Encode the outcome of one request; exactly one response either way
    pub fn from_result(result: ApiResult<ListObjectsOutput>, resource: &str) -> Self {
        let encoded = result.and_then(|output| match output {
            ListObjectsOutput::Versioning => Ok(VERSIONING_RESPONSE.to_string()),
            ListObjectsOutput::V1(resp) => to_xml(&resp),
            ListObjectsOutput::V2(resp) => to_xml(&resp),
        });
        match encoded {
            Ok(body) => Self::ok(body),
            Err(err) => {
                // the failing stage has already logged with its own context
                tracing::debug!(error = %err, resource, "list objects failed");
                Self::error(&err, resource)
            }
        }
    }
}

impl IntoResponse for XmlResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/xml")],
            self.body,
        )
            .into_response()
    }
}
