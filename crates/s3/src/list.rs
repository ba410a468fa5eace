//! ListObjects handler
//!
//! Entry point for `GET /{repository}`. Answers `?versioning` with a canned
//! document, otherwise routes to the V1 or V2 adapter by `list-type`. Both
//! adapters run the same pipeline (normalize, dispatch, assemble) and only
//! differ in cursor parameters and how truncation is reported.

use std::sync::Arc;

use lg_core::Catalog;
use lg_core::config::LIST_OBJECTS_MAX_KEYS;
use tracing::Instrument;

use crate::assemble::{Page, assemble};
use crate::dispatch::dispatch;
use crate::error::ApiResult;
use crate::params::{ListRequest, ListType, QueryParams, v2_cursor};
use crate::response::{ListBucketResult, ListBucketResultV2, ListObjectsOutput, S3_XMLNS};
use crate::truncation;

/// Whether the request is a bucket versioning query
pub fn is_versioning_request(params: &QueryParams) -> bool {
    params.contains_key_ignore_case("versioning")
}

/// Stateless ListObjects handler over a shared catalog
#[derive(Clone)]
pub struct ListObjects {
    catalog: Arc<dyn Catalog>,
    max_keys: usize,
}

impl ListObjects {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            max_keys: LIST_OBJECTS_MAX_KEYS,
        }
    }

    /// Override the default and maximum page size
    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys.max(1);
        self
    }

    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// Handle one ListObjects request against `repository`
    pub async fn handle(
        &self,
        repository: &str,
        params: &QueryParams,
    ) -> ApiResult<ListObjectsOutput> {
        if is_versioning_request(params) {
            return Ok(ListObjectsOutput::Versioning);
        }

        let list_type = ListType::parse(params.get("list-type")).inspect_err(|_| {
            tracing::error!(
                list_type = params.get("list-type"),
                "listObjects version not supported"
            );
        })?;

        let span = tracing::info_span!("list_objects", repository, list_type = list_type.as_str());
        async {
            tracing::debug!("list_objects");
            match list_type {
                ListType::V1 => self.list_v1(repository, params).await.map(ListObjectsOutput::V1),
                ListType::V2 => self.list_v2(repository, params).await.map(ListObjectsOutput::V2),
            }
        }
        .instrument(span)
        .await
    }

    async fn list_page(&self, repository: &str, request: &ListRequest) -> ApiResult<Page> {
        let listing = dispatch(self.catalog.as_ref(), repository, request).await?;
        Ok(assemble(listing))
    }

    /// ListObjects (V1): resumes from `marker`
    pub async fn list_v1(
        &self,
        repository: &str,
        params: &QueryParams,
    ) -> ApiResult<ListBucketResult> {
        let marker = params.get("marker");
        let request = ListRequest::normalize(params, marker, self.max_keys)?;
        let page = self.list_page(repository, &request).await?;
        let truncation = truncation::shape(ListType::V1, request.traversal, &page);

        Ok(ListBucketResult {
            xmlns: S3_XMLNS.to_string(),
            name: repository.to_string(),
            prefix: request.prefix_raw,
            delimiter: request.delimiter,
            marker: marker.to_string(),
            key_count: page.key_count,
            max_keys: request.max_keys,
            is_truncated: truncation.is_truncated,
            next_marker: truncation.next_cursor,
            common_prefixes: page.common_prefixes,
            contents: page.contents,
        })
    }

    /// ListObjectsV2: resumes from `continuation-token`, else `start-after`
    pub async fn list_v2(
        &self,
        repository: &str,
        params: &QueryParams,
    ) -> ApiResult<ListBucketResultV2> {
        let request = ListRequest::normalize(params, v2_cursor(params), self.max_keys)?;
        let page = self.list_page(repository, &request).await?;
        let truncation = truncation::shape(ListType::V2, request.traversal, &page);

        let non_empty = |key: &str| Some(params.get(key).to_string()).filter(|v| !v.is_empty());

        Ok(ListBucketResultV2 {
            xmlns: S3_XMLNS.to_string(),
            name: repository.to_string(),
            prefix: request.prefix_raw,
            delimiter: request.delimiter,
            start_after: non_empty("start-after"),
            continuation_token: non_empty("continuation-token"),
            key_count: page.key_count,
            max_keys: request.max_keys,
            is_truncated: truncation.is_truncated,
            next_continuation_token: truncation.next_cursor,
            common_prefixes: page.common_prefixes,
            contents: page.contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use jiff::Timestamp;
    use lg_core::MemoryCatalog;

    fn handler() -> ListObjects {
        let c = MemoryCatalog::new();
        c.create_repository("lake").unwrap();
        for b in ["main", "main-old", "dev"] {
            c.create_branch("lake", b).unwrap();
        }
        for p in ["data/a.csv", "data/b/1.csv", "data/b/2.csv", "data/c.csv", "top.txt"] {
            c.put_object("lake", "main", p, 5, "sum", Timestamp::UNIX_EPOCH)
                .unwrap();
        }
        ListObjects::new(Arc::new(c))
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(pairs.iter().copied())
    }

    #[tokio::test]
    async fn test_versioning_short_circuits() {
        let h = handler();
        let p = params(&[("Versioning", ""), ("list-type", "3"), ("delimiter", "|")]);
        assert_eq!(h.handle("lake", &p).await.unwrap(), ListObjectsOutput::Versioning);
    }

    #[tokio::test]
    async fn test_unknown_list_type() {
        let err = handler()
            .handle("lake", &params(&[("list-type", "3")]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_default_is_v1() {
        let out = handler().handle("lake", &params(&[])).await.unwrap();
        let ListObjectsOutput::V1(resp) = out else {
            panic!("expected V1 output");
        };
        let ids: Vec<_> = resp.common_prefixes.iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(ids, vec!["dev", "main", "main-old"]);
        assert_eq!(resp.key_count, 3);
    }

    #[tokio::test]
    async fn test_v1_branch_listing() {
        let resp = handler()
            .list_v1("lake", &params(&[("prefix", "main"), ("delimiter", "/")]))
            .await
            .unwrap();
        let ids: Vec<_> = resp.common_prefixes.iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(ids, vec!["main", "main-old"]);
        assert_eq!(resp.key_count, 2);
        assert!(resp.contents.is_empty());
        assert!(!resp.is_truncated);
    }

    #[tokio::test]
    async fn test_v1_flat_truncation_reports_marker() {
        let resp = handler()
            .list_v1(
                "lake",
                &params(&[("prefix", "main/data/"), ("delimiter", "/"), ("max-keys", "2")]),
            )
            .await
            .unwrap();
        assert!(resp.is_truncated);
        assert_eq!(resp.next_marker.as_deref(), Some("main/data/b/"));
        assert_eq!(resp.contents[0].key, "main/data/a.csv");
        assert_eq!(resp.common_prefixes[0].prefix, "main/data/b/");
    }

    #[tokio::test]
    async fn test_v1_recursive_truncation_omits_marker() {
        let resp = handler()
            .list_v1("lake", &params(&[("prefix", "main/data/"), ("max-keys", "2")]))
            .await
            .unwrap();
        assert!(resp.is_truncated);
        assert_eq!(resp.next_marker, None);
        assert!(resp.common_prefixes.is_empty());
    }

    #[tokio::test]
    async fn test_v2_echoes_continuation_token() {
        let resp = handler()
            .list_v2(
                "lake",
                &params(&[
                    ("list-type", "2"),
                    ("prefix", "main/data/"),
                    ("continuation-token", "main/data/b/2.csv"),
                    ("start-after", "main/data/a.csv"),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(resp.continuation_token.as_deref(), Some("main/data/b/2.csv"));
        assert_eq!(resp.start_after.as_deref(), Some("main/data/a.csv"));
        let keys: Vec<_> = resp.contents.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["main/data/c.csv"]);
    }

    #[tokio::test]
    async fn test_v2_start_after_alone() {
        let resp = handler()
            .list_v2(
                "lake",
                &params(&[("prefix", "main/data/"), ("start-after", "main/data/b/1.csv")]),
            )
            .await
            .unwrap();
        assert_eq!(resp.continuation_token, None);
        let keys: Vec<_> = resp.contents.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["main/data/b/2.csv", "main/data/c.csv"]);
    }

    #[tokio::test]
    async fn test_v2_key_count_includes_prefixes() {
        let resp = handler()
            .list_v2("lake", &params(&[("prefix", "main/data/"), ("delimiter", "/")]))
            .await
            .unwrap();
        assert_eq!(resp.common_prefixes.len(), 1);
        assert_eq!(resp.contents.len(), 2);
        assert_eq!(resp.key_count, 3);
    }

    #[tokio::test]
    async fn test_missing_branch_is_empty() {
        let resp = handler()
            .list_v2("lake", &params(&[("prefix", "ghost/x")]))
            .await
            .unwrap();
        assert!(resp.contents.is_empty());
        assert!(resp.common_prefixes.is_empty());
        assert!(!resp.is_truncated);
        assert_eq!(resp.key_count, 0);
    }

    #[tokio::test]
    async fn test_max_keys_respects_configured_cap() {
        let h = handler().with_max_keys(2);
        let resp = h
            .list_v2("lake", &params(&[("prefix", "main/"), ("max-keys", "50")]))
            .await
            .unwrap();
        assert_eq!(resp.max_keys, 2);
        assert_eq!(resp.contents.len(), 2);
        assert!(resp.is_truncated);
    }
}
