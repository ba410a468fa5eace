//! Pagination properties of the ListObjects handler
//!
//! Following the reported cursors page by page must reproduce the
//! unpaginated listing exactly, for both protocol versions and both listing
//! modes.

use std::sync::Arc;

use jiff::Timestamp;
use lg_core::MemoryCatalog;
use lg_s3::{ErrorKind, ListObjects, QueryParams};

fn catalog() -> MemoryCatalog {
    let c = MemoryCatalog::new();
    c.create_repository("lake").unwrap();
    for b in ["dev", "main", "main-2", "main-3", "release"] {
        c.create_branch("lake", b).unwrap();
    }
    let paths = [
        "data/2023/a.parquet",
        "data/2023/b.parquet",
        "data/2024/01/a.parquet",
        "data/2024/02/a.parquet",
        "data/a.csv",
        "data/b.csv",
        "data/c.csv",
        "data/raw/x.json",
        "data/z.csv",
        "docs/readme.md",
    ];
    for (i, p) in paths.iter().enumerate() {
        c.put_object("lake", "main", p, i as i64 + 1, &format!("sum{i}"), Timestamp::UNIX_EPOCH)
            .unwrap();
    }
    c
}

fn handler() -> ListObjects {
    ListObjects::new(Arc::new(catalog()))
}

fn params(pairs: &[(&str, &str)]) -> QueryParams {
    QueryParams::from_pairs(pairs.iter().copied())
}

/// Collect every key of a V2 listing by following continuation tokens
async fn collect_v2(h: &ListObjects, prefix: &str, delimiter: &str, max_keys: usize) -> Vec<String> {
    let mut keys = Vec::new();
    let mut token: Option<String> = None;
    let max_keys = max_keys.to_string();
    loop {
        let mut pairs = vec![
            ("list-type", "2"),
            ("prefix", prefix),
            ("delimiter", delimiter),
            ("max-keys", max_keys.as_str()),
        ];
        if let Some(t) = token.as_deref() {
            pairs.push(("continuation-token", t));
        }
        let resp = h.list_v2("lake", &params(&pairs)).await.unwrap();
        assert!(resp.common_prefixes.len() + resp.contents.len() <= resp.max_keys);
        keys.extend(resp.common_prefixes.into_iter().map(|p| p.prefix));
        keys.extend(resp.contents.into_iter().map(|c| c.key));
        if !resp.is_truncated {
            return keys;
        }
        token = Some(resp.next_continuation_token.expect("truncated V2 page has a token"));
    }
}

/// Collect every key of a flat V1 listing by following `NextMarker`
async fn collect_v1_flat(h: &ListObjects, prefix: &str, max_keys: usize) -> Vec<String> {
    let mut keys = Vec::new();
    let mut marker = String::new();
    let max_keys = max_keys.to_string();
    loop {
        let pairs = [
            ("prefix", prefix),
            ("delimiter", "/"),
            ("max-keys", max_keys.as_str()),
            ("marker", marker.as_str()),
        ];
        let resp = h.list_v1("lake", &params(&pairs)).await.unwrap();
        assert!(resp.common_prefixes.len() + resp.contents.len() <= resp.max_keys);
        keys.extend(resp.common_prefixes.into_iter().map(|p| p.prefix));
        keys.extend(resp.contents.into_iter().map(|c| c.key));
        if !resp.is_truncated {
            return keys;
        }
        marker = resp.next_marker.expect("truncated flat V1 page has a marker");
    }
}

fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

#[tokio::test]
async fn test_v2_recursive_pages_reassemble() {
    let h = handler();
    let full = collect_v2(&h, "main/data/", "", 1000).await;
    assert_eq!(full.len(), 9);
    for page_size in 1..=9 {
        assert_eq!(collect_v2(&h, "main/data/", "", page_size).await, full);
    }
}

#[tokio::test]
async fn test_v2_flat_pages_reassemble() {
    let h = handler();
    let full = sorted(collect_v2(&h, "main/data/", "/", 1000).await);
    assert_eq!(
        full,
        vec![
            "main/data/2023/",
            "main/data/2024/",
            "main/data/a.csv",
            "main/data/b.csv",
            "main/data/c.csv",
            "main/data/raw/",
            "main/data/z.csv",
        ]
    );
    for page_size in 1..=7 {
        assert_eq!(sorted(collect_v2(&h, "main/data/", "/", page_size).await), full);
    }
}

#[tokio::test]
async fn test_v1_flat_pages_reassemble() {
    let h = handler();
    let full = sorted(collect_v1_flat(&h, "main/", 1000).await);
    assert_eq!(full, vec!["main/data/", "main/docs/"]);

    let full = sorted(collect_v1_flat(&h, "main/data/", 1000).await);
    for page_size in 1..=7 {
        assert_eq!(sorted(collect_v1_flat(&h, "main/data/", page_size).await), full);
    }
}

#[tokio::test]
async fn test_branch_pages_reassemble() {
    let h = handler();
    let full = collect_v2(&h, "", "", 1000).await;
    assert_eq!(full, vec!["dev", "main", "main-2", "main-3", "release"]);
    for page_size in 1..=5 {
        assert_eq!(collect_v2(&h, "", "", page_size).await, full);
    }

    let mains = collect_v2(&h, "main", "/", 1).await;
    assert_eq!(mains, vec!["main", "main-2", "main-3"]);

    let mains = sorted(collect_v1_flat(&h, "main", 2).await);
    assert_eq!(mains, vec!["main", "main-2", "main-3"]);
}

#[tokio::test]
async fn test_continuation_token_beats_start_after() {
    let h = handler();
    let both = h
        .list_v2(
            "lake",
            &params(&[
                ("prefix", "main/data/"),
                ("start-after", "main/data/2023/a.parquet"),
                ("continuation-token", "main/data/c.csv"),
            ]),
        )
        .await
        .unwrap();
    let token_only = h
        .list_v2(
            "lake",
            &params(&[("prefix", "main/data/"), ("continuation-token", "main/data/c.csv")]),
        )
        .await
        .unwrap();
    assert_eq!(both.contents, token_only.contents);
    assert_eq!(both.contents[0].key, "main/data/raw/x.json");
}

#[tokio::test]
async fn test_cursor_from_other_ref_is_rejected() {
    let h = handler();
    let err = h
        .list_v2(
            "lake",
            &params(&[("prefix", "main/data/"), ("continuation-token", "dev/data/a.csv")]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let err = h
        .list_v1("lake", &params(&[("prefix", "main/data/"), ("marker", "release/x")]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let h = handler();
    let p = params(&[("list-type", "2"), ("prefix", "main/data/"), ("max-keys", "3")]);
    let first = h.handle("lake", &p).await.unwrap();
    let second = h.handle("lake", &p).await.unwrap();
    assert_eq!(first, second);
}
