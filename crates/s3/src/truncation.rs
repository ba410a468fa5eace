//! Truncation reporting
//!
//! V1 and V2 disagree on when the next cursor is echoed back. V2 always
//! reports `NextContinuationToken` for a truncated page. V1 only reports
//! `NextMarker` when a delimiter was given; without one S3 clients resume
//! from the last key they received.

use crate::assemble::Page;
use crate::params::{ListType, Traversal};

/// How a truncated page is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub is_truncated: bool,
    /// Value for `NextMarker` / `NextContinuationToken`
    pub next_cursor: Option<String>,
}

/// Decide `IsTruncated` and the next cursor for a page
pub fn shape(list_type: ListType, traversal: Traversal, page: &Page) -> Truncation {
    if !page.has_more {
        return Truncation {
            is_truncated: false,
            next_cursor: None,
        };
    }

    let emit = match list_type {
        ListType::V1 => traversal == Traversal::Flat,
        ListType::V2 => true,
    };

    Truncation {
        is_truncated: true,
        next_cursor: emit.then(|| page.last_key.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(has_more: bool) -> Page {
        Page {
            has_more,
            last_key: "main/data/c.csv".to_string(),
            key_count: 3,
            ..Page::default()
        }
    }

    #[test]
    fn test_not_truncated() {
        for list_type in [ListType::V1, ListType::V2] {
            for traversal in [Traversal::Flat, Traversal::Recursive] {
                let t = shape(list_type, traversal, &page(false));
                assert!(!t.is_truncated);
                assert_eq!(t.next_cursor, None);
            }
        }
    }

    #[test]
    fn test_v1_flat_reports_next_marker() {
        let t = shape(ListType::V1, Traversal::Flat, &page(true));
        assert!(t.is_truncated);
        assert_eq!(t.next_cursor.as_deref(), Some("main/data/c.csv"));
    }

    #[test]
    fn test_v1_recursive_omits_next_marker() {
        let t = shape(ListType::V1, Traversal::Recursive, &page(true));
        assert!(t.is_truncated);
        assert_eq!(t.next_cursor, None);
    }

    #[test]
    fn test_v2_always_reports_token() {
        for traversal in [Traversal::Flat, Traversal::Recursive] {
            let t = shape(ListType::V2, traversal, &page(true));
            assert!(t.is_truncated);
            assert_eq!(t.next_cursor.as_deref(), Some("main/data/c.csv"));
        }
    }
}
