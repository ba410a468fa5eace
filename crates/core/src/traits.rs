//! Catalog trait and the records it returns
//!
//! The catalog is the versioned index that actually knows which branches
//! and entries exist. The gateway only reads from it.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A branch known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
}

impl Branch {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Intermediate path segment, only reported by flat listings
    Tree,
    /// Leaf object
    Object,
}

/// A catalog entry inside a ref
///
/// `name` is the full path relative to the ref, e.g. `data/2024/` for a
/// tree or `data/2024/a.csv` for an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub entry_type: EntryType,
    pub creation_date: Timestamp,
    pub checksum: String,
    pub size: i64,
}

impl Entry {
    /// Create a tree entry for an intermediate path segment
    pub fn tree(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Tree,
            creation_date: Timestamp::UNIX_EPOCH,
            checksum: String::new(),
            size: 0,
        }
    }

    /// Create an object entry
    pub fn object(
        name: impl Into<String>,
        size: i64,
        checksum: impl Into<String>,
        creation_date: Timestamp,
    ) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Object,
            creation_date,
            checksum: checksum.into(),
            size,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.entry_type == EntryType::Tree
    }
}

/// Read access to a versioned catalog
///
/// Both operations return at most `limit` items in lexicographic order,
/// strictly after `after`, together with a flag telling whether more items
/// exist. Missing repositories, branches or paths are reported with an
/// error for which [`crate::Error::is_not_found`] holds.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List branches whose id starts with `prefix`
    async fn list_branches_by_prefix(
        &self,
        repository: &str,
        prefix: &str,
        limit: usize,
        after: &str,
    ) -> Result<(Vec<Branch>, bool)>;

    /// List entries of `ref_id` whose path starts with `path`
    ///
    /// When `recursive` is false, paths below the next separator are folded
    /// into a single [`EntryType::Tree`] entry.
    async fn list_objects_by_prefix(
        &self,
        repository: &str,
        ref_id: &str,
        path: &str,
        after: &str,
        limit: usize,
        recursive: bool,
    ) -> Result<(Vec<Entry>, bool)>;
}
