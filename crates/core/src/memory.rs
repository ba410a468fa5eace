//! In-memory catalog
//!
//! A small reference [`Catalog`] backed by ordered maps. It is used by the
//! `lakegate` binary to serve a seeded namespace and by the test suites.
//! Paths are stored flat (`data/2024/a.csv`); trees are derived on the fly
//! when a flat listing folds deeper paths into one level.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::path::SEPARATOR;
use crate::traits::{Branch, Catalog, Entry};

/// Stored metadata for one object
#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectRecord {
    size: i64,
    checksum: String,
    last_modified: Timestamp,
}

type Objects = BTreeMap<String, ObjectRecord>;
type Branches = BTreeMap<String, Objects>;

/// Catalog held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    repositories: RwLock<BTreeMap<String, Branches>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed seed
    pub fn from_seed(seed: Seed) -> Result<Self> {
        let catalog = Self::new();
        for repo in seed.repositories {
            catalog.create_repository(&repo.id)?;
            for branch in repo.branches {
                catalog.create_branch(&repo.id, &branch.id)?;
                for object in branch.objects {
                    let checksum = match (&object.checksum, &object.content) {
                        (Some(c), _) => c.clone(),
                        (None, Some(content)) => hex::encode(Sha256::digest(content.as_bytes())),
                        (None, None) => hex::encode(Sha256::digest(object.path.as_bytes())),
                    };
                    let size = object
                        .size
                        .or_else(|| object.content.as_ref().map(|c| c.len() as i64))
                        .unwrap_or(0);
                    catalog.put_object(
                        &repo.id,
                        &branch.id,
                        &object.path,
                        size,
                        &checksum,
                        object.last_modified.unwrap_or(Timestamp::UNIX_EPOCH),
                    )?;
                }
            }
        }
        Ok(catalog)
    }

    /// Load a catalog from a TOML seed file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), repositories = seed.repositories.len(), "Loaded catalog seed");
        Self::from_seed(seed)
    }

    pub fn create_repository(&self, repository: &str) -> Result<()> {
        let mut repos = self.write()?;
        repos.entry(repository.to_string()).or_default();
        Ok(())
    }

    pub fn create_branch(&self, repository: &str, branch: &str) -> Result<()> {
        if branch.is_empty() || branch.contains(SEPARATOR) {
            return Err(Error::InvalidArgument(format!(
                "invalid branch name '{branch}'"
            )));
        }
        let mut repos = self.write()?;
        let branches = repos
            .get_mut(repository)
            .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?;
        branches.entry(branch.to_string()).or_default();
        Ok(())
    }

    /// Insert or replace an object
    pub fn put_object(
        &self,
        repository: &str,
        branch: &str,
        path: &str,
        size: i64,
        checksum: &str,
        last_modified: Timestamp,
    ) -> Result<()> {
        if path.is_empty() || path.ends_with(SEPARATOR) {
            return Err(Error::InvalidPath(format!("invalid object path '{path}'")));
        }
        let mut repos = self.write()?;
        let objects = repos
            .get_mut(repository)
            .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?
            .get_mut(branch)
            .ok_or_else(|| Error::BranchNotFound(branch.to_string()))?;
        objects.insert(
            path.to_string(),
            ObjectRecord {
                size,
                checksum: checksum.to_string(),
                last_modified,
            },
        );
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Branches>>> {
        self.repositories
            .read()
            .map_err(|_| Error::General("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Branches>>> {
        self.repositories
            .write()
            .map_err(|_| Error::General("catalog lock poisoned".to_string()))
    }
}

/// Fold `key` into the entry a flat listing under `prefix` reports for it
fn flat_entry(prefix: &str, key: &str, record: &ObjectRecord) -> Entry {
    let rest = &key[prefix.len()..];
    match rest.find(SEPARATOR) {
        Some(idx) => Entry::tree(&key[..prefix.len() + idx + SEPARATOR.len()]),
        None => Entry::object(key, record.size, &record.checksum, record.last_modified),
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_branches_by_prefix(
        &self,
        repository: &str,
        prefix: &str,
        limit: usize,
        after: &str,
    ) -> Result<(Vec<Branch>, bool)> {
        let repos = self.read()?;
        let branches = repos
            .get(repository)
            .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?;

        let mut matching = branches
            .keys()
            .filter(|id| id.starts_with(prefix) && id.as_str() > after)
            .map(|id| Branch::new(id.as_str()));

        let page: Vec<Branch> = matching.by_ref().take(limit).collect();
        let has_more = matching.next().is_some();
        Ok((page, has_more))
    }

    async fn list_objects_by_prefix(
        &self,
        repository: &str,
        ref_id: &str,
        path: &str,
        after: &str,
        limit: usize,
        recursive: bool,
    ) -> Result<(Vec<Entry>, bool)> {
        let repos = self.read()?;
        let objects = repos
            .get(repository)
            .ok_or_else(|| Error::RepositoryNotFound(repository.to_string()))?
            .get(ref_id)
            .ok_or_else(|| Error::BranchNotFound(ref_id.to_string()))?;

        let mut entries: Vec<Entry> = Vec::new();
        let mut has_more = false;

        for (key, record) in objects.range::<str, _>((Bound::Included(path), Bound::Unbounded)) {
            if !key.starts_with(path) {
                break;
            }
            let entry = if recursive {
                Entry::object(key, record.size, &record.checksum, record.last_modified)
            } else {
                flat_entry(path, key, record)
            };
            if entry.name.as_str() <= after {
                continue;
            }
            // keys under one tree are contiguous, so only the last entry can repeat
            if entries.last().is_some_and(|last| last.name == entry.name) {
                continue;
            }
            if entries.len() == limit {
                has_more = true;
                break;
            }
            entries.push(entry);
        }

        Ok((entries, has_more))
    }
}

/// Seed file describing the initial catalog content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub repositories: Vec<SeedRepository>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRepository {
    pub id: String,
    #[serde(default)]
    pub branches: Vec<SeedBranch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBranch {
    pub id: String,
    #[serde(default)]
    pub objects: Vec<SeedObject>,
}

/// One object in a seed file
///
/// `size` and `checksum` are derived from `content` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedObject {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}
