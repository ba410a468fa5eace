//! Listing dispatch
//!
//! Chooses between branch listing and entry listing for a normalized
//! request and performs the single catalog call. A "not found" answer from
//! the catalog is an empty page, the way S3 treats a prefix that matches
//! nothing.

use lg_core::{Branch, Catalog, Entry};

use crate::error::{ApiError, ApiResult};
use crate::params::{ListRequest, ListingMode};

/// Raw catalog answer for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Branches {
        branches: Vec<Branch>,
        has_more: bool,
    },
    Entries {
        ref_id: String,
        entries: Vec<Entry>,
        has_more: bool,
    },
}

impl Listing {
    pub fn has_more(&self) -> bool {
        match self {
            Listing::Branches { has_more, .. } | Listing::Entries { has_more, .. } => *has_more,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Branches { branches, .. } => branches.len(),
            Listing::Entries { entries, .. } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Query the catalog for the page `request` asks for
pub async fn dispatch(
    catalog: &dyn Catalog,
    repository: &str,
    request: &ListRequest,
) -> ApiResult<Listing> {
    match request.mode() {
        ListingMode::Branches => {
            let prefix = &request.prefix.ref_id;
            tracing::debug!(prefix = %prefix, "listing branches with prefix");
            match catalog
                .list_branches_by_prefix(repository, prefix, request.max_keys, request.after())
                .await
            {
                Ok((branches, has_more)) => Ok(Listing::Branches { branches, has_more }),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(error = %e, prefix = %prefix, "no branches to list");
                    Ok(Listing::Branches {
                        branches: Vec::new(),
                        has_more: false,
                    })
                }
                Err(e) => {
                    tracing::error!(error = %e, prefix = %prefix, "could not list branches");
                    Err(ApiError::from_catalog(&e))
                }
            }
        }
        ListingMode::Entries => {
            let ref_id = &request.prefix.ref_id;
            let path = &request.prefix.path;
            match catalog
                .list_objects_by_prefix(
                    repository,
                    ref_id,
                    path,
                    request.after(),
                    request.max_keys,
                    request.traversal.is_recursive(),
                )
                .await
            {
                Ok((entries, has_more)) => Ok(Listing::Entries {
                    ref_id: ref_id.clone(),
                    entries,
                    has_more,
                }),
                Err(e) if e.is_not_found() => {
                    if matches!(e, lg_core::Error::BranchNotFound(_)) {
                        tracing::debug!(error = %e, ref_id = %ref_id, path = %path, "could not list objects in path");
                    }
                    Ok(Listing::Entries {
                        ref_id: ref_id.clone(),
                        entries: Vec::new(),
                        has_more: false,
                    })
                }
                Err(e) => {
                    tracing::error!(error = %e, ref_id = %ref_id, path = %path, "could not list objects in path");
                    Err(ApiError::from_catalog(&e))
                }
            }
        }
    }
}
