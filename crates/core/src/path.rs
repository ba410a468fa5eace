//! Compound key encoding
//!
//! Every key the gateway hands out, and every prefix or cursor it receives,
//! has the form `ref/path`: the first segment names a branch (or other ref)
//! and the rest is a path inside that ref's namespace. A string without a
//! separator names only a ref.

use crate::error::{Error, Result};

/// Hierarchical path separator, also the only supported delimiter
pub const SEPARATOR: &str = "/";

/// A compound key split into its ref and path parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Branch or ref identifier
    pub ref_id: String,
    /// Path relative to the ref (may be empty)
    pub path: String,
    /// Whether a separator was present at all
    pub with_path: bool,
}

impl ResolvedPath {
    /// Resolve a compound key, rejecting keys that carry a path but no ref
    ///
    /// The empty string resolves to an empty ref without a path, which lists
    /// every branch.
    pub fn resolve(raw: &str) -> Result<Self> {
        let resolved = decode(raw);
        if resolved.with_path && resolved.ref_id.is_empty() {
            return Err(Error::InvalidPath(format!(
                "key '{raw}' has a path but no ref"
            )));
        }
        Ok(resolved)
    }
}

/// Split a compound key on its first separator
///
/// Decoding never fails: a string with no separator is a bare ref.
pub fn decode(raw: &str) -> ResolvedPath {
    match raw.split_once(SEPARATOR) {
        Some((ref_id, path)) => ResolvedPath {
            ref_id: ref_id.to_string(),
            path: path.to_string(),
            with_path: true,
        },
        None => ResolvedPath {
            ref_id: raw.to_string(),
            path: String::new(),
            with_path: false,
        },
    }
}

/// Join a ref and a ref-relative path into a compound key
///
/// An empty path yields the bare ref, which is how branches are reported.
pub fn encode(ref_id: &str, path: &str) -> String {
    if path.is_empty() {
        ref_id.to_string()
    } else {
        format!("{ref_id}{SEPARATOR}{path}")
    }
}
