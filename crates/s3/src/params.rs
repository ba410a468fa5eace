//! Request normalization
//!
//! Turns raw query parameters into a validated [`ListRequest`]: page size,
//! traversal mode, resolved prefix and the decoded resume cursor. Client
//! mistakes are rejected here, before the catalog is touched.

use lg_core::{ResolvedPath, SEPARATOR};

use crate::error::{ApiError, ApiResult};

/// Parsed query string, keeping parameter order and repeated keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw (percent-encoded) query string
    pub fn parse(query: &str) -> Self {
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value for `key`, or the empty string when absent
    pub fn get(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// Whether any key equals `key` ignoring case
    pub fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

/// Which ListObjects protocol version the request speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    V1,
    V2,
}

impl ListType {
    /// Parse `list-type`; absent means V1
    pub fn parse(raw: &str) -> ApiResult<Self> {
        match raw {
            "" | "1" => Ok(ListType::V1),
            "2" => Ok(ListType::V2),
            other => Err(ApiError::bad_request(format!(
                "list-type '{other}' is not supported"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListType::V1 => "v1",
            ListType::V2 => "v2",
        }
    }
}

/// How deep a listing descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// One level; deeper paths fold into common prefixes
    Flat,
    /// Every object at any depth; no common prefixes
    Recursive,
}

impl Traversal {
    pub fn is_recursive(self) -> bool {
        self == Traversal::Recursive
    }
}

/// What the request enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// The prefix names no path: list branches
    Branches,
    /// The prefix reaches into a ref: list entries
    Entries,
}

/// A fully validated listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// `prefix` exactly as the client sent it
    pub prefix_raw: String,
    pub prefix: ResolvedPath,
    /// `delimiter` exactly as the client sent it
    pub delimiter: String,
    pub traversal: Traversal,
    pub max_keys: usize,
    /// Decoded cursor, already checked against the prefix
    pub cursor: Option<ResolvedPath>,
}

impl ListRequest {
    /// Validate the common listing parameters and the given cursor
    ///
    /// `max_keys_cap` is both the default and the upper bound for the page
    /// size.
    pub fn normalize(params: &QueryParams, cursor: &str, max_keys_cap: usize) -> ApiResult<Self> {
        let delimiter = params.get("delimiter");
        let traversal = parse_delimiter(delimiter)?;
        let max_keys = parse_max_keys(params.get("max-keys"), max_keys_cap);

        let prefix_raw = params.get("prefix");
        let prefix = ResolvedPath::resolve(prefix_raw).map_err(|e| {
            tracing::error!(error = %e, path = prefix_raw, "could not resolve path for prefix");
            ApiError::bad_request(e.to_string())
        })?;

        let cursor = resolve_cursor(cursor, &prefix)?;

        Ok(Self {
            prefix_raw: prefix_raw.to_string(),
            prefix,
            delimiter: delimiter.to_string(),
            traversal,
            max_keys,
            cursor,
        })
    }

    pub fn mode(&self) -> ListingMode {
        if self.prefix.with_path {
            ListingMode::Entries
        } else {
            ListingMode::Branches
        }
    }

    /// Catalog-local resume point: a branch id or a ref-relative path
    pub fn after(&self) -> &str {
        match (&self.cursor, self.mode()) {
            (None, _) => "",
            (Some(c), ListingMode::Branches) => &c.ref_id,
            (Some(c), ListingMode::Entries) => &c.path,
        }
    }
}

/// Parse `max-keys`, falling back to `cap` on absence or garbage
///
/// Non-positive values also fall back; larger values are clamped to `cap`.
pub fn parse_max_keys(raw: &str, cap: usize) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).unwrap_or(cap).min(cap),
        _ => cap,
    }
}

/// Validate `delimiter` and derive the traversal mode
pub fn parse_delimiter(raw: &str) -> ApiResult<Traversal> {
    match raw {
        "" => Ok(Traversal::Recursive),
        SEPARATOR => Ok(Traversal::Flat),
        other => Err(ApiError::bad_request(format!(
            "delimiter '{other}' is not supported, only '{SEPARATOR}' is"
        ))),
    }
}

/// Pick the V2 resume point: `continuation-token` wins over `start-after`
pub fn v2_cursor(params: &QueryParams) -> &str {
    let token = params.get("continuation-token");
    if token.is_empty() {
        params.get("start-after")
    } else {
        token
    }
}

fn same_ref(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Decode a cursor and check that it belongs to the listed namespace
///
/// Entry listings require the cursor's ref to equal the prefix ref. Branch
/// listings resume from a bare branch id that must fall under the prefix.
fn resolve_cursor(raw: &str, prefix: &ResolvedPath) -> ApiResult<Option<ResolvedPath>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let reject = |reason: &str| {
        tracing::error!(
            branch = %prefix.ref_id,
            path = %prefix.path,
            marker = raw,
            "invalid marker - {reason}"
        );
        ApiError::bad_request(format!("invalid marker '{raw}': {reason}"))
    };

    let cursor = ResolvedPath::resolve(raw).map_err(|_| reject("cannot be resolved"))?;

    if prefix.with_path {
        if !same_ref(&cursor.ref_id, &prefix.ref_id) {
            return Err(reject("doesn't start with branch name"));
        }
    } else if cursor.with_path
        || !cursor
            .ref_id
            .to_lowercase()
            .starts_with(&prefix.ref_id.to_lowercase())
    {
        return Err(reject("doesn't match branch prefix"));
    }

    Ok(Some(cursor))
}
