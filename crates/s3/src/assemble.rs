//! Result assembly
//!
//! Converts a raw catalog [`Listing`] into S3 common prefixes and contents,
//! re-encoding every key with its ref. Catalog order is kept as is.

use lg_core::{EntryType, encode};

use crate::dispatch::Listing;
use crate::response::{CommonPrefix, Contents, STORAGE_CLASS, etag, format_timestamp};

/// One page in S3 shape, before version-specific framing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub common_prefixes: Vec<CommonPrefix>,
    pub contents: Vec<Contents>,
    /// Number of raw catalog items, prefixes and contents together
    pub key_count: usize,
    pub has_more: bool,
    /// Compound key of the last item, empty for an empty page
    pub last_key: String,
}

pub fn assemble(listing: Listing) -> Page {
    match listing {
        Listing::Branches { branches, has_more } => {
            let key_count = branches.len();
            let last_key = branches
                .last()
                .map(|b| encode(&b.id, ""))
                .unwrap_or_default();
            let common_prefixes = branches
                .into_iter()
                .map(|b| CommonPrefix {
                    prefix: encode(&b.id, ""),
                })
                .collect();
            Page {
                common_prefixes,
                contents: Vec::new(),
                key_count,
                has_more,
                last_key,
            }
        }
        Listing::Entries {
            ref_id,
            entries,
            has_more,
        } => {
            let mut page = Page {
                key_count: entries.len(),
                has_more,
                last_key: entries
                    .last()
                    .map(|e| encode(&ref_id, &e.name))
                    .unwrap_or_default(),
                ..Page::default()
            };
            for entry in entries {
                let key = encode(&ref_id, &entry.name);
                match entry.entry_type {
                    EntryType::Tree => page.common_prefixes.push(CommonPrefix { prefix: key }),
                    EntryType::Object => page.contents.push(Contents {
                        key,
                        last_modified: format_timestamp(entry.creation_date),
                        etag: etag(&entry.checksum),
                        size: entry.size,
                        storage_class: STORAGE_CLASS.to_string(),
                    }),
                }
            }
            page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use lg_core::{Branch, Entry};

    #[test]
    fn test_branches_become_prefixes() {
        let page = assemble(Listing::Branches {
            branches: vec![Branch::new("main"), Branch::new("main-2")],
            has_more: true,
        });
        let prefixes: Vec<_> = page.common_prefixes.iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["main", "main-2"]);
        assert!(page.contents.is_empty());
        assert_eq!(page.key_count, 2);
        assert_eq!(page.last_key, "main-2");
        assert!(page.has_more);
    }

    #[test]
    fn test_entries_split_by_type() {
        let ts: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();
        let page = assemble(Listing::Entries {
            ref_id: "main".to_string(),
            entries: vec![
                Entry::object("data/a.csv", 10, "c1", ts),
                Entry::tree("data/b/"),
                Entry::object("data/c.csv", 20, "c2", ts),
            ],
            has_more: false,
        });

        assert_eq!(page.common_prefixes, vec![CommonPrefix {
            prefix: "main/data/b/".to_string()
        }]);
        assert_eq!(page.contents.len(), 2);
        assert_eq!(page.contents[0].key, "main/data/a.csv");
        assert_eq!(page.contents[0].etag, "\"c1\"");
        assert_eq!(page.contents[0].last_modified, "2024-03-01T12:00:00.000Z");
        assert_eq!(page.contents[1].size, 20);
        assert_eq!(page.key_count, 3);
        assert_eq!(page.last_key, "main/data/c.csv");
    }

    #[test]
    fn test_last_key_can_be_a_tree() {
        let page = assemble(Listing::Entries {
            ref_id: "dev".to_string(),
            entries: vec![Entry::tree("x/")],
            has_more: true,
        });
        assert_eq!(page.last_key, "dev/x/");
    }

    #[test]
    fn test_empty_listing() {
        let page = assemble(Listing::Entries {
            ref_id: "main".to_string(),
            entries: vec![],
            has_more: false,
        });
        assert_eq!(page, Page::default());
    }
}
