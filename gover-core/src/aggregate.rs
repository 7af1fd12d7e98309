use std::collections::HashSet;
use tracing::warn;

use crate::model::VersionData;

/// Orders scraped versions newest first.
///
/// Records are never modified. If the same version appears more than once the
/// first-seen record is kept and later ones are dropped; the remaining records
/// are stable-sorted by numeric minor, descending.
pub fn aggregate(items: Vec<VersionData>) -> Vec<VersionData> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut merged: Vec<VersionData> = items
        .into_iter()
        .filter(|item| {
            let first = seen.insert(item.version);
            if !first {
                warn!(version = %item.version, "[AGGREGATE] Dropping duplicate version record");
            }
            first
        })
        .collect();
    merged.sort_by(|a, b| b.version.cmp(&a.version));
    merged
}
