//! Primary-wins deduplication by normalised name and id.
//!
//! The local provider's view is treated as higher-trust: when both lists
//! contain the same place, the primary entry is kept and the secondary one
//! dropped, regardless of which has the better rating. A later POI that
//! reuses an id already taken is dropped too, so ids stay unique across the
//! merged set.

use std::collections::HashSet;

use crate::types::Poi;

use super::name_normalize::normalize_name;

/// Concatenate `primary` then `secondary`, keeping only the first POI seen
/// for each normalised name and for each id.
///
/// Order is first-seen order; ranking happens afterwards.
pub fn deduplicate(primary: Vec<Poi>, secondary: Vec<Poi>) -> Vec<Poi> {
    let capacity = primary.len() + secondary.len();
    let mut seen_names: HashSet<String> = HashSet::with_capacity(capacity);
    let mut seen_ids: HashSet<String> = HashSet::with_capacity(capacity);
    let mut merged = Vec::with_capacity(capacity);

    for poi in primary.into_iter().chain(secondary) {
        let key = normalize_name(&poi.name);
        if seen_names.contains(&key) || seen_ids.contains(&poi.id) {
            continue;
        }
        seen_names.insert(key);
        seen_ids.insert(poi.id.clone());
        merged.push(poi);
    }
    merged
}
