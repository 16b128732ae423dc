//! Result merger: dedup then rank then truncate.

use crate::types::Poi;

use super::dedup::deduplicate;
use super::ranking::rank;

/// Merge up to two provider lists into one ranked, deduplicated list of at
/// most `max_results` POIs.
///
/// Pass an empty vector for a provider that was skipped or failed. The
/// output depends only on the inputs, so identical inputs always produce
/// identical output.
pub fn merge_results(primary: Vec<Poi>, secondary: Vec<Poi>, max_results: usize) -> Vec<Poi> {
    rank(deduplicate(primary, secondary), max_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::name_normalize::normalize_name;
    use crate::orchestrator::ranking::is_ranked;
    use crate::types::Coordinates;
    use std::collections::HashSet;

    fn make_poi(id: &str, name: &str, rating: f64, distance: f64) -> Poi {
        Poi::new(id, name, "attraction", Coordinates::new(45.5, -121.8), distance, rating)
    }

    fn primary() -> Vec<Poi> {
        vec![
            make_poi("l1", "Lost Lake Resort", 4.2, 0.2),
            make_poi("l2", "Lost Lake Trail #16", 4.7, 0.5),
            make_poi("l3", "Lost Lake Campground", 4.2, 0.7),
        ]
    }

    fn secondary() -> Vec<Poi> {
        vec![
            make_poi("c1", "Lost Lake Resort", 4.1, 0.3),
            make_poi("c2", "Hood River Valley", 4.5, 12.7),
            make_poi("c3", "Government Camp", 4.0, 15.2),
        ]
    }

    #[test]
    fn merged_list_is_ranked_unique_and_bounded() {
        let merged = merge_results(primary(), secondary(), 8);
        assert_eq!(merged.len(), 5);
        assert!(is_ranked(&merged));

        let keys: HashSet<String> = merged.iter().map(|p| normalize_name(&p.name)).collect();
        assert_eq!(keys.len(), merged.len());
        let ids: HashSet<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), merged.len());
    }

    #[test]
    fn ids_colliding_across_providers_stay_unique() {
        let merged = merge_results(
            vec![make_poi("poi-1", "Lost Lake Resort", 4.2, 0.2)],
            vec![
                make_poi("poi-1", "Hood River Valley", 4.5, 12.7),
                make_poi("poi-2", "Government Camp", 4.0, 15.2),
            ],
            8,
        );
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["poi-1", "poi-2"]);
        assert_eq!(merged[0].name, "Lost Lake Resort");
    }

    #[test]
    fn primary_fields_survive_duplicate() {
        let merged = merge_results(primary(), secondary(), 8);
        let resorts: Vec<&Poi> = merged.iter().filter(|p| p.name == "Lost Lake Resort").collect();
        assert_eq!(resorts.len(), 1);
        assert_eq!(resorts[0].id, "l1");
        assert!((resorts[0].rating - 4.2).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_is_deterministic() {
        let a = merge_results(primary(), secondary(), 8);
        let b = merge_results(primary(), secondary(), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn respects_max_results() {
        for max in 1..=6 {
            let merged = merge_results(primary(), secondary(), max);
            assert!(merged.len() <= max);
        }
    }

    #[test]
    fn empty_primary_yields_sorted_secondary() {
        let merged = merge_results(vec![], secondary(), 8);
        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c1", "c3"]);
    }

    #[test]
    fn both_empty_is_empty() {
        assert!(merge_results(vec![], vec![], 8).is_empty());
    }

    #[test]
    fn rating_tie_resolved_by_distance() {
        // Resort and campground share 4.2; the resort is closer.
        let merged = merge_results(primary(), vec![], 8);
        let resort = merged.iter().position(|p| p.id == "l1").expect("resort");
        let camp = merged.iter().position(|p| p.id == "l3").expect("campground");
        assert!(resort < camp);
    }
}
