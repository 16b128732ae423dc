//! Ranking of merged POIs.
//!
//! Rating is the primary signal (higher first); distance from the origin
//! breaks ties (closer first). Remaining ties keep first-seen order because
//! the sort is stable.

use std::cmp::Ordering;

use crate::types::Poi;

/// Ranking comparator: rating descending, then distance ascending.
pub fn compare(a: &Poi, b: &Poi) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.distance_from_origin.total_cmp(&b.distance_from_origin))
}

/// Stable-sort `pois` by [`compare`] and keep at most `max_results`.
pub fn rank(mut pois: Vec<Poi>, max_results: usize) -> Vec<Poi> {
    pois.sort_by(compare);
    pois.truncate(max_results);
    pois
}

/// `true` when every adjacent pair is in ranking order.
pub fn is_ranked(pois: &[Poi]) -> bool {
    pois.windows(2).all(|w| compare(&w[0], &w[1]) != Ordering::Greater)
}
