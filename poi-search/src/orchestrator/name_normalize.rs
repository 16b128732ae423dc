//! POI name normalisation for deduplication.
//!
//! Two providers often spell the same place with different capitalisation
//! or spacing. The normalised form is the merge key.

/// Normalise a POI name for deduplication comparison.
///
/// Trims, lowercases, and collapses every run of internal whitespace to a
/// single space.
///
/// # Examples
///
/// ```
/// use poi_search::orchestrator::name_normalize::normalize_name;
///
/// assert_eq!(normalize_name("  Lost   Lake\tResort "), "lost lake resort");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
