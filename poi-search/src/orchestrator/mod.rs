//! Discovery orchestrator: provider fan-out, dedup, ranking, integrity.
//!
//! This module runs the providers a strategy asks for, merges their POI
//! lists with primary-wins deduplication by normalised name, ranks by rating
//! then distance, and hands the merged list to the integrity guard.

pub mod dedup;
pub mod merge;
pub mod name_normalize;
pub mod ranking;
pub mod search;
