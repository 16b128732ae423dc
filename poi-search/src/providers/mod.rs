//! Provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::PoiProvider`]:
//! the local inference adapter, the remote catalog adapter, and a fixed-list
//! provider used by demos and tests.

pub mod fixed;
pub mod local_inference;
pub mod remote_catalog;

pub use fixed::FixedProvider;
pub use local_inference::{InferenceBackend, InferenceOutput, InferencePrompt, LocalInferenceProvider};
pub use remote_catalog::{CatalogClient, CatalogPlace, CatalogQuery, RemoteCatalogProvider};

use std::collections::HashSet;

use crate::error::ProviderError;
use crate::types::Poi;

/// Reject the whole list if any POI breaks a field constraint or two POIs
/// share an id. Providers never hand back a partially valid list.
pub(crate) fn validate_pois(pois: &[Poi]) -> Result<(), ProviderError> {
    let mut ids = HashSet::with_capacity(pois.len());
    for poi in pois {
        poi.validate().map_err(ProviderError::InvalidResponse)?;
        if !ids.insert(poi.id.as_str()) {
            return Err(ProviderError::InvalidResponse(format!(
                "duplicate POI id '{}'",
                poi.id
            )));
        }
    }
    Ok(())
}

/// Lowercase ASCII-alphanumeric slug with `-` separators, for generated ids.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
