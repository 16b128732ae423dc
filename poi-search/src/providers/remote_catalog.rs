//! Remote catalog adapter: places API with broad coverage and higher latency.
//!
//! Transport, authentication and rate limiting belong to the
//! [`CatalogClient`] implementation. This adapter maps the request onto a
//! catalog query and the returned place records onto POIs.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::{PoiProvider, QueryContext};
use crate::types::{Coordinates, Poi, ProviderOutput, ProviderQuery, DEFAULT_PRICE_LEVEL};

use super::{slugify, validate_pois};

const DEFAULT_CATEGORY: &str = "attraction";

/// Query shape sent to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub keyword: String,
    pub origin: Coordinates,
    /// Catalog place type, see [`catalog_type_for`].
    pub place_type: &'static str,
    pub limit: usize,
}

/// One place record as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    pub location: Coordinates,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    /// Short address / neighbourhood text.
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Text of the most relevant review, if any.
    #[serde(default)]
    pub review_text: Option<String>,
}

/// Client for the remote places catalog.
pub trait CatalogClient: Send + Sync {
    /// Find places near `query.origin`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Unavailable`] for transport/auth failures,
    /// [`ProviderError::InvalidResponse`] for undecodable payloads.
    fn nearby(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<Vec<CatalogPlace>, ProviderError>> + Send;
}

/// [`PoiProvider`] over a [`CatalogClient`].
#[derive(Debug)]
pub struct RemoteCatalogProvider<C> {
    client: C,
}

impl<C: CatalogClient> RemoteCatalogProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CatalogClient> PoiProvider for RemoteCatalogProvider<C> {
    async fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> Result<ProviderOutput, ProviderError> {
        let category = query.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
        let catalog_query = CatalogQuery {
            keyword: query.location_name.clone(),
            origin: query.origin,
            place_type: catalog_type_for(category),
            limit: query.limit,
        };
        tracing::trace!(location = %query.location_name, place_type = catalog_query.place_type, "catalog query");

        let places = ctx.guard(self.client.nearby(&catalog_query)).await?;

        let mut pois = places
            .into_iter()
            .map(|place| place_to_poi(place, query.origin, category))
            .collect::<Result<Vec<_>, _>>()?;
        pois.truncate(query.limit);
        validate_pois(&pois)?;

        tracing::debug!(count = pois.len(), "catalog places mapped");
        Ok(ProviderOutput::new(pois))
    }

    fn name(&self) -> &str {
        "remote-catalog"
    }
}

/// Map a POI category onto the catalog's place type vocabulary.
pub fn catalog_type_for(category: &str) -> &'static str {
    match category.trim().to_lowercase().as_str() {
        "restaurant" | "food" => "restaurant",
        "gas_station" => "gas_station",
        "lodging" | "hotel" => "lodging",
        "attraction" | "tourist_attraction" | "scenic" | "historic" => "tourist_attraction",
        "park" | "nature" | "hiking" => "park",
        "museum" => "museum",
        "shopping" => "shopping_mall",
        _ => "point_of_interest",
    }
}

fn place_to_poi(place: CatalogPlace, origin: Coordinates, category: &str) -> Result<Poi, ProviderError> {
    if !place.location.is_valid() {
        return Err(ProviderError::InvalidResponse(format!(
            "place '{}' has invalid location",
            place.name
        )));
    }
    let rating = place.rating.unwrap_or(0.0);
    let id = match place.place_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => format!(
            "catalog:{}:{:.4}_{:.4}",
            slugify(&place.name),
            place.location.latitude,
            place.location.longitude
        ),
    };
    let distance = origin.distance_miles(&place.location);

    let mut poi = Poi::new(id, place.name, category, place.location, distance, rating)
        .with_price_level(place.price_level.unwrap_or(DEFAULT_PRICE_LEVEL));
    if let Some(vicinity) = place.vicinity.filter(|v| !v.trim().is_empty()) {
        poi = poi.with_description(vicinity.clone()).with_address(vicinity);
    }
    if let Some(url) = place.photo_url {
        poi = poi.with_image_url(url);
    }
    if let Some(review) = place.review_text {
        poi = poi.with_review_summary(review);
    }
    Ok(poi)
}
