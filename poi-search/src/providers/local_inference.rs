//! Local inference adapter: on-device model with the lowest latency.
//!
//! The model itself sits behind [`InferenceBackend`]. This adapter owns the
//! prompt format and turns the generated text back into POIs. The backend
//! is expected to answer in sections separated by `---`:
//!
//! ```text
//! NAME: Lost Lake Trail #16
//! DESCRIPTION: Loop trail around the lake with Mount Hood views
//! RATING: 4.7
//! DISTANCE: 0.5
//! CATEGORY: hiking
//! WHY: Easy family hike with the classic reflection shot
//! ---
//! ```
//!
//! `LAT:` / `LON:` lines are optional. Sections without a `NAME:` are
//! skipped.

use std::collections::HashSet;
use std::future::Future;

use crate::error::ProviderError;
use crate::provider::{PoiProvider, QueryContext};
use crate::types::{Coordinates, Poi, ProviderOutput, ProviderQuery, MAX_RATING};

use super::{slugify, validate_pois};

const DEFAULT_RATING: f64 = 4.0;
const DEFAULT_DISTANCE_MILES: f64 = 2.0;
const DEFAULT_CATEGORY: &str = "attraction";
const SECTION_SEPARATOR: &str = "---";

/// Prompt handed to the inference backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferencePrompt {
    pub text: String,
    pub max_tokens: u32,
}

/// Raw backend answer.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutput {
    pub text: String,
    /// Model self-confidence in `[0, 1]`.
    pub confidence: f64,
}

/// The on-device model. Loading, tokenisation and decoding are the
/// implementor's concern.
pub trait InferenceBackend: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Unavailable`] when the model cannot be loaded;
    /// other kinds as appropriate.
    fn generate(
        &self,
        prompt: &InferencePrompt,
    ) -> impl Future<Output = Result<InferenceOutput, ProviderError>> + Send;
}

/// [`PoiProvider`] over an [`InferenceBackend`].
#[derive(Debug)]
pub struct LocalInferenceProvider<B> {
    backend: B,
    max_tokens: u32,
}

impl<B: InferenceBackend> LocalInferenceProvider<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_tokens: 500,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: InferenceBackend> PoiProvider for LocalInferenceProvider<B> {
    async fn query(
        &self,
        query: &ProviderQuery,
        ctx: &QueryContext,
    ) -> Result<ProviderOutput, ProviderError> {
        let prompt = InferencePrompt {
            text: build_prompt(query),
            max_tokens: self.max_tokens,
        };
        tracing::trace!(location = %query.location_name, "local inference prompt built");

        let output = ctx.guard(self.backend.generate(&prompt)).await?;

        if !(0.0..=1.0).contains(&output.confidence) {
            return Err(ProviderError::InvalidResponse(format!(
                "confidence {} outside [0, 1]",
                output.confidence
            )));
        }

        let mut pois = parse_response(&output.text, query)?;
        pois.truncate(query.limit);
        validate_pois(&pois)?;

        tracing::debug!(count = pois.len(), confidence = output.confidence, "local inference parsed");
        Ok(ProviderOutput::new(pois).with_confidence(output.confidence))
    }

    fn name(&self) -> &str {
        "local-inference"
    }
}

/// Build the discovery prompt for `query`.
pub fn build_prompt(query: &ProviderQuery) -> String {
    let category = query.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
    format!(
        "Discover {limit} real points of interest near {location} ({origin}) in the {category} category.\n\
         \n\
         For each POI, provide:\n\
         NAME: [exact name]\n\
         DESCRIPTION: [brief description]\n\
         RATING: [1-5 stars]\n\
         DISTANCE: [distance from {location} in miles]\n\
         CATEGORY: [category]\n\
         WHY: [reason to visit]\n\
         ---\n\
         \n\
         Only name places that actually exist. Do not invent generic or sample names.",
        limit = query.limit,
        location = query.location_name,
        origin = query.origin,
    )
}

#[derive(Debug, Default)]
struct Section {
    name: Option<String>,
    description: Option<String>,
    rating: Option<f64>,
    distance: Option<f64>,
    category: Option<String>,
    why: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Parse generated text into POIs.
///
/// # Errors
///
/// [`ProviderError::InvalidResponse`] if the text is not blank but contains
/// no section with a name.
pub fn parse_response(text: &str, query: &ProviderQuery) -> Result<Vec<Poi>, ProviderError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut pois = Vec::new();
    let mut used_ids = HashSet::new();
    for raw in text.split(SECTION_SEPARATOR) {
        let section = parse_section(raw);
        let Some(name) = section.name.clone() else {
            continue;
        };
        let id = unique_id(&name, &mut used_ids);
        pois.push(section_to_poi(id, name, section, query));
    }

    if pois.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "model output contained no POI sections".into(),
        ));
    }
    Ok(pois)
}

fn parse_section(raw: &str) -> Section {
    let mut section = Section::default();
    for line in raw.lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim().to_ascii_uppercase().as_str() {
            "NAME" => section.name = Some(value.to_owned()),
            "DESCRIPTION" => section.description = Some(value.to_owned()),
            "RATING" => section.rating = leading_number(value),
            "DISTANCE" => section.distance = leading_number(value),
            "CATEGORY" => section.category = Some(value.to_owned()),
            "WHY" => section.why = Some(value.to_owned()),
            "LAT" => section.lat = leading_number(value),
            "LON" | "LNG" => section.lon = leading_number(value),
            _ => {}
        }
    }
    section
}

fn section_to_poi(id: String, name: String, section: Section, query: &ProviderQuery) -> Poi {
    let coordinates = match (section.lat, section.lon) {
        (Some(lat), Some(lon)) if Coordinates::new(lat, lon).is_valid() => Coordinates::new(lat, lon),
        _ => query.origin,
    };
    let distance = section
        .distance
        .filter(|d| d.is_finite())
        .map(|d| d.max(0.0))
        .unwrap_or_else(|| {
            if coordinates == query.origin {
                DEFAULT_DISTANCE_MILES
            } else {
                query.origin.distance_miles(&coordinates)
            }
        });
    let rating = section
        .rating
        .filter(|r| r.is_finite())
        .unwrap_or(DEFAULT_RATING)
        .clamp(0.0, MAX_RATING);
    let category = section
        .category
        .or_else(|| query.category.clone())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

    let mut poi = Poi::new(id, name, &category, coordinates, distance, rating);
    if let Some(description) = section.description {
        poi = poi.with_description(description);
    }
    if let Some(why) = section.why {
        poi = poi.with_review_summary(why);
    }
    poi
}

/// Parse the number at the start of `value`, e.g. `"4.5 stars"` or `"2.3mi"`.
fn leading_number(value: &str) -> Option<f64> {
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok()
}

fn unique_id(name: &str, used: &mut HashSet<String>) -> String {
    let slug = slugify(name);
    let base = if slug.is_empty() {
        "local:poi".to_owned()
    } else {
        format!("local:{slug}")
    };
    let mut id = base.clone();
    let mut n = 2;
    while !used.insert(id.clone()) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}
