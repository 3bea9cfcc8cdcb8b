//! Place Search Provider Client
//!
//! Thin client for the external place-search provider (Google Places API,
//! New). Responses are passed through as JSON; provider failures surface as
//! opaque internal errors so the key and upstream details never leak to
//! clients.

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::utils::error::AppError;

const SEARCH_TEXT_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const SEARCH_NEARBY_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";
const LOOKUP_URL: &str = "https://places.googleapis.com/v1/places:lookup";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,\
places.types,places.id,places.rating,places.nationalPhoneNumber,places.websiteUri,\
places.regularOpeningHours,places.photos";

const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,location,types,rating,\
nationalPhoneNumber,websiteUri,regularOpeningHours,photos";

/// Provider client errors
#[derive(Error, Debug)]
pub enum PlaceSearchError {
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Place not found")]
    NotFound,

    #[error("Unexpected provider response")]
    UnexpectedResponse,
}

impl From<PlaceSearchError> for AppError {
    fn from(err: PlaceSearchError) -> Self {
        match err {
            PlaceSearchError::NotFound => AppError::NotFound("Place not found".to_string()),
            PlaceSearchError::Request(e) => {
                log::warn!("Place search provider request failed: {}", e);
                AppError::Internal("Place search provider unavailable".to_string())
            }
            PlaceSearchError::UnexpectedResponse => {
                AppError::Internal("Place search provider unavailable".to_string())
            }
        }
    }
}

pub type PlaceSearchResult<T> = Result<T, PlaceSearchError>;

/// Client for the external place-search provider
#[derive(Clone)]
pub struct PlaceSearchService {
    client: Client,
    api_key: String,
}

impl PlaceSearchService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn post_places(&self, url: &str, field_mask: &str, body: Value) -> PlaceSearchResult<Value> {
        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", field_mask)
            .json(&body)
            .send()
            .await?;

        Ok(response.json::<Value>().await?)
    }

    /// Free-text search. When the text search only yields streets or
    /// localities, the query is geocoded and a nearby search around the
    /// resulting coordinates is tried instead.
    pub async fn search_text(
        &self,
        query: &str,
        radius: u32,
        place_type: Option<&str>,
    ) -> PlaceSearchResult<Value> {
        let body = json!({
            "textQuery": query,
            "languageCode": "es",
            "maxResultCount": 20,
        });
        let data = self.post_places(SEARCH_TEXT_URL, FIELD_MASK, body).await?;

        let filtered: Vec<Value> = data["places"]
            .as_array()
            .map(|places| {
                places
                    .iter()
                    .filter(|p| {
                        p["types"].as_array().is_some_and(|types| {
                            types.iter().any(|t| {
                                !matches!(t.as_str(), Some("route" | "locality" | "political"))
                            })
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !filtered.is_empty() {
            return Ok(json!({ "results": filtered }));
        }

        // No concrete places matched the text; fall back to geocoding the
        // query and searching around the coordinates.
        let geo = self
            .client
            .get(GEOCODE_URL)
            .query(&[
                ("address", query),
                ("key", &self.api_key),
                ("language", "es"),
            ])
            .send()
            .await?
            .json::<Value>()
            .await?;

        let location = &geo["results"][0]["geometry"]["location"];
        match (location["lat"].as_f64(), location["lng"].as_f64()) {
            (Some(lat), Some(lng)) => self.search_nearby(lat, lng, radius, place_type).await,
            _ => Ok(json!({ "results": [] })),
        }
    }

    /// Search for places around a coordinate
    pub async fn search_nearby(
        &self,
        lat: f64,
        lng: f64,
        radius: u32,
        place_type: Option<&str>,
    ) -> PlaceSearchResult<Value> {
        let mut body = json!({
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": lat, "longitude": lng },
                    "radius": radius,
                }
            },
            "languageCode": "es",
            "maxResultCount": 20,
        });
        if let Some(t) = place_type {
            body["includedTypes"] = json!([t]);
        }

        let data = self.post_places(SEARCH_NEARBY_URL, FIELD_MASK, body).await?;
        Ok(json!({ "results": data["places"].as_array().cloned().unwrap_or_default() }))
    }

    /// Fetch full details for one provider place id
    pub async fn details(&self, place_id: &str) -> PlaceSearchResult<Value> {
        let response = self
            .client
            .post(LOOKUP_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .json(&json!({ "placeId": place_id, "languageCode": "es" }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PlaceSearchError::NotFound);
        }

        let data = response.json::<Value>().await?;
        match data.get("place") {
            Some(place) => Ok(json!({ "result": place })),
            None => Err(PlaceSearchError::UnexpectedResponse),
        }
    }

    /// Build the embeddable map URL for a coordinate, optionally centered on
    /// a named query
    pub fn embed_url(&self, lat: f64, lng: f64, query: Option<&str>) -> String {
        let center = format!("{},{}", lat, lng);
        let q = query.unwrap_or(&center);

        let mut url = Url::parse("https://www.google.com/maps/embed/v1/place")
            .expect("static base URL is valid");
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", q)
            .append_pair("center", &center)
            .append_pair("zoom", "16");
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url_with_query() {
        let service = PlaceSearchService::new("key123".to_string());
        let url = service.embed_url(40.4168, -3.7038, Some("Plaza Mayor"));
        assert!(url.contains("key=key123"));
        assert!(url.contains("q=Plaza+Mayor"));
        assert!(url.contains("center=40.4168%2C-3.7038"));
        assert!(url.contains("zoom=16"));
    }

    #[test]
    fn test_embed_url_without_query_centers_on_coordinates() {
        let service = PlaceSearchService::new("key123".to_string());
        let url = service.embed_url(40.0, -3.0, None);
        assert!(url.contains("q=40%2C-3"));
    }

    #[test]
    fn test_provider_not_found_maps_to_not_found() {
        let err: AppError = PlaceSearchError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unexpected_response_stays_opaque() {
        let err: AppError = PlaceSearchError::UnexpectedResponse.into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
