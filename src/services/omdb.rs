// OMDb ratings provider
// API Documentation: https://www.omdbapi.com/

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{NOT_AVAILABLE, UNKNOWN};

const OMDB_API_BASE: &str = "https://www.omdbapi.com/";
const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

/// OMDb API client
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

/// Ratings and cast for one title. Missing fields keep their placeholders,
/// which is also what a "Movie not found!" response decodes to.
#[derive(Debug, Clone, Deserialize)]
pub struct Enrichment {
    #[serde(rename = "imdbRating", default = "not_available")]
    pub imdb_rating: String,

    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<SourceRating>,

    /// e.g. "03 Oct 2026"
    #[serde(rename = "Released", default = "not_available")]
    pub released: String,

    #[serde(rename = "Actors", default = "unknown")]
    pub actors: String,

    /// Set when OMDb rejects or cannot answer the lookup
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            imdb_rating: not_available(),
            ratings: Vec::new(),
            released: not_available(),
            actors: unknown(),
            error: None,
        }
    }
}

impl Enrichment {
    /// Rotten Tomatoes score from the ratings list, or "N/A"
    pub fn rotten_tomatoes(&self) -> &str {
        self.ratings
            .iter()
            .find(|rating| rating.source.contains(ROTTEN_TOMATOES))
            .map(|rating| rating.value.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }
}

impl OmdbClient {
    /// Create a new OMDb client
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Look up a title by exact name. Transport and decode failures are fatal to
    /// the run; an OMDb error body decodes to placeholders.
    pub async fn fetch_enrichment(&self, title: &str) -> Result<Enrichment> {
        let url = format!(
            "{}?t={}&apikey={}",
            OMDB_API_BASE,
            urlencoding::encode(title),
            self.api_key
        );

        tracing::info!("Fetching IMDb data for: {}", title);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to query OMDb for '{}'", title))?;

        // Rejections (bad key, request limit) still carry a JSON body
        let status = response.status();

        let enrichment: Enrichment = response
            .json()
            .await
            .with_context(|| format!("Failed to parse OMDb response for '{}'", title))?;

        if let Some(error) = &enrichment.error {
            tracing::warn!("OMDb returned {} for '{}': {}", status, title, error);
        }

        Ok(enrichment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "Title": "Example",
            "Released": "03 Oct 2026",
            "Actors": "Jane Roe, John Doe",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "7.4/10"},
                {"Source": "Rotten Tomatoes", "Value": "91%"},
                {"Source": "Metacritic", "Value": "70/100"}
            ],
            "imdbRating": "7.4",
            "Response": "True"
        }"#;

        let enrichment: Enrichment = serde_json::from_str(body).unwrap();
        assert_eq!(enrichment.imdb_rating, "7.4");
        assert_eq!(enrichment.released, "03 Oct 2026");
        assert_eq!(enrichment.actors, "Jane Roe, John Doe");
        assert_eq!(enrichment.rotten_tomatoes(), "91%");
    }

    #[test]
    fn test_not_found_response_uses_placeholders() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;

        let enrichment: Enrichment = serde_json::from_str(body).unwrap();
        assert_eq!(enrichment.imdb_rating, "N/A");
        assert_eq!(enrichment.released, "N/A");
        assert_eq!(enrichment.actors, "Unknown");
        assert!(enrichment.ratings.is_empty());
        assert_eq!(enrichment.rotten_tomatoes(), "N/A");
        assert_eq!(enrichment.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_rejected_lookup_uses_placeholders() {
        // body OMDb sends with a 401 once the daily quota is used up
        let body = r#"{"Response":"False","Error":"Request limit reached!"}"#;

        let enrichment: Enrichment = serde_json::from_str(body).unwrap();
        assert_eq!(enrichment.imdb_rating, "N/A");
        assert_eq!(enrichment.released, "N/A");
        assert_eq!(enrichment.actors, "Unknown");
        assert_eq!(enrichment.rotten_tomatoes(), "N/A");
        assert_eq!(enrichment.error.as_deref(), Some("Request limit reached!"));
    }

    #[test]
    fn test_rotten_tomatoes_missing() {
        let enrichment = Enrichment {
            ratings: vec![SourceRating {
                source: "Internet Movie Database".to_string(),
                value: "6.1/10".to_string(),
            }],
            ..Enrichment::default()
        };
        assert_eq!(enrichment.rotten_tomatoes(), "N/A");
    }

    // Note: hits the live OMDb API, skipped unless OMDB_API_KEY is set

    #[tokio::test]
    async fn test_omdb_lookup() {
        let Ok(key) = std::env::var("OMDB_API_KEY") else {
            println!("OMDB_API_KEY not set, skipping");
            return;
        };

        let client = OmdbClient::new(key);

        match client.fetch_enrichment("Inception").await {
            Ok(enrichment) => {
                println!(
                    "IMDb {} / RT {} / {}",
                    enrichment.imdb_rating,
                    enrichment.rotten_tomatoes(),
                    enrichment.released
                );
                assert_ne!(enrichment.released, "");
            }
            Err(e) => {
                println!("Lookup failed (network or quota): {}", e);
            }
        }
    }
}
