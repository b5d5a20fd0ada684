// TMDB listing provider
// API Documentation: https://developer.themoviedb.org/reference/intro/getting-started

use chrono::{Duration, NaiveDate};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::TmdbAuth;
use crate::models::{ContentType, GenreMap, UNKNOWN};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const TMDB_LANGUAGE: &str = "en-US";

/// Listings are limited to releases in the last four weeks
pub const RELEASE_WINDOW_DAYS: i64 = 28;

/// Number of billed cast members kept from the credits endpoint
const CAST_LIMIT: usize = 5;

/// Failure of a single TMDB request
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// TMDB API client
pub struct TmdbClient {
    client: Client,
    auth: TmdbAuth,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// One page of a discover/upcoming/airing_today listing
#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    results: Vec<ListingItem>,
}

/// Listing entry; movies carry `title`, shows carry `name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingItem {
    pub id: i64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<Vec<Genre>>,
    pub genre_ids: Option<Vec<i64>>,
}

impl ListingItem {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(UNKNOWN)
    }
}

/// Credits response, only the cast is used
#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
}

impl TmdbClient {
    /// Create a new TMDB client
    pub fn new(auth: TmdbAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
        }
    }

    /// GET `{TMDB_API_BASE}/{path}` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}/{}", TMDB_API_BASE, path);
        tracing::debug!("TMDB request: {} {:?}", url, params);

        let request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(params);

        let request = match &self.auth {
            TmdbAuth::Bearer(token) => request.bearer_auth(token),
            TmdbAuth::ApiKey(key) => request.query(&[("api_key", key)]),
        };

        let response = request.send().await.map_err(|source| TmdbError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| TmdbError::Transport {
            endpoint: path.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| TmdbError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    /// Fetch the genre id -> name table for one content type
    pub async fn fetch_genre_map(&self, content_type: ContentType) -> Result<GenreMap, TmdbError> {
        let path = format!("genre/{}/list", content_type.as_str());
        let params = [("language".to_string(), TMDB_LANGUAGE.to_string())];

        let list: GenreList = self.get_json(&path, &params).await?;

        Ok(list
            .genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect())
    }

    /// Fetch the first page of a listing endpoint, limited to the release window
    pub async fn fetch_listing(
        &self,
        endpoint: &str,
        region: &str,
        content_type: ContentType,
        today: NaiveDate,
    ) -> Result<Vec<ListingItem>, TmdbError> {
        let params = listing_query(content_type, region, today);
        let page: ListingPage = self.get_json(endpoint, &params).await?;
        Ok(page.results)
    }

    /// Top billed cast for an item, joined with ", " ("Unknown" when the list is empty)
    pub async fn fetch_cast(&self, id: i64, content_type: ContentType) -> Result<String, TmdbError> {
        let path = format!("{}/{}/credits", content_type.as_str(), id);
        let credits: Credits = self.get_json(&path, &[]).await?;
        Ok(join_cast(&credits.cast))
    }
}

/// First and last day of the listing window (inclusive)
pub fn release_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(RELEASE_WINDOW_DAYS), today)
}

/// Query parameters for a listing request
pub fn listing_query(
    content_type: ContentType,
    region: &str,
    today: NaiveDate,
) -> Vec<(String, String)> {
    let (from, to) = release_window(today);
    let date_param = content_type.date_param();

    vec![
        ("language".to_string(), TMDB_LANGUAGE.to_string()),
        ("region".to_string(), region.to_string()),
        (
            format!("{}.gte", date_param),
            from.format("%Y-%m-%d").to_string(),
        ),
        (
            format!("{}.lte", date_param),
            to.format("%Y-%m-%d").to_string(),
        ),
    ]
}

fn join_cast(cast: &[CastMember]) -> String {
    if cast.is_empty() {
        return UNKNOWN.to_string();
    }

    cast.iter()
        .take(CAST_LIMIT)
        .map(|member| member.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_release_window_spans_four_weeks() {
        let (from, to) = release_window(date(2026, 3, 10));
        assert_eq!(from, date(2026, 2, 10));
        assert_eq!(to, date(2026, 3, 10));
    }

    #[test]
    fn test_listing_query_movie() {
        let params = listing_query(ContentType::Movie, "IN", date(2026, 1, 15));
        assert_eq!(
            params,
            vec![
                ("language".to_string(), "en-US".to_string()),
                ("region".to_string(), "IN".to_string()),
                (
                    "primary_release_date.gte".to_string(),
                    "2025-12-18".to_string()
                ),
                (
                    "primary_release_date.lte".to_string(),
                    "2026-01-15".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_listing_query_tv_uses_air_date() {
        let params = listing_query(ContentType::Tv, "US", date(2026, 1, 15));
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"first_air_date.gte"));
        assert!(keys.contains(&"first_air_date.lte"));
        assert!(!keys.iter().any(|k| k.starts_with("primary_release_date")));
    }

    #[test]
    fn test_parse_listing_page() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 1, "title": "Film", "original_language": "hi", "overview": "A film.", "genre_ids": [18, 35]},
                {"id": 2, "name": "Show", "original_language": "ko", "genre_ids": []}
            ],
            "total_pages": 1
        }"#;

        let page: ListingPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].display_title(), "Film");
        assert_eq!(page.results[0].genre_ids, Some(vec![18, 35]));
        assert_eq!(page.results[1].display_title(), "Show");
        assert!(page.results[1].overview.is_none());
    }

    #[test]
    fn test_display_title_fallback() {
        let item = ListingItem::default();
        assert_eq!(item.display_title(), "Unknown");
    }

    #[test]
    fn test_join_cast_limits_to_five() {
        let cast: Vec<CastMember> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|name| CastMember {
                name: name.to_string(),
            })
            .collect();

        assert_eq!(join_cast(&cast), "A, B, C, D, E");
        assert_eq!(join_cast(&[]), "Unknown");
    }

    #[test]
    fn test_parse_genre_list() {
        let body = r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]}"#;
        let list: GenreList = serde_json::from_str(body).unwrap();
        let map: GenreMap = list.genres.into_iter().map(|g| (g.id, g.name)).collect();
        assert_eq!(map.get(&28).map(String::as_str), Some("Action"));
        assert_eq!(map.len(), 2);
    }
}
