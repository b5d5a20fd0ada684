use anyhow::Result;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use super::omdb::{Enrichment, OmdbClient};
use super::tmdb::{ListingItem, TmdbClient, RELEASE_WINDOW_DAYS};
use crate::config::AppConfig;
use crate::models::{language_name, CatalogItem, ContentType, GenreMap, UNKNOWN};

const NO_SUMMARY: &str = "No summary available";

/// Date format OMDb uses for `Released`
const OMDB_DATE_FORMAT: &str = "%d %b %Y";

/// Builds the per-content-type catalog from TMDB listings and OMDb ratings
pub struct CatalogService {
    tmdb: TmdbClient,
    omdb: OmdbClient,
    regions: Vec<String>,
    languages: Vec<String>,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            tmdb: TmdbClient::new(config.tmdb_auth.clone()),
            omdb: OmdbClient::new(config.omdb_api_key.clone()),
            regions: config.regions.clone(),
            languages: config.languages.clone(),
        }
    }

    /// Fetch, enrich and filter every listing for `content_type`.
    ///
    /// `seen` holds titles already taken; the updated set is handed back.
    /// TMDB failures degrade to empty results, OMDb failures abort.
    pub async fn collect(
        &self,
        content_type: ContentType,
        today: NaiveDate,
        seen: HashSet<String>,
    ) -> Result<(Vec<CatalogItem>, HashSet<String>)> {
        let genre_map = match self.tmdb.fetch_genre_map(content_type).await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("Error fetching genre mapping for {}: {}", content_type, e);
                GenreMap::new()
            }
        };

        let mut listings = Vec::new();
        for region in &self.regions {
            for endpoint in content_type.listing_endpoints() {
                match self
                    .tmdb
                    .fetch_listing(endpoint, region, content_type, today)
                    .await
                {
                    Ok(results) => {
                        tracing::debug!("{} ({}): {} results", endpoint, region, results.len());
                        listings.extend(results);
                    }
                    Err(e) => {
                        tracing::warn!("Error fetching data from TMDB for {}: {}", region, e);
                    }
                }
            }
        }

        let (candidates, seen) = select_candidates(listings, &self.languages, seen);

        let mut items = Vec::with_capacity(candidates.len());
        for listing in candidates {
            let title = listing.display_title();
            let enrichment = self.omdb.fetch_enrichment(title).await?;

            let credits_cast = match self.tmdb.fetch_cast(listing.id, content_type).await {
                Ok(cast) => cast,
                Err(e) => {
                    tracing::debug!("No TMDB cast for '{}': {}", title, e);
                    UNKNOWN.to_string()
                }
            };

            match build_item(&listing, &enrichment, &credits_cast, &genre_map, today) {
                Some(item) => items.push(item),
                None => tracing::debug!(
                    "Skipping '{}': released {} (older than four weeks)",
                    title,
                    enrichment.released
                ),
            }
        }

        tracing::info!("Total {}s fetched: {}", content_type, items.len());
        Ok((items, seen))
    }
}

/// Drop listings outside the language allow-list and titles already seen.
/// A title is marked seen as soon as it is accepted here, so a later duplicate
/// stays out even if the first copy is dropped after enrichment.
pub fn select_candidates(
    listings: Vec<ListingItem>,
    languages: &[String],
    mut seen: HashSet<String>,
) -> (Vec<ListingItem>, HashSet<String>) {
    let mut candidates = Vec::new();

    for listing in listings {
        let allowed = listing
            .original_language
            .as_deref()
            .is_some_and(|code| languages.iter().any(|lang| lang == code));
        if !allowed {
            continue;
        }

        if !seen.insert(listing.display_title().to_string()) {
            continue;
        }

        candidates.push(listing);
    }

    (candidates, seen)
}

/// Assemble the catalog record, or `None` when the release date is stale
pub fn build_item(
    listing: &ListingItem,
    enrichment: &Enrichment,
    credits_cast: &str,
    genre_map: &GenreMap,
    today: NaiveDate,
) -> Option<CatalogItem> {
    let release_date_obj = parse_release_date(&enrichment.released);
    if release_date_obj.is_some_and(|date| is_stale(date, today)) {
        return None;
    }

    let language = listing
        .original_language
        .as_deref()
        .map(language_name)
        .unwrap_or(UNKNOWN);

    Some(CatalogItem {
        title: listing.display_title().to_string(),
        release_date: enrichment.released.clone(),
        release_date_obj,
        imdb_rating: enrichment.imdb_rating.clone(),
        rt_rating: enrichment.rotten_tomatoes().to_string(),
        genres: resolve_genres(listing, genre_map),
        cast: resolve_cast(credits_cast, &enrichment.actors),
        language: language.to_string(),
        summary: listing
            .overview
            .clone()
            .unwrap_or_else(|| NO_SUMMARY.to_string()),
    })
}

/// Embedded genre objects win over genre ids; unmapped ids become "Unknown"
pub fn resolve_genres(listing: &ListingItem, genre_map: &GenreMap) -> String {
    if let Some(genres) = listing.genres.as_ref().filter(|g| !g.is_empty()) {
        return genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
    }

    if let Some(ids) = listing.genre_ids.as_ref().filter(|ids| !ids.is_empty()) {
        return ids
            .iter()
            .map(|id| genre_map.get(id).map(String::as_str).unwrap_or(UNKNOWN))
            .collect::<Vec<_>>()
            .join(", ");
    }

    UNKNOWN.to_string()
}

/// TMDB credits take precedence; OMDb's actor list is the fallback
pub fn resolve_cast(credits_cast: &str, omdb_actors: &str) -> String {
    if credits_cast != UNKNOWN {
        credits_cast.to_string()
    } else {
        omdb_actors.to_string()
    }
}

/// "03 Oct 2026" -> date; "N/A" and anything malformed -> None
pub fn parse_release_date(released: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(released.trim(), OMDB_DATE_FORMAT).ok()
}

/// The cutoff is four weeks before the current time, so day 28 is already past it
fn is_stale(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today - Duration::days(RELEASE_WINDOW_DAYS)
}
