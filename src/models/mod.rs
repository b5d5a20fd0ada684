use chrono::NaiveDate;
use std::collections::HashMap;

/// Placeholder used for missing genres, cast and languages
pub const UNKNOWN: &str = "Unknown";

/// Placeholder used for missing ratings and release dates
pub const NOT_AVAILABLE: &str = "N/A";

/// Genre id -> name, scoped to one content type
pub type GenreMap = HashMap<i64, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    /// Path segment used by TMDB (`movie` / `tv`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }

    /// Listing endpoints queried per region, in fetch order
    pub fn listing_endpoints(&self) -> [&'static str; 2] {
        match self {
            ContentType::Movie => ["discover/movie", "movie/upcoming"],
            ContentType::Tv => ["discover/tv", "tv/airing_today"],
        }
    }

    /// Query parameter prefix for the release window
    pub fn date_param(&self) -> &'static str {
        match self {
            ContentType::Movie => "primary_release_date",
            ContentType::Tv => "first_air_date",
        }
    }

    pub fn report_title(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie Updates",
            ContentType::Tv => "TV Show Updates",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie_updates",
            ContentType::Tv => "tv_updates",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One movie or show as it appears in a report
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub title: String,
    /// Release date as OMDb formats it ("14 Oct 2026") or "N/A"
    pub release_date: String,
    pub release_date_obj: Option<NaiveDate>,
    pub imdb_rating: String,
    pub rt_rating: String,
    pub genres: String,
    pub cast: String,
    /// Full language name, or the raw code when there is no mapping
    pub language: String,
    pub summary: String,
}

impl CatalogItem {
    /// Numeric IMDb rating; anything unparsable counts as 0
    pub fn rating_value(&self) -> f64 {
        self.imdb_rating.trim().parse::<f64>().unwrap_or(0.0)
    }
}

/// Full language name for an ISO 639-1 code, or the code itself when unmapped
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "ko" => "Korean",
        "hi" => "Hindi",
        "ml" => "Malayalam",
        "ta" => "Tamil",
        "bn" => "Bengali",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("ko"), "Korean");
        assert_eq!(language_name("bn"), "Bengali");
        assert_eq!(language_name("xx"), "xx");
    }

    #[test]
    fn test_content_type_endpoints() {
        assert_eq!(
            ContentType::Movie.listing_endpoints(),
            ["discover/movie", "movie/upcoming"]
        );
        assert_eq!(ContentType::Tv.listing_endpoints()[1], "tv/airing_today");
        assert_eq!(ContentType::Tv.date_param(), "first_air_date");
        assert_eq!(ContentType::Tv.file_stem(), "tv_updates");
    }
}
