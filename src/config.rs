// Configuration module for screen-digest
// Credentials and output path come from the environment (.env / movies_api.env)
// with an optional TOML file underneath

use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "screen-digest";
const CONFIG_FILENAME: &str = "config.toml";

/// Extra dotenv file read on startup alongside `.env`
pub const ENV_FILENAME: &str = "movies_api.env";

/// Errors raised while validating the loaded configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("output directory is not set (OBSIDIAN_VAULT_PATH or [paths] output_dir)")]
    MissingOutputDir,

    #[error("no TMDB credential set (TMDB_READ_ACCESS_TOKEN or TMDB_API_KEY)")]
    MissingTmdbCredential,

    #[error("OMDb API key is not set (OMDB_API_KEY or [credentials] omdb_api_key)")]
    MissingOmdbKey,
}

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Output location
    pub paths: PathsConfig,

    /// API credentials (environment variables take priority)
    pub credentials: CredentialsConfig,

    /// Which listings make it into the catalog
    pub catalog: CatalogConfig,

    /// Report rendering options
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the markdown reports are written to (usually an Obsidian vault)
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// TMDB v4 read access token, sent as a bearer token
    pub tmdb_read_access_token: Option<String>,

    /// TMDB v3 API key, only used when no read access token is set
    pub tmdb_api_key: Option<String>,

    /// OMDb API key
    pub omdb_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TMDB region codes queried for every listing endpoint (default: US, IN)
    pub regions: Vec<String>,

    /// Original-language allow-list (ISO 639-1 codes)
    pub languages: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            regions: vec!["US".to_string(), "IN".to_string()],
            languages: vec![
                "en".to_string(),
                "ko".to_string(),
                "hi".to_string(),
                "ml".to_string(),
                "ta".to_string(),
                "bn".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Tags written to every report's `base_tags` block
    pub base_tags: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_tags: vec![
                "Movies".to_string(),
                "TV".to_string(),
                "OTT".to_string(),
                "Theater".to_string(),
                "WeeklyReview".to_string(),
            ],
        }
    }
}

/// How requests to TMDB are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum TmdbAuth {
    /// `Authorization: Bearer <token>` header
    Bearer(String),
    /// `api_key=<key>` query parameter
    ApiKey(String),
}

impl std::fmt::Debug for TmdbAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TmdbAuth::Bearer(_) => write!(f, "Bearer(***)"),
            TmdbAuth::ApiKey(_) => write!(f, "ApiKey(***)"),
        }
    }
}

/// Validated application configuration - combines TOML file with environment overrides
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory reports are written to
    pub output_dir: PathBuf,

    /// TMDB credential
    pub tmdb_auth: TmdbAuth,

    /// OMDb API key
    pub omdb_api_key: String,

    /// Listing regions
    pub regions: Vec<String>,

    /// Original-language allow-list
    pub languages: Vec<String>,

    /// Fixed frontmatter tags
    pub base_tags: Vec<String>,
}

impl AppConfig {
    /// Load configuration from TOML file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. TOML config file
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = Self::find_config_dir();
        let config_file = Self::load_config_file(&config_dir);
        Self::build(config_file, |key| std::env::var(key).ok())
    }

    /// Find the config directory (for locating config.toml)
    fn find_config_dir() -> PathBuf {
        // Environment variable takes priority
        if let Ok(path) = std::env::var("SCREEN_DIGEST_CONFIG_DIR") {
            return PathBuf::from(path);
        }

        // Then XDG config dir
        if let Some(dir) = dirs::config_dir() {
            return dir.join(APP_NAME);
        }

        // Fallback to current directory
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    /// Load and parse the TOML config file
    fn load_config_file(config_dir: &Path) -> ConfigFile {
        let config_path = config_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            tracing::debug!(
                "No config file found at {}, using environment only",
                config_path.display()
            );
            return ConfigFile::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    ConfigFile::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                ConfigFile::default()
            }
        }
    }

    /// Build and validate configuration; `env` looks up an environment variable
    fn build<F>(config_file: ConfigFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let creds = config_file.credentials;

        // Output dir: env > config
        let output_dir = lookup("OBSIDIAN_VAULT_PATH")
            .map(PathBuf::from)
            .or(config_file.paths.output_dir)
            .ok_or(ConfigError::MissingOutputDir)?;

        // TMDB: bearer token (env > config), then v3 key (env > config)
        let tmdb_auth = lookup("TMDB_READ_ACCESS_TOKEN")
            .or(creds.tmdb_read_access_token)
            .map(TmdbAuth::Bearer)
            .or_else(|| {
                lookup("TMDB_API_KEY")
                    .or(creds.tmdb_api_key)
                    .map(TmdbAuth::ApiKey)
            })
            .ok_or(ConfigError::MissingTmdbCredential)?;

        let omdb_api_key = lookup("OMDB_API_KEY")
            .or(creds.omdb_api_key)
            .ok_or(ConfigError::MissingOmdbKey)?;

        Ok(Self {
            output_dir,
            tmdb_auth,
            omdb_api_key,
            regions: config_file.catalog.regions,
            languages: config_file.catalog.languages,
            base_tags: config_file.report.base_tags,
        })
    }

    /// Log configuration status
    pub fn log_config(&self) {
        tracing::info!("Output directory: {}", self.output_dir.display());

        match self.tmdb_auth {
            TmdbAuth::Bearer(_) => tracing::info!("TMDB auth: read access token"),
            TmdbAuth::ApiKey(_) => {
                tracing::info!("TMDB auth: v3 API key");
                tracing::debug!("Hint: set TMDB_READ_ACCESS_TOKEN to use bearer auth");
            }
        }

        tracing::debug!("Regions: {}", self.regions.join(", "));
        tracing::debug!("Languages: {}", self.languages.join(", "));
    }
}
