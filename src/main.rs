use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod models;
mod services;

use config::AppConfig;
use models::ContentType;
use services::catalog::CatalogService;
use services::report;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screen_digest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load credentials; variables already set in the environment win
    dotenvy::from_filename(config::ENV_FILENAME).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.log_config();

    let catalog = CatalogService::new(&config);
    let today = Local::now().date_naive();

    // Both catalogs are fetched before any report is written
    let mut catalogs = Vec::new();
    for content_type in [ContentType::Movie, ContentType::Tv] {
        // Titles are unique per content type, not across the whole run
        let (items, _seen) = catalog.collect(content_type, today, HashSet::new()).await?;
        catalogs.push((content_type, items));
    }

    report::write_reports(&config.output_dir, &catalogs, &config.base_tags, today).await?;

    Ok(())
}
