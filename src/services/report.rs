// Obsidian report rendering
// YAML frontmatter with tag sets, then items bucketed by recency and grouped by language

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::models::{CatalogItem, ContentType, UNKNOWN};

/// Releases at least this many days old count as "running"
const JUST_RELEASED_DAYS: i64 = 7;

/// Recency category an item is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    ReleasedAndRunning,
    JustReleased,
    ComingSoon,
}

impl Bucket {
    /// Render order
    pub const ALL: [Bucket; 3] = [
        Bucket::ReleasedAndRunning,
        Bucket::JustReleased,
        Bucket::ComingSoon,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Bucket::ReleasedAndRunning => "🎬 Released and Running",
            Bucket::JustReleased => "🔥 Just Released",
            Bucket::ComingSoon => "🎥 Coming Soon",
        }
    }

    /// Undated items are always "coming soon"
    pub fn classify(release: Option<NaiveDate>, today: NaiveDate) -> Bucket {
        let week_ago = today - Duration::days(JUST_RELEASED_DAYS);
        match release {
            Some(date) if date <= week_ago => Bucket::ReleasedAndRunning,
            Some(date) if date <= today => Bucket::JustReleased,
            _ => Bucket::ComingSoon,
        }
    }
}

/// Tag sets collected for the frontmatter, kept sorted
#[derive(Debug, Default)]
pub struct HeaderTags {
    pub genres: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub cast: BTreeSet<String>,
}

impl HeaderTags {
    pub fn from_items(items: &[CatalogItem]) -> Self {
        let mut tags = Self::default();

        for item in items {
            tags.genres.extend(split_tags(&item.genres));
            tags.cast.extend(split_tags(&item.cast));
            if item.language != UNKNOWN {
                tags.languages.insert(item.language.clone());
            }
        }

        tags
    }
}

/// Comma-separated list -> trimmed tokens, skipping blanks and "Unknown"
fn split_tags(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != UNKNOWN)
        .map(str::to_string)
}

/// Highest IMDb rating first, then title A-Z
pub fn compare_items(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.rating_value()
        .total_cmp(&a.rating_value())
        .then_with(|| a.title.cmp(&b.title))
}

/// Render the full markdown document
pub fn render(items: &[CatalogItem], title: &str, base_tags: &[String], today: NaiveDate) -> String {
    let heading = format!("{} - {}", title, today.format("%Y-%m-%d"));
    let tags = HeaderTags::from_items(items);

    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", heading));
    push_tag_block(&mut content, "base_tags", base_tags.iter());
    push_tag_block(&mut content, "genres", tags.genres.iter());
    push_tag_block(&mut content, "languages", tags.languages.iter());
    push_tag_block(&mut content, "cast", tags.cast.iter());
    content.push_str("---\n\n");

    content.push_str(&format!("# {}\n\n", heading));

    let mut sorted: Vec<&CatalogItem> = items.iter().collect();
    sorted.sort_by(|a, b| compare_items(a, b));

    for bucket in Bucket::ALL {
        let bucket_items: Vec<&CatalogItem> = sorted
            .iter()
            .copied()
            .filter(|item| Bucket::classify(item.release_date_obj, today) == bucket)
            .collect();

        if bucket_items.is_empty() {
            continue;
        }

        content.push_str(&format!("## {}\n\n", bucket.heading()));

        let mut by_language: BTreeMap<&str, Vec<&CatalogItem>> = BTreeMap::new();
        for item in bucket_items {
            by_language
                .entry(item.language.as_str())
                .or_default()
                .push(item);
        }

        for (language, mut group) in by_language {
            content.push_str(&format!("### Language: {}\n\n", language));
            group.sort_by(|a, b| compare_items(a, b));
            for item in group {
                push_item(&mut content, item);
            }
        }
    }

    content.push_str("---\n\n");
    content
}

fn push_tag_block<'a>(content: &mut String, name: &str, tags: impl Iterator<Item = &'a String>) {
    content.push_str(&format!("{}:\n", name));
    for tag in tags {
        content.push_str(&format!("  - \"{}\"\n", tag));
    }
}

fn push_item(content: &mut String, item: &CatalogItem) {
    content.push_str(&format!(
        "**[[{}]]** (IMDb: {})  \n",
        item.title, item.imdb_rating
    ));
    content.push_str(&format!("*Release Date:* {}  \n", item.release_date));
    content.push_str(&format!("*Rotten Tomatoes:* {}  \n", item.rt_rating));
    content.push_str(&format!("*Genres:* {}  \n", item.genres));
    content.push_str(&format!("*Cast:* {}  \n", item.cast));
    content.push_str(&format!("> {}\n\n", item.summary));
}

/// `{output_dir}/{stem}_{DD-Mon-YYYY}.md`
pub fn report_path(output_dir: &Path, stem: &str, today: NaiveDate) -> PathBuf {
    output_dir.join(format!("{}_{}.md", stem, today.format("%d-%b-%Y")))
}

/// Write the report, replacing any file from an earlier run on the same day
pub async fn write_report(
    output_dir: &Path,
    stem: &str,
    content: &str,
    today: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = report_path(output_dir, stem, today);
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Obsidian entry created: {}", path.display());
    Ok(path)
}

/// Render and write one report per collected catalog, in order
pub async fn write_reports(
    output_dir: &Path,
    catalogs: &[(ContentType, Vec<CatalogItem>)],
    base_tags: &[String],
    today: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(catalogs.len());

    for (content_type, items) in catalogs {
        let content = render(items, content_type.report_title(), base_tags, today);
        paths.push(write_report(output_dir, content_type.file_stem(), &content, today).await?);
    }

    Ok(paths)
}
