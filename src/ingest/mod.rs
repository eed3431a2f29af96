//! Loaders for already-fetched raw documents.
//!
//! Scraping and authentication happen elsewhere; this module only reads
//! the scrape output (a discourse topics JSON file) and a folder of
//! markdown course pages from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use walkdir::WalkDir;

/// A scraped discourse topic with its nested post stream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTopic {
    pub topic_id: u64,
    pub topic_slug: String,
    #[serde(default)]
    pub topic_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub post_stream: PostStream,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostStream {
    #[serde(default)]
    pub posts: Vec<RawPost>,
}

/// A single post as the scraper saved it. `cooked` is rendered HTML,
/// `raw` the original markup; either may be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    #[serde(default = "default_post_number")]
    pub post_number: u64,
    #[serde(default)]
    pub cooked: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reply_to_post_number: Option<u64>,
}

fn default_post_number() -> u64 {
    1
}

/// A markdown course page read from disk.
#[derive(Debug, Clone)]
pub struct CourseDocument {
    pub file_name: String,
    pub content: String,
}

/// Read the scraped discourse topics file.
pub fn load_discourse_topics(path: &Path) -> Result<Vec<RawTopic>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read discourse data at {}", path.display()))?;
    let topics: Vec<RawTopic> = serde_json::from_str(&content)
        .with_context(|| format!("invalid discourse data at {}", path.display()))?;
    Ok(topics)
}

/// Read every `.md` file under a folder, sorted by file name so the
/// resulting chunk order is stable across runs.
pub fn load_course_documents(dir: &Path) -> Result<Vec<CourseDocument>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read course page {}", path.display()))?;

        documents.push(CourseDocument { file_name, content });
    }

    Ok(documents)
}
