use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A forum post that survived chunking.
///
/// Provenance fields are carried through from the scrape output unmodified;
/// ranking only ever looks at `content`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscourseChunk {
    pub content: String,
    pub title: String,
    /// Topic page: `{base}/t/{slug}/{topic_id}`.
    pub url: String,
    /// Post-specific locator: `{url}/{post_number}`.
    pub full_url: String,
    pub topic_id: u64,
    pub post_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_post_number: Option<u64>,
    pub hash: String,
}

/// A markdown course-page section that survived chunking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseChunk {
    pub content: String,
    /// Heading text; empty for the pre-heading prefix section.
    pub title: String,
    pub url: String,
    /// Source markdown file name, for traceability.
    pub file: String,
    pub hash: String,
}

/// A unit of retrievable text, the atom of the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source")]
pub enum Chunk {
    #[serde(rename = "discourse")]
    Discourse(DiscourseChunk),
    #[serde(rename = "course_content")]
    Course(CourseChunk),
}

impl Chunk {
    pub fn content(&self) -> &str {
        match self {
            Chunk::Discourse(c) => &c.content,
            Chunk::Course(c) => &c.content,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Chunk::Discourse(c) => &c.title,
            Chunk::Course(c) => &c.title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Chunk::Discourse(c) => &c.url,
            Chunk::Course(c) => &c.url,
        }
    }

    /// The most specific locator available: the post-level URL for
    /// discourse chunks, the page URL otherwise.
    pub fn best_url(&self) -> &str {
        match self {
            Chunk::Discourse(c) => &c.full_url,
            Chunk::Course(c) => &c.url,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Chunk::Discourse(_) => "discourse",
            Chunk::Course(_) => "course_content",
        }
    }
}

/// A ranked hit: produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

impl SearchResult {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_chunks: usize,
    pub discourse_chunks: usize,
    pub course_chunks: usize,
    pub model: String,
    pub dimensions: usize,
    pub index_size_bytes: u64,
}
