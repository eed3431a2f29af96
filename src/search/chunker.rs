use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::config::CorpusConfig;
use crate::ingest::{CourseDocument, RawTopic};

use super::store::{Chunk, CourseChunk, DiscourseChunk};

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Discourse posts shorter than this (after markup stripping) carry no
/// retrievable signal and are dropped before indexing.
const MIN_POST_CHARS: usize = 50;
/// Course sections need more room to be useful, since the heading line
/// itself is part of the section.
const MIN_SECTION_CHARS: usize = 100;

/// Splits raw documents into retrieval units.
pub struct Chunker {
    discourse_base_url: String,
    course_base_url: String,
}

impl Chunker {
    pub fn new(corpus: &CorpusConfig) -> Self {
        Self {
            discourse_base_url: corpus.discourse_base_url.trim_end_matches('/').to_string(),
            course_base_url: corpus.course_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Chunk scraped discourse topics, one chunk per substantial post.
    ///
    /// Source order (topics, then posts within each topic) is preserved.
    pub fn chunk_discourse(&self, topics: &[RawTopic]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for topic in topics {
            let topic_url = format!(
                "{}/t/{}/{}",
                self.discourse_base_url, topic.topic_slug, topic.topic_id
            );

            for post in &topic.post_stream.posts {
                let markup = post
                    .cooked
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .or(post.raw.as_deref())
                    .unwrap_or_default();
                if markup.is_empty() {
                    continue;
                }

                let content = clean_html(markup);
                if content.chars().count() <= MIN_POST_CHARS {
                    continue;
                }

                chunks.push(Chunk::Discourse(DiscourseChunk {
                    hash: hash_content(&content),
                    full_url: format!("{}/{}", topic_url, post.post_number),
                    content,
                    title: topic.topic_title.clone(),
                    url: topic_url.clone(),
                    topic_id: topic.topic_id,
                    post_number: post.post_number,
                    author: post.username.clone(),
                    created_at: post.created_at,
                    tags: topic.tags.clone(),
                    category_id: topic.category_id,
                    reply_to_post_number: post.reply_to_post_number,
                }));
            }
        }

        chunks
    }

    /// Chunk a markdown course page into heading-delimited sections.
    pub fn chunk_course(&self, document: &CourseDocument) -> Vec<Chunk> {
        let url = format!("{}/{}", self.course_base_url, page_slug(&document.file_name));

        split_markdown(&document.content)
            .into_iter()
            .filter(|section| section.content.chars().count() > MIN_SECTION_CHARS)
            .map(|section| {
                Chunk::Course(CourseChunk {
                    hash: hash_content(&section.content),
                    content: section.content,
                    title: section.title,
                    url: url.clone(),
                    file: document.file_name.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, PartialEq)]
struct Section {
    title: String,
    content: String,
}

/// Split markdown at heading lines. Each section is the heading line plus
/// everything up to the next heading; text before the first heading
/// becomes a section with an empty title. A document without headings
/// yields a single section.
fn split_markdown(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section {
        title: String::new(),
        content: String::new(),
    };

    for line in content.lines() {
        if line.starts_with('#') {
            if !current.content.is_empty() {
                sections.push(current);
            }
            current = Section {
                title: line.trim_start_matches('#').trim().to_string(),
                content: format!("{}\n", line),
            };
        } else {
            current.content.push_str(line);
            current.content.push('\n');
        }
    }

    if !current.content.is_empty() {
        sections.push(current);
    }

    sections
}

/// Strip tags and collapse runs of whitespace into single spaces.
fn clean_html(markup: &str) -> String {
    let without_tags = HTML_TAG.replace_all(markup, " ");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// "Week_1_Intro.md" -> "week-1-intro"
fn page_slug(file_name: &str) -> String {
    file_name
        .trim_end_matches(".md")
        .replace('_', "-")
        .to_lowercase()
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}
