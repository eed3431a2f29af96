//! Turns ranked search results into the response handed to the caller:
//! the generated answer plus a deduplicated list of supporting links.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::search::store::{Chunk, SearchResult};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Only this many results contribute links, however many were ranked.
const MAX_LINKS: usize = 5;
/// Content-derived link text starts from at most this many characters.
const CONTENT_PREVIEW_CHARS: usize = 200;
/// Display cap; longer text is cut to 97 characters plus an ellipsis.
const LINK_TEXT_CHARS: usize = 100;

const FALLBACK_LINK_TEXT: &str = "Relevant discussion";

/// The fixed answer the caller substitutes when retrieval finds nothing.
pub const NO_INFORMATION_ANSWER: &str = "I don't have enough information to answer this \
     question based on the available course content and discussions.";

/// A supporting source shown to the student, unique per response by URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub url: String,
    pub text: String,
}

/// The response contract for the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    pub links: Vec<Link>,
}

/// Build the final response from a generated answer and ranked results.
///
/// Takes the first five results, deduplicates them by URL (first
/// occurrence wins; later duplicates are dropped, not merged) and keeps
/// the similarity-descending order. An empty result slice is valid and
/// yields an empty link list.
pub fn assemble(answer: impl Into<String>, results: &[SearchResult]) -> Response {
    let mut links = Vec::new();
    let mut seen_urls: HashSet<&str> = HashSet::new();

    for result in results.iter().take(MAX_LINKS) {
        let url = result.chunk.best_url();
        if url.is_empty() || !seen_urls.insert(url) {
            continue;
        }

        links.push(Link {
            url: url.to_string(),
            text: link_text(&result.chunk),
        });
    }

    Response {
        answer: answer.into(),
        links,
    }
}

/// The response for the no-relevant-content case. The caller uses this
/// instead of invoking the generator with empty context.
pub fn no_information_response() -> Response {
    Response {
        answer: NO_INFORMATION_ANSWER.to_string(),
        links: Vec::new(),
    }
}

/// Derive display text for a link: the chunk title when present, else a
/// content preview, whitespace-collapsed and capped at 100 characters.
fn link_text(chunk: &Chunk) -> String {
    let raw = if chunk.title().is_empty() {
        chunk.content().chars().take(CONTENT_PREVIEW_CHARS).collect()
    } else {
        chunk.title().to_string()
    };

    let mut text = WHITESPACE.replace_all(&raw, " ").trim().to_string();

    if text.chars().count() > LINK_TEXT_CHARS {
        text = text.chars().take(LINK_TEXT_CHARS - 3).collect::<String>() + "...";
    }

    if text.is_empty() {
        FALLBACK_LINK_TEXT.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::store::{CourseChunk, DiscourseChunk};

    fn discourse_result(title: &str, full_url: &str, score: f32) -> SearchResult {
        SearchResult::new(
            Chunk::Discourse(DiscourseChunk {
                content: "post body long enough to matter for previews".to_string(),
                title: title.to_string(),
                url: "https://forum/t/topic/1".to_string(),
                full_url: full_url.to_string(),
                topic_id: 1,
                post_number: 1,
                author: None,
                created_at: None,
                tags: vec![],
                category_id: None,
                reply_to_post_number: None,
                hash: "h".to_string(),
            }),
            score,
        )
    }

    fn course_result(title: &str, content: &str, url: &str, score: f32) -> SearchResult {
        SearchResult::new(
            Chunk::Course(CourseChunk {
                content: content.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                file: "page.md".to_string(),
                hash: "h".to_string(),
            }),
            score,
        )
    }

    #[test]
    fn empty_results_yield_empty_links() {
        let response = assemble("some answer", &[]);
        assert_eq!(response.answer, "some answer");
        assert!(response.links.is_empty());
    }

    #[test]
    fn only_first_five_results_considered() {
        let results: Vec<SearchResult> = (0..8)
            .map(|i| {
                discourse_result(
                    &format!("Topic {}", i),
                    &format!("https://forum/t/topic/{}/1", i),
                    0.9 - i as f32 * 0.05,
                )
            })
            .collect();

        let response = assemble("a", &results);
        assert_eq!(response.links.len(), 5);
        assert_eq!(response.links[0].text, "Topic 0");
        assert_eq!(response.links[4].text, "Topic 4");
    }

    #[test]
    fn duplicate_urls_keep_higher_ranked_position() {
        let results = vec![
            discourse_result("First mention", "https://forum/t/a/1/2", 0.9),
            discourse_result("Other topic", "https://forum/t/b/2/1", 0.8),
            discourse_result("Duplicate mention", "https://forum/t/a/1/2", 0.7),
        ];

        let response = assemble("a", &results);
        assert_eq!(response.links.len(), 2);
        assert_eq!(response.links[0].url, "https://forum/t/a/1/2");
        assert_eq!(response.links[0].text, "First mention");
        assert_eq!(response.links[1].url, "https://forum/t/b/2/1");
    }

    #[test]
    fn links_follow_result_order() {
        let results = vec![
            course_result("B section", "content", "https://course/#/b", 0.9),
            course_result("A section", "content", "https://course/#/a", 0.5),
        ];
        let response = assemble("a", &results);
        assert_eq!(response.links[0].text, "B section");
        assert_eq!(response.links[1].text, "A section");
    }

    #[test]
    fn link_text_prefers_title_over_content() {
        let results = vec![course_result(
            "Week 3: Scraping",
            "long content that would otherwise be used",
            "https://course/#/w3",
            0.9,
        )];
        assert_eq!(assemble("a", &results).links[0].text, "Week 3: Scraping");
    }

    #[test]
    fn empty_title_uses_content_preview() {
        let results = vec![course_result(
            "",
            "This   section\nexplains  deployment",
            "https://course/#/deploy",
            0.9,
        )];
        assert_eq!(
            assemble("a", &results).links[0].text,
            "This section explains deployment"
        );
    }

    #[test]
    fn long_text_truncated_to_97_plus_ellipsis() {
        let long_title = "t".repeat(150);
        let results = vec![course_result(&long_title, "c", "https://course/#/x", 0.9)];

        let text = &assemble("a", &results).links[0].text;
        assert_eq!(text.chars().count(), 100);
        assert!(text.ends_with("..."));
        assert_eq!(&text[..97], "t".repeat(97));
    }

    #[test]
    fn text_at_exactly_100_chars_not_truncated() {
        let title = "t".repeat(100);
        let results = vec![course_result(&title, "c", "https://course/#/x", 0.9)];
        assert_eq!(assemble("a", &results).links[0].text, title);
    }

    #[test]
    fn blank_chunk_falls_back_to_fixed_text() {
        let results = vec![course_result("", "   ", "https://course/#/x", 0.9)];
        assert_eq!(assemble("a", &results).links[0].text, "Relevant discussion");
    }

    #[test]
    fn no_information_response_is_fixed() {
        let response = no_information_response();
        assert!(response.links.is_empty());
        assert!(response.answer.contains("don't have enough information"));
    }

    #[test]
    fn response_serializes_to_contract_shape() {
        let results = vec![discourse_result("Topic", "https://forum/t/a/1/2", 0.9)];
        let response = assemble("the answer", &results);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["answer"], "the answer");
        assert_eq!(json["links"][0]["url"], "https://forum/t/a/1/2");
        assert_eq!(json["links"][0]["text"], "Topic");
    }
}
