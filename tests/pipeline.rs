//! End-to-end retrieval pipeline: chunk raw documents, embed with a
//! deterministic stub, persist, reload, rank, and assemble the response.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use course_ta::config::{CorpusConfig, SearchConfig};
use course_ta::error::EmbeddingError;
use course_ta::ingest::{CourseDocument, PostStream, RawPost, RawTopic};
use course_ta::respond::{assemble, no_information_response};
use course_ta::search::embedder::Embedder;
use course_ta::search::{Chunker, IndexStore, Indexer, Searcher};

/// Maps known phrases to fixed 3-dimensional vectors; anything else is
/// far from every axis. Deterministic, so ranking is reproducible.
struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl StubEmbedder {
    fn new() -> Self {
        Self {
            vectors: HashMap::new(),
        }
    }

    fn with(mut self, needle: &str, vector: [f32; 3]) -> Self {
        self.vectors.insert(needle.to_string(), vector.to_vec());
        self
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        for (needle, vector) in &self.vectors {
            if text.contains(needle.as_str()) {
                return vector.clone();
            }
        }
        vec![0.0, 0.0, 1.0]
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimensions(&self) -> usize {
        3
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        Ok(())
    }
}

fn post(number: u64, body: &str) -> RawPost {
    RawPost {
        post_number: number,
        cooked: Some(format!("<p>{}</p>", body)),
        raw: None,
        username: Some("student".to_string()),
        created_at: None,
        reply_to_post_number: None,
    }
}

fn sample_corpus() -> (Vec<RawTopic>, CourseDocument) {
    let topic = RawTopic {
        topic_id: 11,
        topic_slug: "ga4-deadline".to_string(),
        topic_title: "GA4 deadline".to_string(),
        tags: vec!["graded-assignment".to_string()],
        category_id: Some(34),
        post_stream: PostStream {
            posts: vec![
                post(1, "The deadline question comes up every term, so here is the rule we follow for all graded work."),
                post(2, "Extensions are only granted for documented medical reasons, please email the course staff early."),
                post(3, "ok thanks"), // below the 50-char floor, dropped
            ],
        },
    };

    let page = CourseDocument {
        file_name: "Week_4_Deployment.md".to_string(),
        content: format!(
            "# Deployment basics\nThe deployment section explains hosting. {}\n# Grading\nShort.\n",
            "x".repeat(120)
        ),
    };

    (vec![topic], page)
}

#[tokio::test]
async fn corpus_survives_build_persist_reload_and_query() {
    let (topics, page) = sample_corpus();
    let chunker = Chunker::new(&CorpusConfig::default());

    let mut chunks = chunker.chunk_discourse(&topics);
    chunks.extend(chunker.chunk_course(&page));
    // Post 3 and the short "Grading" section fall below the floors.
    assert_eq!(chunks.len(), 3);

    let embedder: Arc<dyn Embedder> = Arc::new(
        StubEmbedder::new()
            .with("deadline", [1.0, 0.0, 0.0])
            .with("Extensions", [0.8, 0.6, 0.0])
            .with("deployment", [0.0, 1.0, 0.0]),
    );

    let index = Indexer::new(Arc::clone(&embedder))
        .build_index(chunks.clone())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.persist(&index).unwrap();

    let reloaded = store.load_for_embedder("stub-model", 3).unwrap();
    assert_eq!(reloaded.len(), index.len());
    for (original, loaded) in chunks.iter().zip(reloaded.entries()) {
        assert_eq!(*original, loaded.chunk);
    }

    let searcher = Searcher::new(Arc::new(reloaded), embedder, &SearchConfig::default());
    let results = searcher
        .search("when is the deadline for GA4", 10)
        .await
        .unwrap();

    // Query embeds to [1,0,0]: the deadline post is first, the extensions
    // post second, the deployment section scores 0 and is floored out.
    assert_eq!(results.len(), 2);
    assert!(results[0].chunk.content().contains("deadline question"));
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn empty_retrieval_produces_no_information_response() {
    let (topics, _) = sample_corpus();
    let chunker = Chunker::new(&CorpusConfig::default());
    let chunks = chunker.chunk_discourse(&topics);

    // No phrase mappings: every chunk sits on the [0,0,1] axis.
    let embedder: Arc<dyn Embedder> = Arc::new(StubEmbedder::new().with("zzz", [1.0, 0.0, 0.0]));
    let index = Indexer::new(Arc::clone(&embedder))
        .build_index(chunks)
        .await
        .unwrap();

    let searcher = Searcher::new(Arc::new(index), embedder, &SearchConfig::default());
    let results = searcher.search("zzz unrelated", 10).await.unwrap();
    assert!(results.is_empty());

    // The caller handles the empty set; the assembler tolerates it too.
    let response = no_information_response();
    assert!(response.links.is_empty());
    assert_eq!(assemble("whatever", &results).links.len(), 0);
}

#[tokio::test]
async fn links_use_post_level_urls_so_same_topic_posts_both_survive() {
    let (topics, _) = sample_corpus();
    let chunker = Chunker::new(&CorpusConfig::default());
    let chunks = chunker.chunk_discourse(&topics);

    // Both surviving posts map near the query axis at different scores.
    let embedder: Arc<dyn Embedder> = Arc::new(
        StubEmbedder::new()
            .with("deadline", [1.0, 0.0, 0.0])
            .with("Extensions", [0.9, 0.4, 0.0]),
    );
    let index = Indexer::new(Arc::clone(&embedder))
        .build_index(chunks)
        .await
        .unwrap();

    let searcher = Searcher::new(Arc::new(index), embedder, &SearchConfig::default());
    let results = searcher.search("deadline extension rules", 10).await.unwrap();
    assert_eq!(results.len(), 2);

    let response = assemble("Deadlines are firm unless documented.", &results);

    // Distinct posts have distinct full_urls, so both links survive and
    // keep the similarity-descending order.
    assert_eq!(response.links.len(), 2);
    assert!(response.links[0].url.ends_with("/t/ga4-deadline/11/1"));
    assert!(response.links[1].url.ends_with("/t/ga4-deadline/11/2"));
    assert_eq!(response.links[0].text, "GA4 deadline");
}
