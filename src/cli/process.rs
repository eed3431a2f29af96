use std::path::Path;

use anyhow::Result;
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::ingest::{load_course_documents, load_discourse_topics};
use crate::search::{create_embedder, Chunker, Indexer, IndexStore};

static PROCESSING: Emoji<'_, '_> = Emoji("📊 ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");

/// Build the index from raw scraped data and atomically replace the
/// previous version on disk.
pub async fn run_process(
    config: &Config,
    index_path: &Path,
    discourse_file: &Path,
    course_dir: &Path,
) -> Result<()> {
    let embedder = create_embedder(&config.embedder);

    println!("{}Checking embedding backend...", INFO);
    embedder.health_check().await?;

    let chunker = Chunker::new(&config.corpus);
    let mut chunks = Vec::new();

    // A missing document category aborts the build. Serving against an
    // index with a whole category silently absent is worse than failing.
    if !discourse_file.exists() {
        anyhow::bail!(
            "discourse data not found at {}; refusing to build a partial index",
            discourse_file.display()
        );
    }
    if !course_dir.exists() {
        anyhow::bail!(
            "course pages not found at {}; refusing to build a partial index",
            course_dir.display()
        );
    }

    let topics = load_discourse_topics(discourse_file)?;
    let discourse_chunks = chunker.chunk_discourse(&topics);
    println!(
        "  Discourse posts:  {} chunks from {} topics",
        style(discourse_chunks.len()).green(),
        topics.len()
    );
    chunks.extend(discourse_chunks);

    let documents = load_course_documents(course_dir)?;
    let before = chunks.len();
    for document in &documents {
        chunks.extend(chunker.chunk_course(document));
    }
    println!(
        "  Course pages:     {} chunks from {} files",
        style(chunks.len() - before).green(),
        documents.len()
    );

    if chunks.is_empty() {
        anyhow::bail!("nothing to index: no chunks survived processing");
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!(
        "{}Embedding {} chunks with {}...",
        PROCESSING,
        chunks.len(),
        config.embedder.model
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let indexer = Indexer::new(embedder);
    let index = indexer.build_index(chunks).await?;

    pb.finish_and_clear();

    let store = IndexStore::new(index_path);
    store.persist(&index)?;

    let stats = index.stats(store.size_bytes());
    println!("\n{}Index built!\n", SUCCESS);
    println!("  Total chunks:     {}", style(stats.total_chunks).cyan());
    println!("  From discourse:   {}", stats.discourse_chunks);
    println!("  From course:      {}", stats.course_chunks);
    println!(
        "  Model:            {} ({} dims)",
        stats.model, stats.dimensions
    );
    println!("  Index size:       {} KB", stats.index_size_bytes / 1024);
    println!("  Written to:       {}", index_path.display());

    Ok(())
}

/// Print statistics for the persisted index without querying it.
pub fn run_status(config: &Config, index_path: &Path) -> Result<()> {
    let store = IndexStore::new(index_path);

    if !store.exists() {
        println!("{}No index found at {}", INFO, index_path.display());
        println!("Run `course-ta process` to build the search index.");
        return Ok(());
    }

    let index = store.load()?;
    let stats = index.stats(store.size_bytes());

    println!("\n{}Index Status: {}\n", INFO, index_path.display());
    println!("  Total chunks:     {}", style(stats.total_chunks).cyan());
    println!("  From discourse:   {}", stats.discourse_chunks);
    println!("  From course:      {}", stats.course_chunks);
    println!(
        "  Model:            {} ({} dims)",
        stats.model, stats.dimensions
    );
    println!(
        "  Index size:       {} KB",
        style(stats.index_size_bytes / 1024).yellow()
    );

    if index.model() != config.embedder.model
        || index.dimensions() != config.embedder.dimensions
    {
        println!(
            "\n  {} index model does not match configured embedder '{}' ({} dims); \
             queries will be refused until the index is rebuilt",
            style("warning:").red().bold(),
            config.embedder.model,
            config.embedder.dimensions
        );
    }

    Ok(())
}
