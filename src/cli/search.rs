use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use console::{style, Emoji};

use crate::config::Config;
use crate::search::{create_embedder, IndexStore, Searcher};

static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static LINK: Emoji<'_, '_> = Emoji("📄 ", "");

pub async fn run_search(
    config: &Config,
    index_path: &Path,
    query: &str,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let embedder = create_embedder(&config.embedder);
    let store = IndexStore::new(index_path);
    let index = store.load_for_embedder(embedder.model(), embedder.dimensions())?;

    let searcher = Searcher::new(Arc::new(index), embedder, &config.search);
    let top_k = top_k.unwrap_or(config.search.top_k);
    let results = searcher.search(query, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No relevant content found for: {}", style(query).italic());
        return Ok(());
    }

    println!(
        "\n{}Found {} results for: {}\n",
        SEARCH,
        style(results.len()).cyan(),
        style(query).yellow().bold()
    );

    for (i, result) in results.iter().enumerate() {
        let chunk = &result.chunk;
        println!(
            "{} {}. {} {}",
            LINK,
            style(i + 1).dim(),
            style(chunk.best_url()).green(),
            style(format!("[{}]", chunk.source())).dim()
        );
        println!(
            "   Score: {} | {}",
            style(format!("{:.3}", result.score)).cyan(),
            if chunk.title().is_empty() {
                style("(untitled)").dim().to_string()
            } else {
                chunk.title().to_string()
            }
        );

        let preview: String = chunk.content().chars().take(200).collect();
        println!("   {}\n", style(preview).dim());
    }

    Ok(())
}
