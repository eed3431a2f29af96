use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use console::{style, Emoji};

use crate::config::Config;
use crate::llm::{AnswerGenerator, OpenAiGenerator};
use crate::respond::{assemble, no_information_response, Response};
use crate::search::store::Chunk;
use crate::search::{create_embedder, IndexStore, Searcher};

static ANSWER: Emoji<'_, '_> = Emoji("💬 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Full pipeline: retrieve context, generate an answer, assemble the
/// response. With zero relevant results the generator is never called
/// and the fixed no-information response is returned instead.
pub async fn run_ask(
    config: &Config,
    index_path: &Path,
    question: &str,
    image: Option<&str>,
    json: bool,
) -> Result<()> {
    let embedder = create_embedder(&config.embedder);
    let store = IndexStore::new(index_path);
    let index = store.load_for_embedder(embedder.model(), embedder.dimensions())?;

    let searcher = Searcher::new(Arc::new(index), embedder, &config.search);
    let results = searcher.search(question, config.search.top_k).await?;

    let response = if results.is_empty() {
        no_information_response()
    } else {
        let generator = OpenAiGenerator::from_env(&config.generator)?;
        let context: Vec<Chunk> = results.iter().map(|r| r.chunk.clone()).collect();
        let answer = generator.generate(question, &context, image).await?;
        assemble(answer, &results)
    };

    print_response(&response, json)
}

fn print_response(response: &Response, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!("\n{}{}\n", ANSWER, response.answer);

    if !response.links.is_empty() {
        println!("{}", style("Sources:").bold());
        for link in &response.links {
            println!("  {} {}", LINK, style(&link.url).green());
            println!("     {}", style(&link.text).dim());
        }
    }

    Ok(())
}
