use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "course-ta",
    version,
    about = "Answers course questions from forum posts and course pages with supporting links"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults apply when missing)
    #[arg(long, global = true, default_value = "course-ta.toml")]
    pub config: PathBuf,

    /// Index file location
    #[arg(long, global = true, default_value = "data/index.json")]
    pub index: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chunk and embed scraped data into a fresh search index
    Process {
        /// Scraped discourse topics JSON file
        #[arg(long, default_value = "data/discourse_posts.json")]
        discourse: PathBuf,

        /// Folder of markdown course pages
        #[arg(long, default_value = "data/course_pages")]
        course: PathBuf,
    },

    /// Query the index and print ranked chunks
    Search {
        query: String,

        /// How many candidates to keep before the relevance floor
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print raw results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a question using retrieved context and the generator
    Ask {
        question: String,

        /// Base64-encoded image to attach to the question
        #[arg(long)]
        image: Option<String>,

        /// Print the response contract JSON instead of styled output
        #[arg(long)]
        json: bool,
    },

    /// Show statistics for the persisted index
    Status,
}
