use anyhow::Result;
use clap::Parser;

use course_ta::cli::{self, Args, Command};
use course_ta::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;

    match args.command {
        Command::Process { discourse, course } => {
            cli::run_process(&config, &args.index, &discourse, &course).await
        }
        Command::Search { query, top_k, json } => {
            cli::run_search(&config, &args.index, &query, top_k, json).await
        }
        Command::Ask {
            question,
            image,
            json,
        } => cli::run_ask(&config, &args.index, &question, image.as_deref(), json).await,
        Command::Status => cli::run_status(&config, &args.index),
    }
}
