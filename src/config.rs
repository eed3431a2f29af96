use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Embedding backend settings. The same configuration drives both the
/// index build and the query path so that vectors stay comparable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub endpoint: String,
    pub model: String,
    pub dimensions: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
        }
    }
}

/// Ranking parameters for the query path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How many candidates to keep before the relevance floor is applied.
    pub top_k: usize,
    /// Candidates scoring at or below this are dropped.
    pub min_similarity: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_similarity: 0.1,
        }
    }
}

/// Where the corpus came from, used to derive chunk URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Discourse forum base, e.g. "https://discourse.example.edu".
    pub discourse_base_url: String,
    /// Course site base for markdown pages, e.g. "https://course.example.edu/#".
    pub course_base_url: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            discourse_base_url: "https://discourse.onlinedegree.iitm.ac.in".to_string(),
            course_base_url: "https://tds.s-anand.net/#".to_string(),
        }
    }
}

/// Answer generation backend (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub vision_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o".to_string(),
            max_tokens: 1000,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedder: EmbedderConfig,
    pub search: SearchConfig,
    pub corpus: CorpusConfig,
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load from a TOML file, or defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }
}
