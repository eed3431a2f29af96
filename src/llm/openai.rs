use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::GeneratorConfig;
use crate::search::store::Chunk;

use super::AnswerGenerator;

/// Per-chunk content cap inside the prompt context block.
const CONTEXT_CONTENT_CHARS: usize = 1000;
/// At most this many chunks are handed to the model.
const MAX_CONTEXT_CHUNKS: usize = 5;

const SYSTEM_PROMPT: &str = "You are a helpful teaching assistant for an online course. \
     You have access to course content and forum discussions.\n\n\
     Answer student questions based on the provided context. Be specific and helpful. \
     If you don't know something or the information isn't in the context, say so clearly.\n\n\
     When referencing specific information, mention which source it comes from.";

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    endpoint: String,
    model: String,
    vision_model: String,
    max_tokens: u32,
    temperature: f32,
    api_key: String,
    client: Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            vision_model: config.vision_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_key,
            client,
        }
    }

    pub fn from_env(config: &GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY is not set"))?;
        Ok(Self::new(config, api_key))
    }
}

/// Render the retrieved chunks into the bounded context block the model
/// sees: top five chunks, each capped at 1000 characters of content.
fn context_block(context: &[Chunk]) -> String {
    context
        .iter()
        .take(MAX_CONTEXT_CHUNKS)
        .map(|chunk| {
            let content: String = chunk.content().chars().take(CONTEXT_CONTENT_CHARS).collect();
            format!(
                "Source: {}\nURL: {}\nContent: {}...",
                chunk.title(),
                chunk.url(),
                content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl AnswerGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        question: &str,
        context: &[Chunk],
        image: Option<&str>,
    ) -> Result<String> {
        let user_prompt = format!(
            "Question: {}\n\nContext:\n{}\n\nPlease provide a helpful answer based on the context above.",
            question,
            context_block(context)
        );

        let user_content = match image {
            Some(base64_image) => json!([
                {"type": "text", "text": user_prompt},
                {"type": "image_url", "image_url": {
                    "url": format!("data:image/jpeg;base64,{}", base64_image)
                }}
            ]),
            None => json!(user_prompt),
        };

        let model = if image.is_some() {
            &self.vision_model
        } else {
            &self.model
        };

        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_content}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("generation request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("generation backend error ({}): {}", status, body));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("generation backend returned no choices"))
    }
}
