//! Gemini text-generation client.
//!
//! One prompt in, one text completion out. Callers own prompt construction
//! and response parsing; this module only speaks the `generateContent` wire
//! format.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::json;
use tracing::debug;

/// Default model endpoint.
const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

/// Per-call sampling configuration.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,

    /// Top-k cutoff, if set
    pub top_k: Option<u32>,

    /// Nucleus sampling cutoff, if set
    pub top_p: Option<f32>,

    /// Response token budget
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: None,
            top_p: None,
            max_output_tokens: 2000,
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

/// Gemini generateContent client.
#[derive(Clone)]
pub struct GeminiClient {
    /// HTTP client
    client: Client,

    /// Endpoint URL
    url: String,

    /// API key
    api_key: String,
}

impl GeminiClient {
    /// Create a new client for the default endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_url(GEMINI_API_URL.to_string(), api_key)
    }

    /// Create a client against a specific endpoint.
    pub fn with_url(url: String, api_key: String) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            url,
            api_key,
        }
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not configured")?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let mut generation_config = json!({
            "temperature": config.temperature,
            "maxOutputTokens": config.max_output_tokens,
        });
        if let Some(top_k) = config.top_k {
            generation_config["topK"] = json!(top_k);
        }
        if let Some(top_p) = config.top_p {
            generation_config["topP"] = json!(top_p);
        }

        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": prompt
                }]
            }],
            "generationConfig": generation_config,
        });

        debug!("Requesting completion for prompt ({} chars)", prompt.len());

        let response = self
            .client
            .post(format!("{}?key={}", self.url, self.api_key))
            .json(&payload)
            .send()
            .await
            .context("Failed to call Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error (status {}): {}", status, error_text);
        }

        #[derive(serde::Deserialize)]
        struct Response {
            candidates: Vec<Candidate>,
        }
        #[derive(serde::Deserialize)]
        struct Candidate {
            content: Content,
        }
        #[derive(serde::Deserialize)]
        struct Content {
            parts: Vec<Part>,
        }
        #[derive(serde::Deserialize)]
        struct Part {
            text: String,
        }

        let response_data: Response = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = response_data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .context("Gemini response contained no candidates")?;

        Ok(text)
    }
}
