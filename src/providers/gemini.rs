//! Gemini providers for embeddings and answer generation
//!
//! Talks to the Generative Language API with an API key, covering both the
//! chat model (`gemini-2.5-flash`) and the embedding model (`embedding-001`).

use async_trait::async_trait;
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::types::{ChatMessage, ChatRole};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// The batch embedding endpoint accepts at most this many texts per request
const EMBED_BATCH_LIMIT: usize = 100;

fn build_client(config: &GeminiConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

// --- Wire types (Generative Language API v1beta) ---

#[derive(serde::Serialize)]
struct Part {
    text: String,
}

#[derive(serde::Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn from_message(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: message.content.clone(),
            }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(serde::Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(serde::Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(serde::Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(serde::Serialize)]
struct EmbedContentRequest {
    model: String,
    content: EmbedContent,
}

#[derive(serde::Serialize)]
struct EmbedContent {
    parts: Vec<Part>,
}

#[derive(serde::Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(serde::Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(serde::Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(serde::Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

// --- Embedder ---

/// Gemini embedding provider
pub struct GeminiEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embed_model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, action)
    }

    fn embed_request(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: EmbedContent {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(self.endpoint("embedContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.embed_request(text))
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Gemini embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Gemini embedding failed ({}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(embed_response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(EMBED_BATCH_LIMIT) {
            let request = BatchEmbedRequest {
                requests: batch.iter().map(|t| self.embed_request(t)).collect(),
            };

            let response = self
                .client
                .post(self.endpoint("batchEmbedContents"))
                .header("x-goog-api-key", &self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    Error::Embedding(format!("Gemini batch embedding request failed: {}", e))
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Embedding(format!(
                    "Gemini batch embedding failed ({}): {}",
                    status, body
                )));
            }

            let batch_response: BatchEmbedResponse = response.json().await.map_err(|e| {
                Error::Embedding(format!("Failed to parse batch embedding response: {}", e))
            })?;

            if batch_response.embeddings.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "Gemini returned {} embeddings for {} texts",
                    batch_response.embeddings.len(),
                    batch.len()
                )));
            }

            all_embeddings.extend(batch_response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(all_embeddings)
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/models/{}", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Gemini health check failed: {}", e)))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "gemini-embedding"
    }
}

// --- LLM ---

/// Gemini chat completion provider
pub struct GeminiLlm {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiLlm {
    /// Create a new LLM provider from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.generate_model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiLlm {
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String> {
        let request = GenerateRequest {
            system_instruction: system_instruction.map(Content::system),
            contents: messages.iter().map(Content::from_message).collect(),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Llm("No text in Gemini response".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/models/{}", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Gemini health check failed: {}", e)))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
