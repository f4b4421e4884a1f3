//! Text-generation service client.
//!
//! The planner only needs "system instruction + prompt in, text out", so the
//! service sits behind [`TextGenerator`]. [`GeminiClient`] talks to Google's
//! Generative Language API.

use crate::config::GeminiConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl TextGenerator for Arc<dyn TextGenerator> {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        (**self).generate(request).await
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    // The API key travels in the `x-goog-api-key` header, never in the URL
    fn build_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

fn http_error(e: reqwest::Error) -> LlmError {
    LlmError::Http(e.without_url().to_string())
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiRequest {
    fn from_request(request: GenerationRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: request.prompt,
                }],
            }],
            system_instruction: if request.system.is_empty() {
                None
            } else {
                Some(GeminiSystemInstruction {
                    parts: vec![GeminiPart {
                        text: request.system,
                    }],
                })
            },
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

// Joins the text parts of the first candidate
fn extract_text(body: &str) -> Result<String, LlmError> {
    let parsed: GeminiResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Serialization(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(LlmError::Response(format!(
            "Gemini API error: {}",
            error.message
        )));
    }

    let text = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| LlmError::Response("No content in response".to_string()))?;

    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        let url = self.build_url(&request.model);
        debug!(model = %request.model, prompt_chars = request.prompt.len(), "Sending generation request");

        let body = GeminiRequest::from_request(request);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let text = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            // Error bodies usually carry a readable message
            return match extract_text(&text) {
                Err(LlmError::Response(message)) => Err(LlmError::Response(format!(
                    "HTTP {}: {}",
                    status, message
                ))),
                _ => Err(LlmError::Response(format!("HTTP {}: {}", status, text))),
            };
        }

        extract_text(&text)
    }
}
