//! HTTP client wrapper for the Gemini generative API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::gemini::GeminiError;
use crate::gemini::retry::{RetryPolicy, retryable_status};

/// Fixed prompt sent with every extracted handbook image.
pub const MEDICAL_IMAGE_PROMPT: &str = "You are a medical expert analyzing a medical image or diagram. \
Please provide a detailed description of what you see, including:\n\
- Any anatomical structures visible\n\
- Medical conditions or symptoms shown\n\
- Diagnostic information or measurements\n\
- Any text, labels, or captions in the image\n\
- The type of medical image (X-ray, diagram, chart, etc.)\n\n\
Be precise and use medical terminology where appropriate.";

/// Client for the vision and embedding endpoints of the Gemini API.
pub struct GeminiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) vision_model: String,
    pub(crate) embedding_model: String,
    pub(crate) retry: RetryPolicy,
}

impl GeminiClient {
    /// Construct a new client from the pipeline configuration.
    pub fn new(config: &Config) -> Result<Self, GeminiError> {
        let client = reqwest::Client::builder()
            .user_agent("oxbrain/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.google_api_key.clone(),
            vision_model: config.vision_model.clone(),
            embedding_model: config.embedding_model.clone(),
            retry: RetryPolicy::with_max_attempts(config.gemini_max_attempts),
        })
    }

    /// Describe a single raster image with the fixed medical prompt.
    ///
    /// The image bytes are inlined into the request as base64; the returned
    /// string concatenates every text part of the first candidate.
    pub async fn describe_image(&self, image_bytes: &[u8]) -> Result<String, GeminiError> {
        let url = self.endpoint(&self.vision_model, "generateContent");
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": MEDICAL_IMAGE_PROMPT },
                    {
                        "inline_data": {
                            "mime_type": "image/png",
                            "data": BASE64.encode(image_bytes),
                        }
                    }
                ]
            }]
        });

        let response = self.post_with_retry(&url, &body).await?;
        let payload: GenerateContentResponse = response.json().await?;
        let description: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if description.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(description)
    }

    /// Produce an embedding vector for each supplied text.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, GeminiError> {
        let url = self.endpoint(&self.embedding_model, "batchEmbedContents");
        let requests: Vec<Value> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.embedding_model),
                    "content": { "parts": [{ "text": text }] }
                })
            })
            .collect();
        let body = json!({ "requests": requests });

        let response = self.post_with_retry(&url, &body).await?;
        let payload: BatchEmbedResponse = response.json().await?;
        let embeddings: Vec<Vec<f32>> = payload
            .embeddings
            .into_iter()
            .map(|embedding| embedding.values)
            .collect();

        if embeddings.len() != texts.len() {
            return Err(GeminiError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }

    fn endpoint(&self, model: &str, action: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}?key={}",
            self.base_url, model, action, self.api_key
        )
    }

    /// POST a JSON body, retrying throttled and transient failures with
    /// bounded exponential backoff.
    async fn post_with_retry(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<reqwest::Response, GeminiError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.post(url).json(body).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if attempt < self.retry.max_attempts && retryable_status(status) {
                        let delay = self.retry.delay_for(attempt);
                        tracing::warn!(
                            %status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Gemini request throttled or failed; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    let body = response.text().await.unwrap_or_default();
                    return Err(GeminiError::UnexpectedStatus { status, body });
                }
                Err(err) => {
                    if attempt < self.retry.max_attempts && (err.is_timeout() || err.is_connect()) {
                        let delay = self.retry.delay_for(attempt);
                        tracing::warn!(
                            error = %err,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Gemini transport failure; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(GeminiError::Http(err));
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}
