//! OpenAI Images API client.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ImageGenerator;
use crate::error::SleepcasterError;

const IMAGES_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

/// Request body for POST /v1/images/generations
/// Docs: https://platform.openai.com/docs/api-reference/images
#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,

    // For GPT image models.
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<&'a str>,

    // For dall-e models.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
    revised_prompt: Option<String>,
}

/// Generator backed by the OpenAI Images API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    /// Builds a generator for the given model. The client carries the
    /// single outbound timeout; there are no retries.
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ImagesGenerateRequest<'a> {
        // GPT image models always return base64, and support output_format.
        // DALL·E models can return url or b64_json.
        if self.model.starts_with("gpt-image") {
            ImagesGenerateRequest {
                model: &self.model,
                prompt,
                n: 1,
                size: "1024x1024",
                quality: Some("high"),
                output_format: Some("png"),
                response_format: None,
                style: None,
            }
        } else if self.model == "dall-e-3" {
            ImagesGenerateRequest {
                model: &self.model,
                prompt,
                n: 1,
                size: "1024x1024",
                quality: Some("hd"),
                output_format: None,
                response_format: Some("b64_json"),
                style: Some("natural"),
            }
        } else {
            // dall-e-2 etc
            ImagesGenerateRequest {
                model: &self.model,
                prompt,
                n: 1,
                size: "1024x1024",
                quality: None,
                output_format: None,
                response_format: Some("b64_json"),
                style: None,
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, SleepcasterError> {
        let resp = self
            .client
            .post(IMAGES_GENERATIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = resp.status();
        let resp_bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(SleepcasterError::Provider(format!(
                "OpenAI Images API error {status}: {}",
                String::from_utf8_lossy(&resp_bytes)
            )));
        }

        let parsed: ImagesGenerateResponse =
            serde_json::from_slice(&resp_bytes).map_err(|err| {
                SleepcasterError::Provider(format!(
                    "Failed to parse Images API response: {err}"
                ))
            })?;

        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| SleepcasterError::Provider("No image data returned".to_string()))?;

        if let Some(revised_prompt) = first.revised_prompt {
            debug!("Revised prompt from OpenAI: {}", revised_prompt);
        }

        if let Some(b64_json) = first.b64_json {
            general_purpose::STANDARD.decode(b64_json).map_err(|err| {
                SleepcasterError::Provider(format!("Failed to base64-decode image: {err}"))
            })
        } else if let Some(url) = first.url {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SleepcasterError::Provider(format!(
                    "Image download error {status}"
                )));
            }
            Ok(resp.bytes().await?.to_vec())
        } else {
            Err(SleepcasterError::Provider(
                "Image response missing b64_json and url fields".to_string(),
            ))
        }
    }
}
