//! Image generation: the provider seam, the OpenAI implementation and
//! the demo-mode fallback.

use async_trait::async_trait;

use crate::error::SleepcasterError;

pub mod fallback;
pub mod openai;

/// A provider that renders an image for a natural-language prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render a single image for `prompt`, returning the raw encoded
    /// bytes (PNG or JPEG, depending on the backend).
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, SleepcasterError>;
}

/// Encodes image bytes as a `data:` URL, sniffing the MIME type from
/// the bytes themselves. Bytes that are not a recognizable image are
/// rejected so the endpoint never hands the browser a bogus data URL.
pub fn data_url(bytes: &[u8]) -> Result<String, SleepcasterError> {
    use base64::Engine;
    use base64::engine::general_purpose;

    let format = image::guess_format(bytes).map_err(|err| {
        SleepcasterError::InternalServerError(format!("Unrecognized image bytes: {err}"))
    })?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        general_purpose::STANDARD.encode(bytes)
    ))
}
