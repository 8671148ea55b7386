//! Demo-mode fallback portraits.
//!
//! When the live generation call cannot complete (billing errors, quota,
//! network) the endpoint substitutes a pre-generated portrait instead of
//! failing the request. Remote copies are tried first; the bundled copy
//! is the last resort so demo mode also works offline.

use tracing::warn;
use url::Url;

use crate::error::SleepcasterError;

/// Demo portrait compiled into the binary.
pub static BUNDLED_DEMO_IMAGE: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/static/demo-scrooge.png"
));

/// Fetches a demo portrait, trying each remote URL in order and falling
/// back to the bundled copy. Never fails.
pub async fn demo_image(client: &reqwest::Client, urls: &[Url]) -> Vec<u8> {
    for url in urls {
        match fetch_demo_url(client, url).await {
            Ok(bytes) => return bytes,
            Err(err) => warn!("Demo image fetch failed for {}: {}", url, err),
        }
    }
    BUNDLED_DEMO_IMAGE.to_vec()
}

async fn fetch_demo_url(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, SleepcasterError> {
    let resp = client.get(url.as_str()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SleepcasterError::Provider(format!(
            "Demo image fetch returned {status}"
        )));
    }
    let bytes = resp.bytes().await?;
    if image::guess_format(&bytes).is_err() {
        return Err(SleepcasterError::Provider(
            "Demo URL did not return an image".to_string(),
        ));
    }
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_url_list_serves_bundled_copy() {
        let bytes = demo_image(&reqwest::Client::new(), &[]).await;
        assert_eq!(bytes, BUNDLED_DEMO_IMAGE);
    }
}
