//! HTTP server: router, shared state and the transformation endpoint.

use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

use crate::cli::CliOptions;
use crate::constants::{
    DEMO_FALLBACK_MESSAGE, DEMO_REQUESTED_MESSAGE, DEMO_UNCONFIGURED_MESSAGE,
    FALLBACK_IMAGE_URLS, SCROOGE_PROMPT, SUCCESS_MESSAGE,
};
use crate::error::SleepcasterError;
use crate::generator::openai::OpenAiGenerator;
use crate::generator::{ImageGenerator, data_url, fallback};

mod views;

use views::home_handler;

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct AppState {
    generator: Option<Arc<dyn ImageGenerator>>,
    http: reqwest::Client,
    fallback_urls: Arc<Vec<Url>>,
}

impl AppState {
    fn new(
        generator: Option<Arc<dyn ImageGenerator>>,
        http: reqwest::Client,
        fallback_urls: Vec<Url>,
    ) -> Self {
        Self {
            generator,
            http,
            fallback_urls: Arc::new(fallback_urls),
        }
    }

    /// Builds the application state from CLI options: one HTTP client
    /// carrying the outbound timeout, the validated fallback URL list,
    /// and the provider unless demo mode is forced or no key is set.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cli.request_timeout))
            .build()?;

        let fallback_urls = FALLBACK_IMAGE_URLS
            .iter()
            .map(|raw| Url::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let generator: Option<Arc<dyn ImageGenerator>> = if cli.demo_mode {
            info!("Demo mode forced, every request will use the fallback portraits");
            None
        } else {
            match cli.openai_api_key.as_ref() {
                Some(api_key) => Some(Arc::new(OpenAiGenerator::new(
                    http.clone(),
                    api_key.clone(),
                    cli.image_model.clone(),
                ))),
                None => {
                    warn!("No OpenAI API key configured, running in demo-only mode");
                    None
                }
            }
        };

        Ok(Self::new(generator, http, fallback_urls))
    }
}

/// JSON body for `POST /api/process-image`. The selfie never leaves the
/// browser; the client only asks for a generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProcessImageRequest {
    #[serde(default)]
    generate_scrooge: bool,
    #[serde(default)]
    demo_mode: bool,
}

/// JSON body returned on success, including the fallback path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProcessImageResponse {
    processed_image: String,
    message: String,
    demo_mode: bool,
}

async fn demo_response(
    state: &AppState,
    message: &str,
) -> Result<Json<ProcessImageResponse>, SleepcasterError> {
    let bytes = fallback::demo_image(&state.http, &state.fallback_urls).await;
    Ok(Json(ProcessImageResponse {
        processed_image: data_url(&bytes)?,
        message: message.to_string(),
        demo_mode: true,
    }))
}

/// handles POST /api/process-image
async fn process_image_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessImageRequest>,
) -> Result<Json<ProcessImageResponse>, SleepcasterError> {
    if !request.generate_scrooge {
        return Err(SleepcasterError::BadRequest("No image provided".to_string()));
    }

    if request.demo_mode {
        info!("Demo mode requested, serving a fallback portrait");
        return demo_response(&state, DEMO_REQUESTED_MESSAGE).await;
    }

    let Some(generator) = state.generator.clone() else {
        info!("No provider configured, serving a fallback portrait");
        return demo_response(&state, DEMO_UNCONFIGURED_MESSAGE).await;
    };

    match generator.generate(SCROOGE_PROMPT).await {
        Ok(bytes) => Ok(Json(ProcessImageResponse {
            processed_image: data_url(&bytes)?,
            message: SUCCESS_MESSAGE.to_string(),
            demo_mode: false,
        })),
        Err(err) => {
            warn!("Provider call failed, substituting a demo portrait: {}", err);
            demo_response(&state, DEMO_FALLBACK_MESSAGE).await
        }
    }
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

async fn app_js_handler() -> impl IntoResponse {
    const APP_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/app.js"));
    ([(CONTENT_TYPE, "text/javascript")], APP_JS)
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(home_handler))
        .route("/static/styles.css", axum::routing::get(styles_handler))
        .route("/static/app.js", axum::routing::get(app_js_handler))
        .route(
            "/api/process-image",
            axum::routing::post(process_image_handler),
        )
}

/// Binds the listener and serves the app until shutdown.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = create_router().with_state(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Simulated provider: either a tiny PNG or a canned failure.
    struct MockGenerator {
        fail: bool,
    }

    #[async_trait]
    impl ImageGenerator for MockGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, SleepcasterError> {
            if self.fail {
                Err(SleepcasterError::Provider(
                    "simulated provider outage".to_string(),
                ))
            } else {
                Ok(tiny_png())
            }
        }
    }

    fn tiny_png() -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(1, 1)
            .write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode png");
        buf.into_inner()
    }

    fn test_state(generator: Option<Arc<dyn ImageGenerator>>) -> AppState {
        // Empty fallback URL list keeps tests off the network.
        AppState::new(generator, reqwest::Client::new(), Vec::new())
    }

    fn test_app(generator: Option<Arc<dyn ImageGenerator>>) -> Router {
        create_router().with_state(test_state(generator))
    }

    fn process_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/process-image")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request")
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("parse json body")
    }

    async fn read_body(response: axum::response::Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[tokio::test]
    async fn missing_flag_returns_400_with_error() {
        let app = test_app(Some(Arc::new(MockGenerator { fail: false })));

        let response = app
            .oneshot(process_request("{}"))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn false_flag_returns_400() {
        let app = test_app(Some(Arc::new(MockGenerator { fail: false })));

        let response = app
            .oneshot(process_request(r#"{"generateScrooge": false}"#))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn provider_success_returns_image_data_url() {
        let app = test_app(Some(Arc::new(MockGenerator { fail: false })));

        let response = app
            .oneshot(process_request(r#"{"generateScrooge": true}"#))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let processed = body["processedImage"].as_str().expect("processedImage");
        assert!(processed.starts_with("data:image/"));
        assert_eq!(body["demoMode"], false);
        assert_eq!(body["message"], SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn provider_failure_downgrades_to_demo_mode() {
        let app = test_app(Some(Arc::new(MockGenerator { fail: true })));

        let response = app
            .oneshot(process_request(r#"{"generateScrooge": true}"#))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["message"], DEMO_FALLBACK_MESSAGE);
        let processed = body["processedImage"].as_str().expect("processedImage");
        assert!(processed.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn demo_mode_request_skips_the_provider() {
        // A working provider is configured, but the client asked for
        // demo mode up front, so the fallback portrait comes back.
        let app = test_app(Some(Arc::new(MockGenerator { fail: false })));

        let response = app
            .oneshot(process_request(
                r#"{"generateScrooge": true, "demoMode": true}"#,
            ))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["message"], DEMO_REQUESTED_MESSAGE);
    }

    #[tokio::test]
    async fn unconfigured_provider_serves_demo_portrait() {
        let app = test_app(None);

        let response = app
            .oneshot(process_request(r#"{"generateScrooge": true}"#))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["message"], DEMO_UNCONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let app = test_app(None);

        let response = app
            .oneshot(process_request("this is not json"))
            .await
            .expect("send request");
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn home_page_renders_the_uploader() {
        let app = test_app(None);

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .expect("build request");
        let response = app.oneshot(request).await.expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("Upload your selfie"));
        assert!(body.contains(crate::constants::DOWNLOAD_FILENAME));
    }

    #[tokio::test]
    async fn static_routes_set_content_types() {
        let app = test_app(None);

        let request = Request::builder()
            .method("GET")
            .uri("/static/styles.css")
            .body(Body::empty())
            .expect("build request");
        let response = app.clone().oneshot(request).await.expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).expect("content type"),
            "text/css"
        );

        let request = Request::builder()
            .method("GET")
            .uri("/static/app.js")
            .body(Body::empty())
            .expect("build request");
        let response = app.oneshot(request).await.expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).expect("content type"),
            "text/javascript"
        );
    }
}
