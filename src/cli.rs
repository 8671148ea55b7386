//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "SLEEPCASTER_DEBUG")]
    /// Enable debug logging. Env: SLEEPCASTER_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "SLEEPCASTER_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: SLEEPCASTER_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "SLEEPCASTER_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: SLEEPCASTER_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    /// OpenAI API key. When unset the server runs in demo-only mode and
    /// every request is served from the fallback portraits.
    /// Env: OPENAI_API_KEY
    pub openai_api_key: Option<String>,

    #[clap(long, default_value = "gpt-image-1.5", env = "SLEEPCASTER_IMAGE_MODEL")]
    /// Image model. `gpt-image-*`, `dall-e-3` and `dall-e-2` request
    /// shapes are supported. Env: SLEEPCASTER_IMAGE_MODEL
    pub image_model: String,

    #[clap(long, env = "SLEEPCASTER_DEMO_MODE")]
    /// Serve every request from the demo fallback, even when an API key
    /// is configured. Env: SLEEPCASTER_DEMO_MODE
    pub demo_mode: bool,

    #[clap(long, default_value = "60", env = "SLEEPCASTER_REQUEST_TIMEOUT")]
    /// Maximum duration (seconds) for a single outbound provider call.
    /// Env: SLEEPCASTER_REQUEST_TIMEOUT
    pub request_timeout: u64,
}
