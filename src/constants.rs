//! Shared constants/setters for things
//!

/// The fixed prompt sent to the image provider. The uploaded selfie
/// never leaves the browser; generation is driven by this text alone.
pub const SCROOGE_PROMPT: &str = "A portrait of Ebenezer Scrooge from A Christmas Carol: \
an elderly Victorian gentleman in a white nightcap and nightgown, holding a brass \
candlestick with a lit candle, sour miserly expression, dark 19th-century London \
bedroom behind him, painted in the style of a warm candlelit oil painting. \
Square 1:1, no text, no watermarks.";

/// Pre-generated demo portraits, tried in order when the live
/// generation call cannot complete.
pub const FALLBACK_IMAGE_URLS: &[&str] = &[
    "https://sleepcaster.org/demo/scrooge-1.png",
    "https://sleepcaster.org/demo/scrooge-2.png",
    "https://sleepcaster.org/demo/scrooge-3.png",
];

/// Filename the UI offers when downloading a processed portrait.
pub const DOWNLOAD_FILENAME: &str = "sleepcaster-scrooge.png";

/// Response message for a live generation.
pub const SUCCESS_MESSAGE: &str = "Your Scrooge transformation is complete";

/// Response message when the client asked for demo mode up front.
pub const DEMO_REQUESTED_MESSAGE: &str = "Image processed successfully (demo mode)";

/// Response message when the provider failed and the fallback portrait
/// was substituted.
pub const DEMO_FALLBACK_MESSAGE: &str =
    "The image provider was unavailable, so a demo portrait was substituted";

/// Response message when no provider is configured at all.
pub const DEMO_UNCONFIGURED_MESSAGE: &str =
    "No image provider is configured, serving a demo portrait";
