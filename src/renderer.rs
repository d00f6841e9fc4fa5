//! Client for the external render backend.
//!
//! The backend is an opaque HTTP service: `POST {base}/render` with a JSON
//! body of three viewing angles returns raw PNG bytes. Rendering may take
//! minutes, so the client carries a generous timeout. The `Renderer` trait is
//! the seam tests mock; `HttpRenderer` is the real implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::error::{Error, Result};

/// Content type the backend is expected to declare
pub const PNG_CONTENT_TYPE: &str = "image/png";

// Renders can be slow; match the backend's worst case rather than a
// typical HTTP timeout.
const RENDER_TIMEOUT: Duration = Duration::from_secs(300);

/// Viewing angles for a single render, all in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderParams {
    pub azimuth_deg: f64,
    pub polar_deg: f64,
    pub elevation_deg: f64,
}

/// A rendered image as the backend returned it.
///
/// `content_type` is reported verbatim; the submit handler enforces the
/// PNG contract so that mocks exercise the same check as real backends.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A backend that turns viewing angles into an image.
///
/// Implementations perform exactly one attempt per call; retry policy, if
/// any, belongs to the caller.
pub trait Renderer: Send + Sync {
    fn render(&self, params: RenderParams) -> Result<RenderedImage>;
}

/// HTTP implementation of [`Renderer`].
///
/// Uses a blocking client; async callers should wrap `render` in
/// `tokio::task::spawn_blocking`.
pub struct HttpRenderer {
    client: Client,
    base_url: String,
}

impl HttpRenderer {
    /// Build a renderer for the given backend base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(RENDER_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Renderer for HttpRenderer {
    fn render(&self, params: RenderParams) -> Result<RenderedImage> {
        let url = format!("{}/render", self.base_url);
        log::debug!("rendering {params:?} via {url}");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .map_err(|e| Error::Transport(format!("failed to read backend response: {e}")))?;

        Ok(RenderedImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Whether a `Content-Type` header value declares a PNG image.
/// Parameters after `;` are ignored, comparison is case-insensitive.
pub fn is_png(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case(PNG_CONTENT_TYPE)
}
