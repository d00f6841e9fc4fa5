//! Environment-derived configuration.
//!
//! Two settings: `RENDER_BACKEND_URL`, the base address of the external
//! render service (no default; unset or empty means "not configured"), and
//! `PORT`, the listening port (default 8080).

use crate::error::{Error, Result};

/// Listening port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration read from the process environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the render backend, trailing slash stripped.
    /// `None` when `RENDER_BACKEND_URL` is unset or empty.
    pub backend_url: Option<String>,
    /// TCP port the HTTP server listens on
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend_url: backend_url_from(std::env::var("RENDER_BACKEND_URL").ok().as_deref()),
            port: port_from(std::env::var("PORT").ok().as_deref())?,
        })
    }
}

fn backend_url_from(raw: Option<&str>) -> Option<String> {
    let url = raw?.trim().trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

fn port_from(raw: Option<&str>) -> Result<u16> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse()
            .map_err(|_| Error::Config(format!("PORT must be a TCP port number (got {value:?})"))),
    }
}
