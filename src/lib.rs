//! renderview
//!
//! A minimal web front end for a remote image-rendering service. It serves a
//! form for three viewing angles (azimuth, polar, elevation — all degrees),
//! forwards a submission to the render backend over HTTP, stages the returned
//! PNG under a fresh unguessable identifier, and serves it back to the
//! browser from an in-memory store.
//!
//! The backend itself is opaque: `POST {RENDER_BACKEND_URL}/render` with a
//! JSON body of the three angles is expected to answer with `image/png`
//! bytes.
//!
//! # Example
//!
//! ```no_run
//! use renderview::{app, AppState, ImageStore};
//! use renderview::renderer::HttpRenderer;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = Arc::new(HttpRenderer::new("https://renderer.example.com")?);
//! let state = AppState::new(Some(renderer), ImageStore::new());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod renderer;
pub mod server;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use renderer::{RenderParams, RenderedImage, Renderer};
pub use server::{app, AppState};
pub use store::{ImageStore, StagedImage};
