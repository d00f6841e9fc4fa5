use std::sync::Arc;

use anyhow::Context;

use renderview::renderer::HttpRenderer;
use renderview::{app, AppState, Config, ImageStore, Renderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env().context("invalid configuration")?;

    let renderer: Option<Arc<dyn Renderer>> = match &config.backend_url {
        Some(url) => {
            log::info!("render backend: {url}");
            Some(Arc::new(HttpRenderer::new(url)?))
        }
        None => {
            log::warn!("RENDER_BACKEND_URL is not set; render submissions will fail until it is");
            None
        }
    };

    let state = AppState::new(renderer, ImageStore::new());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("listening on http://{addr}");

    axum::serve(listener, app(state))
        .await
        .context("server error")?;
    Ok(())
}
