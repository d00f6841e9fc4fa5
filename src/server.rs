//! HTTP surface: the landing page, the render submission, and the staged
//! image fetch.
//!
//! The router owns no global state; everything the handlers need is injected
//! through [`AppState`] so tests can swap in a mock renderer and a fresh
//! store per case.

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use http::header::CONTENT_TYPE;
use http::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::renderer::{self, RenderParams, Renderer};
use crate::store::{ImageStore, StagedImage};
use crate::view::Page;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// `None` when the backend address is not configured; submissions then
    /// fail with a server-configuration error without any outbound call.
    pub renderer: Option<Arc<dyn Renderer>>,
    pub store: ImageStore,
}

impl AppState {
    pub fn new(renderer: Option<Arc<dyn Renderer>>, store: ImageStore) -> Self {
        Self { renderer, store }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/render", post(render))
        .route("/image/{id}", get(image))
        .with_state(state)
}

/// Raw form fields as submitted. Missing fields fall back to empty strings
/// so they can be echoed and rejected by validation rather than by the
/// extractor.
#[derive(Debug, Deserialize)]
struct RenderForm {
    #[serde(default)]
    azimuth_deg: String,
    #[serde(default)]
    polar_deg: String,
    #[serde(default)]
    elevation_deg: String,
}

async fn index() -> Html<String> {
    Html(Page::defaults().render())
}

async fn render(State(state): State<AppState>, Form(form): Form<RenderForm>) -> Response {
    // An unconfigured backend short-circuits everything, even invalid input.
    let Some(renderer) = state.renderer.clone() else {
        let err = Error::Config("RENDER_BACKEND_URL is not set on the server".to_string());
        log::error!("{err}");
        let page = Page::echoing_raw(&form.azimuth_deg, &form.polar_deg, &form.elevation_deg)
            .with_error(err.to_string());
        return page_response(err.status(), page);
    };

    // Validate before the backend call; malformed input never leaves the process.
    let params = match parse_params(&form) {
        Ok(params) => params,
        Err(err) => {
            log::warn!("rejected render submission: {err}");
            let page = Page::echoing_raw(&form.azimuth_deg, &form.polar_deg, &form.elevation_deg)
                .with_error(err.to_string());
            return page_response(err.status(), page);
        }
    };

    // The backend call can block for minutes; keep it off the async workers.
    let rendered = tokio::task::spawn_blocking(move || renderer.render(params)).await;
    let image = match rendered {
        Ok(Ok(image)) => image,
        Ok(Err(err)) => {
            log::warn!("render failed for {params:?}: {err}");
            return page_response(err.status(), Page::echoing(params).with_error(err.to_string()));
        }
        Err(join_err) => {
            let err = Error::Transport(format!("render task failed: {join_err}"));
            log::error!("{err}");
            return page_response(err.status(), Page::echoing(params).with_error(err.to_string()));
        }
    };

    if !renderer::is_png(&image.content_type) {
        let err = Error::BadContentType(image.content_type);
        log::warn!("render failed for {params:?}: {err}");
        return page_response(err.status(), Page::echoing(params).with_error(err.to_string()));
    }

    let id = state.store.stage(StagedImage {
        content_type: image.content_type,
        bytes: image.bytes,
    });
    log::info!("staged image {id} for {params:?}");

    page_response(
        StatusCode::OK,
        Page::echoing(params).with_image(format!("/image/{id}")),
    )
}

async fn image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get(&id) {
        Some(staged) => ([(CONTENT_TYPE, staged.content_type)], staged.bytes).into_response(),
        None => {
            log::debug!("{}", Error::NotFound(id));
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn page_response(status: StatusCode, page: Page) -> Response {
    (status, Html(page.render())).into_response()
}

fn parse_params(form: &RenderForm) -> Result<RenderParams> {
    Ok(RenderParams {
        azimuth_deg: parse_degrees("azimuth_deg", &form.azimuth_deg)?,
        polar_deg: parse_degrees("polar_deg", &form.polar_deg)?,
        elevation_deg: parse_degrees("elevation_deg", &form.elevation_deg)?,
    })
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{field} must be numeric degrees (got {raw:?})")))?;
    if !value.is_finite() {
        return Err(Error::Validation(format!(
            "{field} must be a finite number (got {raw:?})"
        )));
    }
    Ok(value)
}
