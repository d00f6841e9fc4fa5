//! End-to-end tests: `HttpRenderer` talking to a mock backend over real HTTP.

use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::Duration;

use renderview::renderer::{HttpRenderer, RenderParams, Renderer};
use renderview::{Error, ImageStore};

struct ReceivedRequest {
    method: String,
    url: String,
    body: String,
}

/// Start a one-shot mock render backend and report what it receives.
fn start_backend(
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, mpsc::Receiver<ReceivedRequest>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        while let Ok(mut request) = server.recv() {
            let mut payload = String::new();
            let _ = request.as_reader().read_to_string(&mut payload);
            let _ = tx.send(ReceivedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body: payload,
            });

            let response = tiny_http::Response::from_data(body.clone())
                .with_status_code(status)
                .with_header(
                    format!("Content-Type: {content_type}")
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (format!("http://{}", addr), rx)
}

/// An address nothing listens on.
fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn angles() -> RenderParams {
    RenderParams {
        azimuth_deg: 45.0,
        polar_deg: 60.0,
        elevation_deg: 30.0,
    }
}

#[test]
fn http_renderer_posts_angles_and_receives_png() {
    let payload = vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let (base, rx) = start_backend(200, "image/png", payload.clone());

    let renderer = HttpRenderer::new(&base).unwrap();
    let image = renderer.render(angles()).expect("render should succeed");
    assert_eq!(image.bytes, payload);
    assert_eq!(image.content_type, "image/png");

    let seen = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/render");

    let json: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(json["azimuth_deg"], 45.0);
    assert_eq!(json["polar_deg"], 60.0);
    assert_eq!(json["elevation_deg"], 30.0);
}

#[test]
fn http_renderer_tolerates_trailing_slash_in_base_url() {
    let (base, rx) = start_backend(200, "image/png", b"png".to_vec());

    let renderer = HttpRenderer::new(&format!("{base}/")).unwrap();
    renderer.render(angles()).expect("render should succeed");

    let seen = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(seen.url, "/render");
}

#[test]
fn http_renderer_reports_declared_content_type_verbatim() {
    let (base, _rx) = start_backend(200, "text/plain; charset=utf-8", b"oops".to_vec());

    let renderer = HttpRenderer::new(&base).unwrap();
    let image = renderer.render(angles()).expect("render should succeed");
    assert_eq!(image.content_type, "text/plain; charset=utf-8");
    assert!(!renderview::renderer::is_png(&image.content_type));
}

#[test]
fn http_renderer_maps_error_status_to_transport_error() {
    let (base, _rx) = start_backend(500, "text/plain", b"backend exploded".to_vec());

    let renderer = HttpRenderer::new(&base).unwrap();
    let err = renderer.render(angles()).unwrap_err();
    match err {
        Error::Transport(message) => assert!(message.contains("500"), "message: {message}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn http_renderer_surfaces_connection_errors() {
    let renderer = HttpRenderer::new(&unused_address()).unwrap();
    let err = renderer.render(angles()).unwrap_err();
    match err {
        Error::Transport(message) => assert!(!message.is_empty()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

/// The whole path at once: form submission through the router, a real HTTP
/// hop to the mock backend, and the staged image fetched back by reference.
#[tokio::test(flavor = "multi_thread")]
async fn full_flow_stages_and_serves_backend_bytes() {
    use axum::body::Body;
    use http::header::CONTENT_TYPE;
    use http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use renderview::{app, AppState};

    let payload = vec![9u8, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    let (base, _rx) = start_backend(200, "image/png", payload.clone());

    // `HttpRenderer` holds a blocking reqwest client, which must not be
    // constructed on an async worker thread.
    let renderer = tokio::task::spawn_blocking(move || HttpRenderer::new(&base))
        .await
        .unwrap()
        .unwrap();
    let renderer = Arc::new(renderer);
    let state = AppState::new(Some(renderer), ImageStore::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/render")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("azimuth_deg=45.0&polar_deg=60.0&elevation_deg=30.0"))
        .unwrap();
    let response = app(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();

    let start = html.find("<img src=\"").expect("image reference") + "<img src=\"".len();
    let end = html[start..].find('"').unwrap() + start;
    let url = &html[start..end];

    let request = Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(Body::empty())
        .unwrap();
    let image = app(state).oneshot(request).await.unwrap();
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.headers().get(CONTENT_TYPE).unwrap(), "image/png");

    let bytes = image.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), payload.as_slice());
}
