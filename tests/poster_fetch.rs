use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use course_post_backend::config::CoverConfig;
use course_post_backend::error::PosterFetchError;
use course_post_backend::features::cover::{PosterFetcher, PosterImage, layout::Size};
use course_post_backend::http;

const BODY: &[u8] = b"0123456789abcdef0123456789abcdef";

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/bytes", get(|| async { BODY.to_vec() }))
        .route("/gone", get(|| async { StatusCode::GONE }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                BODY.to_vec()
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn fetcher(timeout: Duration, max_bytes: u64) -> PosterFetcher {
    PosterFetcher::with_client(http::client_with_timeout(timeout).expect("client"), max_bytes)
}

#[tokio::test]
async fn fetches_whole_body() {
    let addr = start_server().await;
    let bytes = fetcher(Duration::from_secs(5), 1024)
        .fetch_bytes(&format!("http://{addr}/bytes"))
        .await
        .expect("fetch");
    assert_eq!(bytes, BODY);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let addr = start_server().await;
    let err = fetcher(Duration::from_secs(5), 1024)
        .fetch_bytes(&format!("http://{addr}/gone"))
        .await
        .expect_err("410");
    assert!(matches!(err, PosterFetchError::Status(410)), "{err:?}");
}

#[tokio::test]
async fn slow_host_times_out() {
    let addr = start_server().await;
    let err = fetcher(Duration::from_millis(150), 1024)
        .fetch_bytes(&format!("http://{addr}/slow"))
        .await
        .expect_err("timeout");
    assert!(matches!(err, PosterFetchError::Timeout), "{err:?}");
}

#[tokio::test]
async fn body_over_limit_is_rejected() {
    let addr = start_server().await;
    let err = fetcher(Duration::from_secs(5), 8)
        .fetch_bytes(&format!("http://{addr}/bytes"))
        .await
        .expect_err("too large");
    assert!(matches!(err, PosterFetchError::TooLarge(8)), "{err:?}");
}

#[tokio::test]
async fn garbage_body_resolves_to_placeholder() {
    let addr = start_server().await;
    let url = format!("http://{addr}/bytes");
    let fetched = fetcher(Duration::from_secs(5), 1024).fetch_bytes(&url).await;

    let poster = course_post_backend::features::cover::resolve_poster(
        &url,
        fetched,
        &CoverConfig::default(),
    );
    assert!(poster.is_placeholder());
    assert_eq!(poster.size(), Size::new(1200, 900));
}

#[test]
fn decode_reports_bad_bytes() {
    match PosterImage::decode(b"definitely not a jpeg") {
        Err(PosterFetchError::Decode(_)) => {}
        Err(other) => panic!("unexpected {other:?}"),
        Ok(_) => panic!("decoded garbage"),
    }
}
