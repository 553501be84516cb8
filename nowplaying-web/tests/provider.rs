use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use nowplaying::{Parser, VolumePolicy};
use nowplaying_web::{Error, Provider};
use std::convert::Infallible;
use std::net::SocketAddr;

const TOKEN: &str = "test-token";

const PLAYING: &str = r#"{
    "is_playing": true,
    "progress_ms": 1200,
    "device": {"id": "abc", "name": "Kitchen", "volume_percent": 150},
    "item": {
        "name": "Song A",
        "artists": [{"name": "Artist X"}, {"name": "Artist W"}],
        "album": {"name": "Album Y", "images": [{"url": "http://img/1"}]}
    }
}"#;

/// Serves `body` with `status` on the player path to requests carrying the
/// test token, 401 to anything else.
async fn serve(status: StatusCode, body: &'static str) -> String {
    let make_svc = make_service_fn(move |_conn| async move {
        Ok::<_, Infallible>(service_fn(move |req: Request<Body>| async move {
            let authorized = req
                .headers()
                .get("Authorization")
                .is_some_and(|v| v.as_bytes() == format!("Bearer {}", TOKEN).as_bytes());
            let resp = if !authorized {
                Response::builder()
                    .status(StatusCode::UNAUTHORIZED)
                    .body(Body::empty())
            } else if req.uri().path() != "/v1/me/player" {
                Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Body::empty())
            } else {
                Response::builder().status(status).body(Body::from(body))
            };
            Ok::<_, Infallible>(resp.expect("response builder should work"))
        }))
    });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{}", addr)
}

#[tokio::test]
async fn playing_snapshot_is_parsed() {
    let base = serve(StatusCode::OK, PLAYING).await;
    let provider = Provider::new(&base, TOKEN.to_owned(), Parser::default()).unwrap();
    let snapshot = provider.currently_playing().await.unwrap().unwrap();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.item.name, "Song A");
    assert_eq!(snapshot.item.credited_artists(), "Artist X, Artist W");
    assert_eq!(snapshot.item.album.cover_url(), Some("http://img/1"));
    assert_eq!(snapshot.volume_percent(), Some(100));
}

#[tokio::test]
async fn reject_policy_surfaces_volume_error() {
    let base = serve(StatusCode::OK, PLAYING).await;
    let provider =
        Provider::new(&base, TOKEN.to_owned(), Parser::new(VolumePolicy::Reject)).unwrap();
    assert!(matches!(
        provider.currently_playing().await,
        Err(Error::SnapshotError(nowplaying::Error::VolumeOutOfRange(_)))
    ));
}

#[tokio::test]
async fn no_content_means_nothing_playing() {
    let base = serve(StatusCode::NO_CONTENT, "").await;
    let provider = Provider::new(&base, TOKEN.to_owned(), Parser::default()).unwrap();
    assert_eq!(provider.currently_playing().await.unwrap(), None);
}

#[tokio::test]
async fn unexpected_status_is_an_error() {
    let base = serve(StatusCode::OK, PLAYING).await;
    let provider = Provider::new(&base, "expired".to_owned(), Parser::default()).unwrap();
    assert!(matches!(
        provider.currently_playing().await,
        Err(Error::Status(StatusCode::UNAUTHORIZED))
    ));
}

#[tokio::test]
async fn malformed_body_is_a_shape_mismatch() {
    let base = serve(StatusCode::OK, r#"{"is_playing": "yes", "item": null}"#).await;
    let provider = Provider::new(&base, TOKEN.to_owned(), Parser::default()).unwrap();
    assert!(matches!(
        provider.currently_playing().await,
        Err(Error::SnapshotError(nowplaying::Error::ShapeMismatch(_)))
    ));
}
