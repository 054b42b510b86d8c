// tests/common/mod.rs
// =============================================================================
// In-process fixture site for the end-to-end crawl tests.
//
// Topology:
//   /          -> links to /, /about, /images, /secret and an external URL
//   /about     -> links home
//   /images    -> links to /square and /rectangle
//   /secret    -> 308 redirect to /hidden
//   /hidden    -> links to itself via the relative query "?t=0"
//   /picsum    -> 307 redirect to an external host
//   /slow      -> serves the front page after a one second delay
// =============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use url::Url;

const INDEX: &str = r#"<html>
<head><title>webmap example</title></head>
<body>
  <a href="/">Home</a>
  <a href="/about">About</a>
  <a href="/images">Images</a>
  <a href="/secret">Secret</a>
  <a href="https://picsum.photos/600">Random photo</a>
</body>
</html>"#;

const ABOUT: &str = r#"<html>
<body>
  <h1>About</h1>
  <a href="/">Home</a>
</body>
</html>"#;

const IMAGES: &str = r#"<html>
<body>
  <a href="/">Home</a>
  <a href="/square">Square</a>
  <a href="/rectangle">Rectangle</a>
</body>
</html>"#;

const SQUARE: &str = r#"<html>
<body>
  <img src="/square.png" alt="a square">
  <a href="/images">Back to images</a>
</body>
</html>"#;

const RECTANGLE: &str = r#"<html>
<body>
  <img src="/rectangle.png" alt="a rectangle">
  <a href="/images">Back to images</a>
</body>
</html>"#;

const HIDDEN: &str = r#"<html>
<body>
  <p>You found the hidden page.</p>
  <a href="?t=0">Reload</a>
  <a href="/">Home</a>
</body>
</html>"#;

/// Starts the fixture site on an ephemeral port and returns its address.
/// The serving task runs until the test process exits.
pub async fn serve_site() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { Html(INDEX) }))
        .route("/about", get(|| async { Html(ABOUT) }))
        .route("/images", get(|| async { Html(IMAGES) }))
        .route("/square", get(|| async { Html(SQUARE) }))
        .route("/rectangle", get(|| async { Html(RECTANGLE) }))
        .route("/hidden", get(|| async { Html(HIDDEN) }))
        .route("/secret", get(|| async { Redirect::permanent("/hidden") }))
        .route(
            "/picsum",
            get(|| async { Redirect::temporary("https://picsum.photos/600") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Html(INDEX)
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });

    addr
}

/// Returns an address that nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway listener address");
    drop(listener);
    addr
}

/// Resolves the expected site map paths against the fixture root and
/// renders them the way SiteMap::write_map does: one URL per line, with
/// a trailing newline.
pub fn expected_map(addr: SocketAddr, paths: &[&str]) -> String {
    let root = Url::parse(&format!("http://{addr}")).expect("fixture root url");

    let mut out = String::new();
    for path in paths {
        out.push_str(root.join(path).expect("expected path").as_str());
        out.push('\n');
    }
    out
}
