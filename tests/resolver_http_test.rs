//! Remote stylesheet embedding over HTTP.

use mailforge::{BuildConfig, BuildError, Source, inline_css};

#[tokio::test]
async fn remote_stylesheets_are_fetched_and_inlined() {
    let mut server = mockito::Server::new_async().await;
    let stylesheet = server
        .mock("GET", "/assets/style.css")
        .with_status(200)
        .with_header("content-type", "text/css")
        .with_body("p { color: purple; }")
        .create_async()
        .await;

    let html = "<html><head><link rel=\"stylesheet\" href=\"assets/style.css\"></head>\
                <body><p>Hello</p></body></html>";
    let config = BuildConfig::builder()
        .relative_path(format!("{}/", server.url()))
        .build();

    let out = String::from_utf8(inline_css(&Source::html(html), &config).await.unwrap()).unwrap();

    stylesheet.assert_async().await;
    assert!(out.contains("color: purple"), "remote rule must be inlined: {out}");
    assert!(!out.contains("<link"));
}

#[tokio::test]
async fn absolute_stylesheet_urls_bypass_the_base() {
    let mut server = mockito::Server::new_async().await;
    let stylesheet = server
        .mock("GET", "/shared.css")
        .with_status(200)
        .with_body("td { color: teal; }")
        .create_async()
        .await;

    let html = format!(
        "<html><head><link rel=\"stylesheet\" href=\"{}/shared.css\"></head>\
         <body><table><tr><td>x</td></tr></table></body></html>",
        server.url()
    );
    // A filesystem base: the absolute URL must not be resolved against it.
    let dir = tempfile::tempdir().unwrap();
    let config = BuildConfig::builder().relative_dir(dir.path()).build();

    let out = String::from_utf8(
        inline_css(&Source::html(html), &config).await.unwrap(),
    )
    .unwrap();

    stylesheet.assert_async().await;
    assert!(out.contains("color: teal"));
}

#[tokio::test]
async fn http_error_status_is_a_resolution_error() {
    let mut server = mockito::Server::new_async().await;
    let _gone = server
        .mock("GET", "/gone.css")
        .with_status(404)
        .create_async()
        .await;

    let html = "<html><head><link rel=\"stylesheet\" href=\"gone.css\"></head><body></body></html>";
    let config = BuildConfig::builder()
        .relative_path(format!("{}/", server.url()))
        .build();

    let err = inline_css(&Source::html(html), &config).await.unwrap_err();
    assert!(matches!(err, BuildError::Resolution { .. }));
}
