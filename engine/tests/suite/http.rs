//! End to end through the `reqwest` transport against a mock server.

use std::sync::Arc;

use tdnet_engine::{App, Collaborators, FixedConnectivity, ResolvedConfig, Target};
use tdnet_fetch::{HttpTransport, StandardDecoder};
use tokio::runtime::Handle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> App {
    let config = ResolvedConfig {
        text_url: format!("{}/data/2.5/weather?q=Rome", server.uri()),
        image_url: format!("{}/img/w/10d.png", server.uri()),
        ..ResolvedConfig::default()
    };
    let collaborators = Collaborators {
        transport: Arc::new(HttpTransport::new(&config).unwrap()),
        decoder: Arc::new(StandardDecoder),
        connectivity: Arc::new(FixedConnectivity::new(true)),
    };
    App::new(config, Handle::current(), collaborators)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn weather_text_reaches_the_display() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"weather":"clear"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.fetch_text().unwrap();
    assert!(app.next_delivery().await);

    assert_eq!(app.state().text(), r#"{"weather":"clear"}"#);
    assert!(!app.is_running(Target::Text));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_error_clears_the_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/w/10d.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.fetch_image().unwrap();
    assert!(app.next_delivery().await);

    assert!(app.state().image().is_none());
    assert_eq!(app.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_ends_async_delivery() {
    let server = MockServer::start().await;
    let mut app = app_for(&server);
    app.sender().request_shutdown();
    assert!(!app.next_delivery().await);
    assert!(app.is_shutdown());
}
