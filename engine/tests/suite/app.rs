//! Trigger-to-display behavior of `App` with scripted collaborators.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tdnet_engine::{FetchError, FixedConnectivity, Notification, Target};

use crate::common::{IMAGE_URL, ScriptedTransport, TEXT_URL, app, drain_until, runtime};

#[test]
fn text_fetch_shows_the_body() {
    let rt = runtime();
    let transport =
        Arc::new(ScriptedTransport::new().respond(TEXT_URL, Ok(br#"{"weather":"clear"}"#.to_vec())));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    let task = app.fetch_text().unwrap();
    assert!(task.is_some());
    assert!(app.is_running(Target::Text));

    drain_until(&mut app, |a| a.in_flight() == 0);
    assert_eq!(app.state().text(), r#"{"weather":"clear"}"#);
    assert!(app.pop_notification().is_none());
}

#[test]
fn long_text_is_cut_to_the_character_cap() {
    let rt = runtime();
    let body = "a".repeat(5000).into_bytes();
    let transport = Arc::new(ScriptedTransport::new().respond(TEXT_URL, Ok(body)));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    app.fetch_text().unwrap();
    drain_until(&mut app, |a| a.in_flight() == 0);

    assert_eq!(app.state().text().chars().count(), 1000);
}

#[test]
fn image_fetch_stores_the_decoded_bitmap() {
    let rt = runtime();
    let transport = Arc::new(ScriptedTransport::new().respond(IMAGE_URL, Ok(vec![1, 2, 3])));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    app.fetch_image().unwrap();
    drain_until(&mut app, |a| a.in_flight() == 0);

    let image = app.state().image().unwrap();
    assert_eq!((image.width(), image.height()), (3, 1));
    assert_eq!(app.state().text(), "");
}

#[test]
fn offline_trigger_clears_notifies_and_starts_nothing() {
    let rt = runtime();
    let transport = Arc::new(ScriptedTransport::new().respond(TEXT_URL, Ok(b"first".to_vec())));
    let gate = Arc::new(FixedConnectivity::new(true));
    let mut app = app(&rt, transport.clone(), gate.clone());

    app.fetch_text().unwrap();
    drain_until(&mut app, |a| a.in_flight() == 0);
    assert_eq!(app.state().text(), "first");
    assert_eq!(transport.calls(), 1);

    gate.set_online(false);
    assert_eq!(app.fetch_text(), Err(FetchError::NetworkUnavailable));
    assert_eq!(app.state().text(), "");
    assert_eq!(
        app.pop_notification(),
        Some(Notification::NetworkUnavailable {
            target: Target::Text
        })
    );

    thread::sleep(Duration::from_millis(50));
    assert_eq!(app.process_deliveries(), 0);
    assert_eq!(transport.calls(), 1);
    assert_eq!(app.in_flight(), 0);
}

#[test]
fn failure_yields_one_error_and_an_empty_field() {
    let rt = runtime();
    let transport = Arc::new(ScriptedTransport::new().respond(
        TEXT_URL,
        Err(FetchError::ConnectFailure {
            url: TEXT_URL.to_string(),
            reason: "connection refused".to_string(),
        }),
    ));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    app.fetch_text().unwrap();
    let applied = drain_until(&mut app, |a| a.in_flight() == 0);
    assert_eq!(applied, 1);
    assert_eq!(app.state().text(), "");

    thread::sleep(Duration::from_millis(50));
    assert_eq!(app.process_deliveries(), 0);
}

#[test]
fn decode_failure_leaves_the_image_empty() {
    let rt = runtime();
    let transport = Arc::new(ScriptedTransport::new().respond(IMAGE_URL, Ok(Vec::new())));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    app.fetch_image().unwrap();
    drain_until(&mut app, |a| a.in_flight() == 0);
    assert!(app.state().image().is_none());
}

#[test]
fn concurrent_fetches_land_in_their_own_fields() {
    let rt = runtime();
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(TEXT_URL, Ok(b"sunny".to_vec()))
            .respond(IMAGE_URL, Ok(vec![7; 16])),
    );
    let mut app = app(&rt, transport.clone(), Arc::new(FixedConnectivity::new(true)));

    for _ in 0..2000 {
        app.fetch_text().unwrap();
        app.fetch_image().unwrap();
        assert_eq!(app.state().text(), "");
        assert!(app.state().image().is_none());

        drain_until(&mut app, |a| a.in_flight() == 0);
        assert_eq!(app.state().text(), "sunny");
        assert_eq!(app.state().image().map(|i| i.width()), Some(16));
    }
    assert_eq!(transport.calls(), 4000);
}

#[test]
fn drain_loop_applies_until_shutdown() {
    let rt = runtime();
    let transport = Arc::new(ScriptedTransport::new().respond(TEXT_URL, Ok(b"done".to_vec())));
    let mut app = app(&rt, transport, Arc::new(FixedConnectivity::new(true)));

    app.fetch_text().unwrap();
    let sender = app.sender();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        sender.request_shutdown();
    });

    let applied = app.run_until_shutdown();
    stopper.join().unwrap();

    assert_eq!(applied, 1);
    assert!(app.is_shutdown());
    assert_eq!(app.state().text(), "done");
}
