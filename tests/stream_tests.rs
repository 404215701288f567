//! Status feed driving the effective view end to end.

mod support;

use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use modelfleet::adapter::outbound::stream::StatusFeed;
use modelfleet::domain::HostStatus;
use modelfleet::testkit::config::reconnection;
use modelfleet::testkit::domain::host;
use modelfleet::testkit::source::ScriptedSource;

use support::fleet::Fleet;

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..300 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn pushed_snapshot_overrides_polled_status() {
    let fleet = Fleet::new(
        ScriptedSource::new()
            .with_host(host("h1").with_status(HostStatus::Offline), vec![])
            .with_host(host("h2").with_status(HostStatus::Online), vec![]),
    );
    fleet.reconciler.refresh().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (release, released) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(
            r#"{"type":"snapshot","hosts":[{"hostId":"h1","status":"online"},{"hostId":"h2","status":"degraded","memory":{"used":1,"total":4}}]}"#.into(),
        ))
        .await
        .unwrap();
        let _ = released.await;
        ws.close(None).await.ok();
    });

    let feed =
        StatusFeed::new(format!("ws://{addr}"), fleet.overlay.clone(), reconnection()).spawn();

    let reconciler = fleet.reconciler.clone();
    wait_for(|| {
        reconciler
            .effective_view()
            .host("h2")
            .is_some_and(|h| h.status == HostStatus::Degraded)
    })
    .await;
    assert!(fleet.overlay.is_connected());

    let view = fleet.reconciler.effective_view();
    assert_eq!(view.host("h1").unwrap().status, HostStatus::Online);
    assert!(view.host("h2").unwrap().memory.is_some());
    // Polled data is still the canonical source.
    assert_eq!(fleet.reconciler.snapshot()[0].status, HostStatus::Offline);

    release.send(()).unwrap();
    server.await.unwrap();
    wait_for(|| !fleet.overlay.is_connected()).await;

    // Overlay entries outlive the connection.
    assert_eq!(
        fleet.reconciler.effective_view().host("h1").unwrap().status,
        HostStatus::Online
    );
    feed.shutdown().await;
}

#[tokio::test]
async fn feed_reconnects_after_connection_loss() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        // First session drops immediately; second one pushes an update.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.close(None).await.ok();
        drop(ws);

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(
            r#"{"type":"host_status","host_id":"h1","status":"offline"}"#.into(),
        ))
        .await
        .unwrap();
        sleep(Duration::from_secs(5)).await;
    });

    let fleet = Fleet::new(ScriptedSource::new().with_host(host("h1"), vec![]));
    fleet.reconciler.refresh().await;
    let feed =
        StatusFeed::new(format!("ws://{addr}"), fleet.overlay.clone(), reconnection()).spawn();

    let reconciler = fleet.reconciler.clone();
    wait_for(|| {
        reconciler
            .effective_view()
            .host("h1")
            .is_some_and(|h| h.status == HostStatus::Offline)
    })
    .await;
    assert!(fleet.overlay.is_connected());

    feed.shutdown().await;
    server.abort();
}
