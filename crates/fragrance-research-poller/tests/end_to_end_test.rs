/*
[INPUT]:  Mock research service behind a real proxy, real HTTP client
[OUTPUT]: Full poller -> proxy -> service round trips on a short interval
[POS]:    Integration tests - whole request path
[UPDATE]: When the proxy surface or poller lifecycle changes
*/

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fragrance_research_adapter::{ClientConfig, ResearchClient, UNAVAILABLE_MESSAGE};
use fragrance_research_poller::{PollerOptions, PollerPhase, TaskPoller, TaskSnapshot};
use fragrance_research_proxy::{TaskProxy, serve_on};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(10);

async fn spawn_proxy(upstream: &str) -> (SocketAddr, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let proxy = TaskProxy::new(Url::parse(upstream).expect("upstream url"), &ClientConfig::default())
        .expect("proxy");
    let shutdown = CancellationToken::new();
    tokio::spawn(serve_on(listener, proxy, shutdown.clone()));
    (addr, shutdown)
}

fn poller_for(addr: SocketAddr) -> TaskPoller {
    let client = ResearchClient::with_config_and_base_url(
        ClientConfig::default(),
        &format!("http://{addr}"),
    )
    .expect("client");
    TaskPoller::with_options(
        Arc::new(client),
        PollerOptions {
            poll_interval: Duration::from_millis(50),
        },
    )
}

async fn wait_terminal(poller: &TaskPoller) -> TaskSnapshot {
    let mut rx = poller.subscribe();
    let snapshot = tokio::time::timeout(WAIT, rx.wait_for(|s| s.phase.is_terminal()))
        .await
        .expect("terminal state in time")
        .expect("poller alive")
        .clone();
    snapshot
}

#[tokio::test]
async fn test_research_completes_through_proxy() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "abc123",
            "status": "pending",
            "message": "Research task started",
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/research/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "abc123",
            "status": "searching",
            "progress": 40,
            "message": "Searching the web...",
        })))
        .up_to_n_times(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/research/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "abc123",
            "status": "completed",
            "progress": 100,
            "message": "Research complete",
            "recommendations": [
                {"name": "Santal 33", "brand": "Le Labo", "notes": "sandalwood, cardamom"},
                {"Name": "Baccarat Rouge 540", "reasoning": "amber and saffron"}
            ],
        })))
        .mount(&upstream)
        .await;

    let (addr, shutdown) = spawn_proxy(&upstream.uri()).await;
    let poller = poller_for(addr);

    let task_id = assert_ok!(poller.start(vec!["sandalwood".into()], "warm").await);
    assert_eq!(task_id, "abc123");

    let done = wait_terminal(&poller).await;
    assert_eq!(done.phase, PollerPhase::Completed);
    assert_eq!(done.progress, 100);
    let names: Vec<_> = done.recommendations.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Santal 33", "Baccarat Rouge 540"]);

    shutdown.cancel();
}

#[tokio::test]
async fn test_unreachable_service_fails_through_proxy() {
    let (addr, shutdown) = spawn_proxy("http://127.0.0.1:1").await;
    let poller = poller_for(addr);

    let err = poller
        .start(vec!["rose".into()], "")
        .await
        .expect_err("start must fail");

    assert!(err.is_unavailable());
    let snapshot = poller.snapshot();
    assert_eq!(snapshot.phase, PollerPhase::Failed);
    assert_eq!(snapshot.error.as_deref(), Some(UNAVAILABLE_MESSAGE));

    shutdown.cancel();
}

#[tokio::test]
async fn test_cancel_reaches_service_through_proxy() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc123"})))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/research/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "analyzing",
            "progress": 70,
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/research/cancel/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Task cancelled"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (addr, shutdown) = spawn_proxy(&upstream.uri()).await;
    let poller = poller_for(addr);
    poller.start(vec!["oud".into()], "").await.expect("start accepted");

    let mut rx = poller.subscribe();
    tokio::time::timeout(WAIT, rx.wait_for(|s| s.progress == 70))
        .await
        .expect("first poll in time")
        .expect("poller alive");

    let remote = poller.cancel().expect("remote cancel spawned");
    assert_eq!(poller.snapshot().phase, PollerPhase::Cancelled);
    remote.await.expect("remote cancel task");

    assert!(!poller.has_active_timer());
    shutdown.cancel();
}

#[tokio::test]
async fn test_irregular_completed_payload_still_completes() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/research/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc123"})))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/research/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": null,
            "message": null,
            "recommendations": [{"brand": "Y"}],
        })))
        .mount(&upstream)
        .await;

    let (addr, shutdown) = spawn_proxy(&upstream.uri()).await;
    let poller = poller_for(addr);
    assert_ok!(poller.start(vec!["iris".into()], "").await);

    let done = wait_terminal(&poller).await;
    assert_eq!(done.phase, PollerPhase::Completed);
    assert_eq!(done.recommendations.len(), 1);
    assert_eq!(done.recommendations[0].brand.as_deref(), Some("Y"));
    assert!(!poller.has_active_timer());

    shutdown.cancel();
}
