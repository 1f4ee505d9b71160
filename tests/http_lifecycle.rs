use axum::{http::StatusCode, routing::post, Router};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use site_builder::{
    controller::NotificationSink,
    models::{Notification, Severity},
    service, GenerationController, GenerationError, GenerationService, HttpGenerationService,
    LifecycleState,
};
use std::sync::Arc;

#[derive(Default)]
struct RecordingSink(Mutex<Vec<Notification>>);

impl NotificationSink for RecordingSink {
    fn notify(&self, n: Notification) { self.0.lock().push(n); }
}

async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}/api/generate", addr)
}

async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}/api/generate", addr)
}

async fn run_once(url: String, description: &str) -> (LifecycleState, Vec<Notification>) {
    let sink = Arc::new(RecordingSink::default());
    let controller = GenerationController::new(Arc::new(HttpGenerationService::new(url)), sink.clone());
    controller.update_description(description);
    controller.submit();
    let state = controller.wait_settled().await;
    let notes = sink.0.lock().clone();
    (state, notes)
}

#[tokio::test]
async fn demo_service_round_trip_succeeds() {
    let url = spawn_app(service::router()).await;
    let (state, notes) = run_once(url, "Хочу интернет-магазин кроссовок").await;

    let result = state.result().expect("succeeded").clone();
    assert_eq!(result.template.name, "Интернет-магазин");
    assert_eq!(result.template.sections, vec!["Catalog", "Cart", "Checkout", "About"]);
    assert_eq!(result.components_count, 4);
    assert_eq!(result.status, "ready");
    assert!(result.request_id.is_some());

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Normal);
    assert!(notes[0].message.contains("Интернет-магазин"));
    assert!(notes[0].message.contains("45"));
}

#[tokio::test]
async fn service_side_validation_error_becomes_failed() {
    let url = spawn_app(service::router()).await;
    // non-empty for the controller, too short for the service
    let (state, notes) = run_once(url, "short").await;
    assert_eq!(state, LifecycleState::Failed);
    assert_eq!(notes, vec![Notification::generation_failed()]);
}

#[tokio::test]
async fn http_error_malformed_body_and_transport_failure_look_the_same() {
    let broken = Router::new().route("/api/generate", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let garbage = Router::new().route("/api/generate", post(|| async { "<html>not json</html>" }));
    let urls = vec![spawn_app(broken).await, spawn_app(garbage).await, closed_endpoint().await];

    for url in urls {
        let (state, notes) = run_once(url, "valid description").await;
        assert_eq!(state, LifecycleState::Failed);
        assert_eq!(notes, vec![Notification::generation_failed()]);
    }
}

#[tokio::test]
async fn http_client_keeps_failure_kinds_apart_for_logs() {
    let broken = Router::new().route("/api/generate", post(|| async { StatusCode::BAD_GATEWAY }));
    let garbage = Router::new().route("/api/generate", post(|| async { "{\"template\": 1}" }));
    let request = site_builder::models::GenerationRequest::new("valid description");

    let err = HttpGenerationService::new(spawn_app(broken).await).generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerationError::Status { status, .. } if status == StatusCode::BAD_GATEWAY));

    let err = HttpGenerationService::new(spawn_app(garbage).await).generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerationError::Decode(_)));

    let err = HttpGenerationService::new(closed_endpoint().await).generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn settled_state_and_its_notification_arrive_together() {
    let broken = Router::new().route("/api/generate", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let url = spawn_app(broken).await;

    for _ in 0..50 {
        let (sink, mut rx) = site_builder::controller::ChannelSink::new();
        let controller = GenerationController::new(Arc::new(HttpGenerationService::new(url.clone())), Arc::new(sink));
        controller.update_description("valid description");
        controller.submit();

        assert_eq!(controller.wait_settled().await, LifecycleState::Failed);
        assert_eq!(rx.try_recv().ok(), Some(Notification::generation_failed()));
        assert!(rx.try_recv().is_err());
    }
}
