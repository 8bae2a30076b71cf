//! HTTP routes and CORS wiring.

use crate::state::AppState;
use crate::ws;
use atma::core::ProcessRequest;
use atma::errors::AtmaError;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

/// Builds the application router with CORS restricted to the allowed
/// origins (GET/POST only). An empty origin list leaves cross-origin
/// access disabled.
pub fn router(state: AppState, allowed_origins: &[String]) -> anyhow::Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/api/process", post(process))
        .route("/api/status", get(current_status))
        .route("/ws", get(ws::viewer_ws))
        .layer(cors)
        .with_state(state))
}

/// `POST /api/process`: runs the full pipeline for one request.
///
/// Responds 200 once the email has been relayed, 400 on missing input
/// (before anything is broadcast), and 500 with a generic message on any
/// upstream failure; details stay in the log.
async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.pipeline.handle_request(request).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({ "message": "Process Complete", "run_id": report.run_id })),
        ),
        Err(AtmaError::Validation(err)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ),
        Err(err) => {
            error!(error = %err, "pipeline failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "System Failure" })),
            )
        }
    }
}

/// `GET /api/status`: the most recently broadcast status, for viewers
/// that connect mid-run.
async fn current_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": state.channel.current() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atma::core::PipelineStatus;
    use atma::events::{EventSink, StatusChannel};
    use atma::pipeline::{PipelineTiming, RequestPipeline};
    use atma::testing::{MockDeliveryClient, MockGenerationClient};
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    fn test_app(
        generation: Arc<MockGenerationClient>,
        delivery: Arc<MockDeliveryClient>,
    ) -> (Router, Arc<StatusChannel>) {
        let channel = Arc::new(StatusChannel::default());
        let sink: Arc<dyn EventSink> = channel.clone();
        let pipeline = Arc::new(RequestPipeline::new(
            generation,
            delivery,
            sink,
            PipelineTiming::immediate(),
        ));
        let state = AppState {
            pipeline,
            channel: channel.clone(),
        };
        let app = router(state, &["http://localhost:5173".to_string()]).unwrap();
        (app, channel)
    }

    async fn post_process(
        app: Router,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/process")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    async fn drain_statuses(
        rx: &mut broadcast::Receiver<atma::core::StatusEvent>,
        count: usize,
    ) -> Vec<PipelineStatus> {
        let mut statuses = Vec::with_capacity(count);
        for _ in 0..count {
            let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("timed out waiting for status event")
                .unwrap();
            statuses.push(event.status);
        }
        statuses
    }

    #[tokio::test]
    async fn test_process_complete() {
        let generation = Arc::new(MockGenerationClient::completing("Entropy is..."));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (app, channel) = test_app(generation, delivery.clone());
        let mut rx = channel.subscribe();

        let (status, body) =
            post_process(app, json!({ "prompt": "Explain entropy", "email": "a@b.com" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Process Complete");
        assert!(body["run_id"].is_string());

        let statuses = drain_statuses(&mut rx, 6).await;
        assert_eq!(
            statuses,
            vec![
                PipelineStatus::AiProcessing,
                PipelineStatus::AiTransfer,
                PipelineStatus::EmailProcessing,
                PipelineStatus::EmailTransfer,
                PipelineStatus::Success,
                PipelineStatus::Idle,
            ]
        );

        let sent = delivery.sent();
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].body, "Entropy is...");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_broadcast() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (app, channel) = test_app(generation.clone(), delivery.clone());
        let mut rx = channel.subscribe();

        let (status, body) = post_process(app, json!({ "prompt": "", "email": "a@b.com" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Prompt and email required");

        assert!(rx.try_recv().is_err());
        assert_eq!(generation.call_count(), 0);
        assert_eq!(delivery.call_count(), 0);
    }

    #[tokio::test]
    async fn test_absent_field_rejected_like_empty() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (app, _channel) = test_app(generation, delivery);

        let (status, body) = post_process(app, json!({ "email": "a@b.com" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Prompt and email required");
    }

    #[tokio::test]
    async fn test_generation_failure_is_a_system_failure() {
        let generation = Arc::new(MockGenerationClient::failing("quota exceeded"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (app, channel) = test_app(generation, delivery.clone());
        let mut rx = channel.subscribe();

        let (status, body) =
            post_process(app, json!({ "prompt": "Explain entropy", "email": "a@b.com" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "System Failure");

        let statuses = drain_statuses(&mut rx, 2).await;
        assert_eq!(
            statuses,
            vec![PipelineStatus::AiProcessing, PipelineStatus::Idle]
        );
        assert_eq!(delivery.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_a_system_failure() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::rejecting("bad token"));
        let (app, channel) = test_app(generation, delivery);
        let mut rx = channel.subscribe();

        let (status, body) =
            post_process(app, json!({ "prompt": "Explain entropy", "email": "a@b.com" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "System Failure");

        let statuses = drain_statuses(&mut rx, 4).await;
        assert_eq!(
            statuses,
            vec![
                PipelineStatus::AiProcessing,
                PipelineStatus::AiTransfer,
                PipelineStatus::EmailProcessing,
                PipelineStatus::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn test_status_endpoint_reports_current() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (app, _channel) = test_app(generation, delivery);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "idle");
    }

    #[tokio::test]
    async fn test_invalid_origin_fails_router_construction() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let channel = Arc::new(StatusChannel::default());
        let sink: Arc<dyn EventSink> = channel.clone();
        let state = AppState {
            pipeline: Arc::new(RequestPipeline::new(
                generation,
                delivery,
                sink,
                PipelineTiming::immediate(),
            )),
            channel,
        };

        assert!(router(state, &["not an origin\u{0}".to_string()]).is_err());
    }
}
