//! Pipeline runner: validate, generate, deliver, broadcast.

use crate::clients::{DeliveryClient, GenerationClient, OutboundEmail};
use crate::core::{PipelineStatus, ProcessRequest, StatusEvent};
use crate::errors::AtmaError;
use crate::events::EventSink;
use crate::pipeline::PipelineTiming;
use crate::utils::generate_uuid;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

/// Summary of a finished pipeline run, returned to the HTTP layer.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Correlation id stamped on every event of the run.
    pub run_id: Uuid,
    /// Length of the generated text handed to delivery, in characters.
    pub generated_chars: usize,
}

/// Orchestrates one end-to-end request: validates input, invokes the
/// generation client, delivers the result by email, and broadcasts a
/// status event at every stage boundary.
///
/// One pipeline instance is shared across all requests. Concurrent runs
/// are not mutually excluded; their events interleave on the shared sink
/// and are told apart by run id.
pub struct RequestPipeline {
    generation: Arc<dyn GenerationClient>,
    delivery: Arc<dyn DeliveryClient>,
    sink: Arc<dyn EventSink>,
    timing: PipelineTiming,
    reset_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl RequestPipeline {
    /// Creates a pipeline over the given clients and sink.
    #[must_use]
    pub fn new(
        generation: Arc<dyn GenerationClient>,
        delivery: Arc<dyn DeliveryClient>,
        sink: Arc<dyn EventSink>,
        timing: PipelineTiming,
    ) -> Self {
        Self {
            generation,
            delivery,
            sink,
            timing,
            reset_task: Mutex::new(None),
        }
    }

    /// The pacing this pipeline runs with.
    #[must_use]
    pub fn timing(&self) -> PipelineTiming {
        self.timing
    }

    /// Runs the full pipeline for one request.
    ///
    /// Any stage failure aborts the remainder of the run: observers are
    /// reset to idle and the error is returned to the caller. Nothing is
    /// retried and no partial artifact survives; the caller must resubmit
    /// a fresh request.
    pub async fn handle_request(
        &self,
        request: ProcessRequest,
    ) -> Result<PipelineReport, AtmaError> {
        // Rejected requests leave no trace on the sink.
        request.validate()?;

        let run_id = generate_uuid();
        info!(%run_id, email = %request.email, "pipeline run started");

        self.emit(PipelineStatus::AiProcessing, run_id).await;
        let generated = match self.generation.generate(&request.prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(%run_id, error = %err, "generation failed");
                self.emit(PipelineStatus::Idle, run_id).await;
                return Err(err.into());
            }
        };
        info!(%run_id, chars = generated.chars().count(), "generation complete");

        self.emit(PipelineStatus::AiTransfer, run_id).await;
        self.pause(self.timing.transfer_pause()).await;

        self.emit(PipelineStatus::EmailProcessing, run_id).await;
        let message = OutboundEmail::new(
            request.email.clone(),
            request.subject_snippet(),
            generated.clone(),
        );
        if let Err(err) = self.delivery.deliver(&message).await {
            error!(%run_id, error = %err, "delivery failed");
            self.emit(PipelineStatus::Idle, run_id).await;
            return Err(err.into());
        }
        info!(%run_id, to = %message.to, "email relayed");

        self.emit(PipelineStatus::EmailTransfer, run_id).await;
        self.pause(self.timing.transfer_pause()).await;

        self.emit(PipelineStatus::Success, run_id).await;
        self.schedule_idle_reset(run_id);

        info!(%run_id, "pipeline run complete");
        Ok(PipelineReport {
            run_id,
            generated_chars: generated.chars().count(),
        })
    }

    /// Aborts a pending idle-reset timer, if any. Called on shutdown.
    pub fn abort_idle_reset(&self) {
        if let Some(handle) = self.reset_task.lock().take() {
            handle.abort();
        }
    }

    async fn emit(&self, status: PipelineStatus, run_id: Uuid) {
        self.sink.emit(StatusEvent::new(status, run_id)).await;
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    /// Schedules the delayed idle broadcast that follows a success.
    ///
    /// The timer outlives the HTTP response but not the pipeline: it is
    /// owned here, replaced (and the predecessor aborted) when a newer
    /// run schedules its own reset, and aborted on shutdown.
    fn schedule_idle_reset(&self, run_id: Uuid) {
        let sink = Arc::clone(&self.sink);
        let delay = self.timing.idle_reset();
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            sink.emit(StatusEvent::new(PipelineStatus::Idle, run_id)).await;
        });

        if let Some(previous) = self.reset_task.lock().replace(handle) {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::testing::{assert_status_sequence, MockDeliveryClient, MockGenerationClient};
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    fn pipeline(
        generation: Arc<MockGenerationClient>,
        delivery: Arc<MockDeliveryClient>,
    ) -> (RequestPipeline, Arc<CollectingEventSink>) {
        let sink = Arc::new(CollectingEventSink::new());
        let pipeline = RequestPipeline::new(
            generation,
            delivery,
            sink.clone(),
            PipelineTiming::immediate(),
        );
        (pipeline, sink)
    }

    fn request() -> ProcessRequest {
        ProcessRequest::new("Explain entropy", "a@b.com")
    }

    /// Polls the sink until it holds `count` events or a second passes.
    async fn wait_for_events(sink: &CollectingEventSink, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(1);
        while sink.len() < count && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_successful_run_sequence() {
        let generation = Arc::new(MockGenerationClient::completing("Entropy is..."));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, sink) = pipeline(generation.clone(), delivery.clone());

        let report = pipeline.handle_request(request()).await.unwrap();
        assert_eq!(report.generated_chars, "Entropy is...".chars().count());

        // The scheduled reset lands after the run returns
        wait_for_events(&sink, 6).await;
        assert_eq!(
            sink.statuses(),
            vec![
                PipelineStatus::AiProcessing,
                PipelineStatus::AiTransfer,
                PipelineStatus::EmailProcessing,
                PipelineStatus::EmailTransfer,
                PipelineStatus::Success,
                PipelineStatus::Idle,
            ]
        );

        assert_eq!(generation.call_count(), 1);
        assert_eq!(delivery.call_count(), 1);
    }

    #[tokio::test]
    async fn test_events_share_one_run_id() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, sink) = pipeline(generation, delivery);

        let report = pipeline.handle_request(request()).await.unwrap();
        wait_for_events(&sink, 6).await;

        for event in sink.events() {
            assert_eq!(event.run_id, report.run_id);
        }
    }

    #[tokio::test]
    async fn test_invalid_request_emits_nothing() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, sink) = pipeline(generation.clone(), delivery.clone());

        let err = pipeline
            .handle_request(ProcessRequest::new("", "a@b.com"))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(sink.is_empty());
        assert_eq!(generation.call_count(), 0);
        assert_eq!(delivery.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_sequence() {
        let generation = Arc::new(MockGenerationClient::failing("quota exceeded"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, sink) = pipeline(generation, delivery.clone());

        let err = pipeline.handle_request(request()).await.unwrap_err();
        assert!(matches!(err, AtmaError::Generation(_)));

        assert_status_sequence(&sink, &[PipelineStatus::AiProcessing, PipelineStatus::Idle]);
        // Delivery is never reached
        assert_eq!(delivery.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delivery_failure_sequence() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::rejecting("bad token"));
        let (pipeline, sink) = pipeline(generation, delivery);

        let err = pipeline.handle_request(request()).await.unwrap_err();
        assert!(matches!(err, AtmaError::Delivery(_)));

        assert_status_sequence(
            &sink,
            &[
                PipelineStatus::AiProcessing,
                PipelineStatus::AiTransfer,
                PipelineStatus::EmailProcessing,
                PipelineStatus::Idle,
            ],
        );
    }

    #[tokio::test]
    async fn test_delivery_receives_snippet_and_body() {
        let generation = Arc::new(MockGenerationClient::completing("Entropy is..."));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, _sink) = pipeline(generation, delivery.clone());

        pipeline.handle_request(request()).await.unwrap();

        let sent = delivery.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Explain entropy...");
        assert_eq!(sent[0].body, "Entropy is...");
    }

    #[tokio::test]
    async fn test_repeated_requests_are_independent() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let (pipeline, sink) = pipeline(generation, delivery);

        let first = pipeline.handle_request(request()).await.unwrap();
        wait_for_events(&sink, 6).await;
        let first_statuses = sink.statuses();
        sink.clear();

        let second = pipeline.handle_request(request()).await.unwrap();
        wait_for_events(&sink, 6).await;

        // Same sequence, different run
        assert_eq!(sink.statuses(), first_statuses);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_abort_idle_reset_suppresses_the_reset() {
        let generation = Arc::new(MockGenerationClient::completing("text"));
        let delivery = Arc::new(MockDeliveryClient::accepting());
        let sink = Arc::new(CollectingEventSink::new());
        let pipeline = RequestPipeline::new(
            generation,
            delivery,
            sink.clone(),
            PipelineTiming::immediate().with_idle_reset_ms(60_000),
        );

        pipeline.handle_request(request()).await.unwrap();
        pipeline.abort_idle_reset();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(sink.statuses().last(), Some(&PipelineStatus::Success));
    }
}
