use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use vid2doc_core::{
    events::{EnrichedEvent, EventBus, downcast_ref},
    queues::QueueKind,
    workers::{InputSpec, PipelineFailed, SubscriptionSpec, Worker},
};

use crate::workers::events::ReportRendered;

pub type RunOutcome = Result<ReportRendered, PipelineFailed>;

/// Resolves the run with the first terminal event: a rendered report or a
/// stage failure.
pub struct CliCompletionSinkWorker {
    done: Option<oneshot::Sender<RunOutcome>>,
}

impl CliCompletionSinkWorker {
    pub fn new(done: oneshot::Sender<RunOutcome>) -> Self {
        Self { done: Some(done) }
    }
}

#[async_trait]
impl Worker for CliCompletionSinkWorker {
    const SUBSCRIBER_ID: &'static str = "cli.completion_sink";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![
                InputSpec {
                    event_type: ReportRendered::EVENT_TYPE,
                    queue_kind: QueueKind::Isolated { output_buffer: 4 },
                },
                InputSpec::fifo(PipelineFailed::EVENT_TYPE),
            ],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, _bus: &EventBus) -> anyhow::Result<()> {
        let outcome = if let Some(rendered) = downcast_ref::<ReportRendered>(&event.event) {
            Ok(rendered.clone())
        } else if let Some(failed) = downcast_ref::<PipelineFailed>(&event.event) {
            Err(failed.clone())
        } else {
            return Ok(());
        };

        if let Some(done) = self.done.take() {
            // the receiver is gone once main stopped waiting
            let _ = done.send(outcome);
        }
        Ok(())
    }
}
