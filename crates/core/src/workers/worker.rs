use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::{
    events::{EnrichedEvent, EventBus},
    workers::{PipelineFailed, SubscriptionSpec, WorkerInputs},
};

/// One pipeline stage: consumes the events named by its subscription and
/// publishes what it produces back onto the bus.
#[async_trait]
pub trait Worker: Send + Sized + 'static {
    const SUBSCRIBER_ID: &'static str;

    fn subscription() -> SubscriptionSpec;

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> Result<()>;

    /// Drive the worker until shutdown. A failing `handle` is reported as
    /// [`PipelineFailed`] and the worker keeps serving.
    async fn run(
        mut self,
        mut inputs: WorkerInputs,
        bus: Arc<EventBus>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                _ = shutdown.recv() => return Ok(()),
                item = inputs.next() => {
                    debug!(stage = Self::SUBSCRIBER_ID, event_type = item.event_type, "handling");
                    let cause = Arc::clone(&item.event.event);
                    if let Err(e) = self.handle(item.event, &bus).await {
                        let message = format!("{e:#}");
                        error!(stage = Self::SUBSCRIBER_ID, error = %message, "stage failed");
                        bus.publish(Arc::new(PipelineFailed::new(
                            cause,
                            Self::SUBSCRIBER_ID,
                            message,
                        )));
                    }
                }
            }
        }
    }
}
