use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    MediaSource,
    events::{EnrichedEvent, EventBus, expect},
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::workers::events::{MediaRequested, MediaResolved};

pub struct ResolveMediaWorker {
    source: Arc<dyn MediaSource>,
}

impl ResolveMediaWorker {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Worker for ResolveMediaWorker {
    const SUBSCRIBER_ID: &'static str = "resolve.media";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(MediaRequested::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<MediaRequested>(&event.event, MediaRequested::EVENT_TYPE)?;

        let media = self.source.resolve(&req.job.url, &req.job.cache_dir).await?;

        bus.publish(Arc::new(MediaResolved::new(
            event.event.event_id(),
            req.job.clone(),
            media,
        )));

        Ok(())
    }
}
