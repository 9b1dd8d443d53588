use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    ContentStore, FrameProvider, FrameSampler,
    events::{EnrichedEvent, EventBus, expect},
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::workers::events::{FramesSampled, SectionsDrafted};

pub struct SampleFramesWorker {
    frames: Arc<dyn FrameProvider>,
    store: Arc<dyn ContentStore>,
}

impl SampleFramesWorker {
    pub fn new(frames: Arc<dyn FrameProvider>, store: Arc<dyn ContentStore>) -> Self {
        Self { frames, store }
    }
}

#[async_trait]
impl Worker for SampleFramesWorker {
    const SUBSCRIBER_ID: &'static str = "sample.frames";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(SectionsDrafted::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<SectionsDrafted>(&event.event, SectionsDrafted::EVENT_TYPE)?;
        let config = &req.job.config;

        let sampler = FrameSampler::new(Arc::clone(&self.frames), Arc::clone(&self.store))
            .with_frame_timeout(config.frame_timeout);
        let frame_lists = sampler
            .sample_sections(
                &req.media.local_path,
                &req.drafts,
                config.frame_interval,
                config.jobs,
            )
            .await?;

        bus.publish(Arc::new(FramesSampled::new(
            event.event.event_id(),
            req.job.clone(),
            req.media.clone(),
            req.drafts.clone(),
            frame_lists,
        )));

        Ok(())
    }
}
