use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    events::{EnrichedEvent, EventBus, expect},
    sectionize,
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::workers::events::{SectionsDrafted, TranscriptReady};

#[derive(Default)]
pub struct SectionizeWorker;

#[async_trait]
impl Worker for SectionizeWorker {
    const SUBSCRIBER_ID: &'static str = "sectionize";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(TranscriptReady::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<TranscriptReady>(&event.event, TranscriptReady::EVENT_TYPE)?;

        let drafts = sectionize(
            &req.transcript.segments,
            req.job.config.section_duration,
            req.media.duration,
        )?;

        bus.publish(Arc::new(SectionsDrafted::new(
            event.event.event_id(),
            req.job.clone(),
            req.media.clone(),
            drafts,
        )));

        Ok(())
    }
}
