use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    TranscriptProvider,
    events::{EnrichedEvent, EventBus, expect},
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::workers::events::{MediaResolved, TranscriptReady};

pub struct TranscribeWorker {
    transcripts: Arc<dyn TranscriptProvider>,
}

impl TranscribeWorker {
    pub fn new(transcripts: Arc<dyn TranscriptProvider>) -> Self {
        Self { transcripts }
    }
}

#[async_trait]
impl Worker for TranscribeWorker {
    const SUBSCRIBER_ID: &'static str = "transcribe";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(MediaResolved::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<MediaResolved>(&event.event, MediaResolved::EVENT_TYPE)?;

        let transcript = self.transcripts.transcribe(&req.media.local_path).await?;

        bus.publish(Arc::new(TranscriptReady::new(
            event.event.event_id(),
            req.job.clone(),
            req.media.clone(),
            transcript,
        )));

        Ok(())
    }
}
