use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    assemble,
    events::{EnrichedEvent, EventBus, expect},
    report::report_title,
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::workers::events::{FramesSampled, ReportAssembled};

#[derive(Default)]
pub struct AssembleReportWorker;

#[async_trait]
impl Worker for AssembleReportWorker {
    const SUBSCRIBER_ID: &'static str = "assemble.report";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(FramesSampled::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<FramesSampled>(&event.event, FramesSampled::EVENT_TYPE)?;

        let report = assemble(
            report_title(&req.media.title),
            req.job.url.clone(),
            req.drafts.clone(),
            req.frame_lists.clone(),
        )?;

        bus.publish(Arc::new(ReportAssembled::new(
            event.event.event_id(),
            req.job.clone(),
            req.media.clone(),
            report,
        )));

        Ok(())
    }
}
