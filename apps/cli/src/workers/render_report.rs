use std::sync::Arc;

use async_trait::async_trait;
use vid2doc_core::{
    events::{EnrichedEvent, EventBus, expect},
    workers::{InputSpec, SubscriptionSpec, Worker},
};

use crate::{
    render::HtmlRenderer,
    workers::events::{ReportAssembled, ReportRendered},
};

#[derive(Default)]
pub struct RenderReportWorker {
    renderer: HtmlRenderer,
}

#[async_trait]
impl Worker for RenderReportWorker {
    const SUBSCRIBER_ID: &'static str = "render.report";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![InputSpec::fifo(ReportAssembled::EVENT_TYPE)],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, bus: &EventBus) -> anyhow::Result<()> {
        let req = expect::<ReportAssembled>(&event.event, ReportAssembled::EVENT_TYPE)?;

        let output_path = self.renderer.write(&req.report, &req.job.output_path).await?;

        bus.publish(Arc::new(ReportRendered::new(
            event.event.event_id(),
            req.job.clone(),
            req.media.clone(),
            req.report.clone(),
            output_path,
        )));

        Ok(())
    }
}
