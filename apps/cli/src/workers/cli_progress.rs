use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use console::style;
use indicatif::ProgressBar;
use vid2doc_core::{
    events::{EnrichedEvent, EventBus, downcast_ref},
    workers::{InputSpec, PipelineFailed, SubscriptionSpec, Worker},
};

use crate::{
    progress::format_duration,
    workers::events::{
        FramesSampled, MediaResolved, ReportAssembled, ReportRendered, SectionsDrafted,
        TranscriptReady,
    },
};

/// Prints one line per finished stage above a shared spinner.
pub struct CliProgressWorker {
    spinner: ProgressBar,
    stage_start: Instant,
}

impl CliProgressWorker {
    pub fn new(spinner: ProgressBar) -> Self {
        Self {
            spinner,
            stage_start: Instant::now(),
        }
    }

    fn stage_done(&mut self, summary: String, next: Option<&str>) {
        self.spinner.println(format!(
            "{} {} {}",
            style("✓").green().bold(),
            summary,
            style(format!("[{}]", format_duration(self.stage_start.elapsed()))).dim()
        ));
        self.stage_start = Instant::now();

        match next {
            Some(msg) => self.spinner.set_message(msg.to_string()),
            None => self.spinner.finish_and_clear(),
        }
    }
}

#[async_trait]
impl Worker for CliProgressWorker {
    const SUBSCRIBER_ID: &'static str = "cli.progress";

    fn subscription() -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: Self::SUBSCRIBER_ID,
            inputs: vec![
                InputSpec::fifo(MediaResolved::EVENT_TYPE),
                InputSpec::fifo(TranscriptReady::EVENT_TYPE),
                InputSpec::fifo(SectionsDrafted::EVENT_TYPE),
                InputSpec::fifo(FramesSampled::EVENT_TYPE),
                InputSpec::fifo(ReportAssembled::EVENT_TYPE),
                InputSpec::fifo(ReportRendered::EVENT_TYPE),
                InputSpec::fifo(PipelineFailed::EVENT_TYPE),
            ],
        }
    }

    async fn handle(&mut self, event: Arc<EnrichedEvent>, _bus: &EventBus) -> anyhow::Result<()> {
        let event = &event.event;

        if let Some(e) = downcast_ref::<MediaResolved>(event) {
            let summary = format!("Media: {}", style(&e.media.title).cyan());
            self.stage_done(summary, Some("Transcribing with Whisper..."));
        } else if let Some(e) = downcast_ref::<TranscriptReady>(event) {
            let minutes = e.transcript.last_end().unwrap_or(0.0) / 60.0;
            let summary = format!(
                "Transcribed: {:.1} min, {}",
                minutes,
                style(&e.transcript.language).yellow()
            );
            self.stage_done(summary, Some("Splitting into sections..."));
        } else if let Some(e) = downcast_ref::<SectionsDrafted>(event) {
            let summary = format!("Sections: {}", e.drafts.len());
            self.stage_done(summary, Some("Sampling frames..."));
        } else if let Some(e) = downcast_ref::<FramesSampled>(event) {
            let summary = format!("Frames sampled: {}", e.frame_count());
            self.stage_done(summary, Some("Assembling report..."));
        } else if downcast_ref::<ReportAssembled>(event).is_some() {
            self.stage_done("Report assembled".to_string(), Some("Rendering HTML..."));
        } else if let Some(e) = downcast_ref::<ReportRendered>(event) {
            let summary = format!("Rendered {}", style(e.output_path.display()).cyan());
            self.stage_done(summary, None);
        } else if downcast_ref::<PipelineFailed>(event).is_some() {
            self.spinner.finish_and_clear();
        }

        Ok(())
    }
}
