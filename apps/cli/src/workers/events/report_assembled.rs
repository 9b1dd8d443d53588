use uuid::Uuid;
use vid2doc_core::{MediaInfo, Report, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(serde::Serialize)]
pub struct ReportAssembled {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
    pub report: Report,
}

impl ReportAssembled {
    pub const EVENT_TYPE: &'static str = "report.assembled";

    pub fn new(parent_event_id: Uuid, job: JobSpec, media: MediaInfo, report: Report) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
            report,
        }
    }
}

pipeline_event!(ReportAssembled);
