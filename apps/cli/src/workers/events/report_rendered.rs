use std::path::PathBuf;

use uuid::Uuid;
use vid2doc_core::{MediaInfo, Report, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(Clone, Debug, serde::Serialize)]
pub struct ReportRendered {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
    pub report: Report,
    pub output_path: PathBuf,
}

impl ReportRendered {
    pub const EVENT_TYPE: &'static str = "report.rendered";

    pub fn new(
        parent_event_id: Uuid,
        job: JobSpec,
        media: MediaInfo,
        report: Report,
        output_path: PathBuf,
    ) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
            report,
            output_path,
        }
    }
}

pipeline_event!(ReportRendered);
