use uuid::Uuid;
use vid2doc_core::{MediaInfo, SectionDraft, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(serde::Serialize)]
pub struct SectionsDrafted {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
    pub drafts: Vec<SectionDraft>,
}

impl SectionsDrafted {
    pub const EVENT_TYPE: &'static str = "sections.drafted";

    pub fn new(
        parent_event_id: Uuid,
        job: JobSpec,
        media: MediaInfo,
        drafts: Vec<SectionDraft>,
    ) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
            drafts,
        }
    }
}

pipeline_event!(SectionsDrafted);
