use uuid::Uuid;
use vid2doc_core::{FrameRef, MediaInfo, SectionDraft, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(serde::Serialize)]
pub struct FramesSampled {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
    pub drafts: Vec<SectionDraft>,
    /// One list per draft, same order.
    pub frame_lists: Vec<Vec<FrameRef>>,
}

impl FramesSampled {
    pub const EVENT_TYPE: &'static str = "frames.sampled";

    pub fn new(
        parent_event_id: Uuid,
        job: JobSpec,
        media: MediaInfo,
        drafts: Vec<SectionDraft>,
        frame_lists: Vec<Vec<FrameRef>>,
    ) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
            drafts,
            frame_lists,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_lists.iter().map(Vec::len).sum()
    }
}

pipeline_event!(FramesSampled);
