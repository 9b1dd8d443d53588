use uuid::Uuid;
use vid2doc_core::{MediaInfo, Transcript, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(serde::Serialize)]
pub struct TranscriptReady {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
    pub transcript: Transcript,
}

impl TranscriptReady {
    pub const EVENT_TYPE: &'static str = "transcript.ready";

    pub fn new(
        parent_event_id: Uuid,
        job: JobSpec,
        media: MediaInfo,
        transcript: Transcript,
    ) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
            transcript,
        }
    }
}

pipeline_event!(TranscriptReady);
