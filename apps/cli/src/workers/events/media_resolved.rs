use uuid::Uuid;
use vid2doc_core::{MediaInfo, events::EventHeader};

use crate::workers::events::{JobSpec, pipeline_event};

#[derive(serde::Serialize)]
pub struct MediaResolved {
    pub header: EventHeader,
    pub job: JobSpec,
    pub media: MediaInfo,
}

impl MediaResolved {
    pub const EVENT_TYPE: &'static str = "media.resolved";

    pub fn new(parent_event_id: Uuid, job: JobSpec, media: MediaInfo) -> Self {
        Self {
            header: EventHeader::child_of(parent_event_id),
            job,
            media,
        }
    }
}

pipeline_event!(MediaResolved);
