use std::path::PathBuf;

use vid2doc_core::{PipelineConfig, events::EventHeader};

use crate::workers::events::pipeline_event;

/// Everything a run needs to know, fixed before the first event.
#[derive(Clone, Debug, serde::Serialize)]
pub struct JobSpec {
    pub url: String,
    pub force: bool,
    pub config: PipelineConfig,

    // pure derived values
    pub cache_dir: PathBuf,
    pub output_path: PathBuf,
}

#[derive(serde::Serialize)]
pub struct MediaRequested {
    pub header: EventHeader,
    pub job: JobSpec,
}

impl MediaRequested {
    pub const EVENT_TYPE: &'static str = "media.requested";

    pub fn new(job: JobSpec) -> Self {
        Self {
            header: EventHeader::root(),
            job,
        }
    }
}

pipeline_event!(MediaRequested);
