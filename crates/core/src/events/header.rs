use std::time::SystemTime;

use serde::Serialize;
use uuid::Uuid;

/// Identity and lineage shared by every pipeline event.
#[derive(Clone, Debug, Serialize)]
pub struct EventHeader {
    pub event_id: Uuid,
    pub parent_ids: Vec<Uuid>,
    pub timestamp: SystemTime,
}

impl EventHeader {
    /// Header for an event that starts a run.
    pub fn root() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            parent_ids: Vec::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Header for an event caused by `parent_event_id`.
    pub fn child_of(parent_event_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            parent_ids: vec![parent_event_id],
            timestamp: SystemTime::now(),
        }
    }
}
