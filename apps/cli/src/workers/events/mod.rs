pub mod frames_sampled;
pub mod media_requested;
pub mod media_resolved;
pub mod report_assembled;
pub mod report_rendered;
pub mod sections_drafted;
pub mod transcript_ready;

pub use frames_sampled::*;
pub use media_requested::*;
pub use media_resolved::*;
pub use report_assembled::*;
pub use report_rendered::*;
pub use sections_drafted::*;
pub use transcript_ready::*;

/// Implements [`Event`](vid2doc_core::events::Event) for a struct with a
/// `header: EventHeader` field and an `EVENT_TYPE` constant.
macro_rules! pipeline_event {
    ($ty:ty) => {
        impl vid2doc_core::events::Event for $ty {
            fn event_id(&self) -> uuid::Uuid {
                self.header.event_id
            }

            fn parent_ids(&self) -> &[uuid::Uuid] {
                &self.header.parent_ids
            }

            fn event_type(&self) -> &'static str {
                Self::EVENT_TYPE
            }

            fn timestamp(&self) -> std::time::SystemTime {
                self.header.timestamp
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self as &dyn std::any::Any
            }
        }
    };
}

pub(crate) use pipeline_event;
