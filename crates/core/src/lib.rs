//! vid2doc core library
//!
//! Turns a transcript and its video into a sectioned document: fixed-duration
//! text sections, each illustrated by frames sampled from its time span.

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod frame_sampler;
pub mod media;
pub mod provider;
pub mod queues;
pub mod report;
pub mod routes;
pub mod sectionizer;
pub mod store;
pub mod transcript;
pub mod types;
pub mod whisper;
pub mod workers;

pub use config::PipelineConfig;
pub use error::{Result, Vid2DocError};
pub use frame_sampler::{FrameSampler, sample_timestamps};
pub use provider::{ContentStore, FrameProvider, MediaSource, TranscriptProvider};
pub use report::assemble;
pub use sectionizer::sectionize;
pub use types::{FrameRef, MediaInfo, Report, Section, SectionDraft, Segment, Transcript};
