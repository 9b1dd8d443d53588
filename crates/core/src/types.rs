use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}

impl Transcript {
    /// End of the last segment, used when the media duration is unknown.
    pub fn last_end(&self) -> Option<f64> {
        self.segments.last().map(|s| s.end)
    }
}

/// One timestamped utterance produced by speech recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A section boundary and its text, before frames are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRef {
    pub timestamp: f64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub frame_refs: Vec<FrameRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub source_url: String,
    pub sections: Vec<Section>,
}

/// A downloaded video as resolved by a media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub local_path: PathBuf,
    pub title: String,
    /// Seconds; `None` when the container does not report it.
    pub duration: Option<f64>,
}
