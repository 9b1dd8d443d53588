//! Collaborator seams consumed by the pipeline.
//!
//! Each trait hides one external system (downloader, speech recognizer,
//! frame decoder, image storage). Implementations live next to the tool
//! they wrap; tests substitute in-memory fakes.

use std::path::Path;

use async_trait::async_trait;
use image::DynamicImage;

use crate::{
    error::Result,
    types::{MediaInfo, Transcript},
};

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch `url` into `dir` and describe the local copy.
    async fn resolve(&self, url: &str, dir: &Path) -> Result<MediaInfo>;
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn transcribe(&self, media: &Path) -> Result<Transcript>;
}

#[async_trait]
pub trait FrameProvider: Send + Sync {
    /// Decode the frame nearest `timestamp` seconds.
    ///
    /// `Ok(None)` means the media has no frame there (e.g. past the end);
    /// `Err` means the decoder itself failed.
    async fn seek_and_decode(&self, media: &Path, timestamp: f64)
    -> Result<Option<DynamicImage>>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist `image` under `key`, returning a handle the renderer can use.
    async fn put_frame(&self, key: &str, image: DynamicImage) -> Result<String>;
}
