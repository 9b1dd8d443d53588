use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::{error::Result, media::extract_audio, provider::TranscriptProvider, types::Transcript};

/// Cache-or-compute wrapper around another transcript provider.
///
/// A transcript already stored at `cache_path` is returned verbatim without
/// touching the inner provider. Fresh transcripts are written there before
/// being returned.
pub struct CachedTranscriptProvider<P> {
    inner: P,
    cache_path: PathBuf,
    force: bool,
}

impl<P: TranscriptProvider> CachedTranscriptProvider<P> {
    pub fn new(inner: P, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache_path: cache_path.into(),
            force: false,
        }
    }

    /// Ignore an existing cached transcript and recompute it.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[async_trait]
impl<P: TranscriptProvider> TranscriptProvider for CachedTranscriptProvider<P> {
    async fn transcribe(&self, media: &Path) -> Result<Transcript> {
        if !self.force && self.cache_path.exists() {
            debug!(path = %self.cache_path.display(), "using cached transcript");
            return load_transcript(&self.cache_path).await;
        }

        let transcript = self.inner.transcribe(media).await?;
        save_transcript(&transcript, &self.cache_path).await?;
        info!(
            segments = transcript.segments.len(),
            language = %transcript.language,
            "transcript cached"
        );

        Ok(transcript)
    }
}

/// Feeds the inner provider the audio track of a video instead of the video.
///
/// The track is extracted once to `audio_path` and reused afterwards.
pub struct AudioTrackTranscriber<P> {
    inner: P,
    audio_path: PathBuf,
    force: bool,
}

impl<P: TranscriptProvider> AudioTrackTranscriber<P> {
    pub fn new(inner: P, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            audio_path: audio_path.into(),
            force: false,
        }
    }

    /// Re-extract the audio even if a previous run left it behind.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[async_trait]
impl<P: TranscriptProvider> TranscriptProvider for AudioTrackTranscriber<P> {
    async fn transcribe(&self, media: &Path) -> Result<Transcript> {
        if self.force || !self.audio_path.exists() {
            extract_audio(media, &self.audio_path).await?;
            debug!(path = %self.audio_path.display(), "audio extracted");
        }

        self.inner.transcribe(&self.audio_path).await
    }
}

/// Load a transcript from a cached file
pub async fn load_transcript(path: &Path) -> Result<Transcript> {
    let json_content = fs::read_to_string(path).await?;
    let transcript: Transcript = serde_json::from_str(&json_content)?;
    Ok(transcript)
}

pub async fn save_transcript(transcript: &Transcript, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, serde_json::to_string_pretty(transcript)?).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{error::Vid2DocError, types::Segment};

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                calls: Arc::clone(&calls),
                fail,
            };
            (provider, calls)
        }
    }

    #[async_trait]
    impl TranscriptProvider for CountingProvider {
        async fn transcribe(&self, _media: &Path) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Vid2DocError::provider("whisper", "model missing"));
            }
            Ok(Transcript {
                text: " hello world".to_string(),
                segments: vec![
                    Segment::new(0.0, 1.5, " hello"),
                    Segment::new(1.5, 3.0, " world"),
                ],
                language: "en".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_computes_then_reuses_cached_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("transcript.json");
        let (inner, calls) = CountingProvider::new(false);
        let provider = CachedTranscriptProvider::new(inner, &cache_path);

        let first = provider.transcribe(Path::new("audio.wav")).await.unwrap();
        let second = provider.transcribe(Path::new("audio.wav")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache_path.exists());
        assert_eq!(first.segments, second.segments);
    }

    #[tokio::test]
    async fn test_cached_transcript_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("transcript.json");
        let cached = Transcript {
            text: "from disk".to_string(),
            segments: vec![Segment::new(0.0, 61.0, "from disk")],
            language: "uk".to_string(),
        };
        save_transcript(&cached, &cache_path).await.unwrap();
        let (inner, calls) = CountingProvider::new(true);

        let transcript = CachedTranscriptProvider::new(inner, &cache_path)
            .transcribe(Path::new("audio.wav"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(transcript.language, "uk");
        assert_eq!(transcript.segments, cached.segments);
    }

    #[tokio::test]
    async fn test_force_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("transcript.json");
        let (inner, calls) = CountingProvider::new(false);
        let provider = CachedTranscriptProvider::new(inner, &cache_path).force(true);

        provider.transcribe(Path::new("audio.wav")).await.unwrap();
        provider.transcribe(Path::new("audio.wav")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct EchoPathProvider;

    #[async_trait]
    impl TranscriptProvider for EchoPathProvider {
        async fn transcribe(&self, media: &Path) -> Result<Transcript> {
            Ok(Transcript {
                text: media.to_string_lossy().into_owned(),
                segments: Vec::new(),
                language: "en".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_existing_audio_track_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let audio_path = dir.path().join("audio.wav");
        std::fs::write(&audio_path, b"RIFF").unwrap();

        // the video does not exist, so extraction would fail if attempted
        let transcript = AudioTrackTranscriber::new(EchoPathProvider, &audio_path)
            .transcribe(&dir.path().join("video.mp4"))
            .await
            .unwrap();

        assert_eq!(transcript.text, audio_path.to_string_lossy());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("transcript.json");
        let (inner, _calls) = CountingProvider::new(true);

        let err = CachedTranscriptProvider::new(inner, &cache_path)
            .transcribe(Path::new("audio.wav"))
            .await
            .unwrap_err();

        assert!(matches!(err, Vid2DocError::ProviderUnavailable { provider: "whisper", .. }));
        assert!(!cache_path.exists());
    }
}
