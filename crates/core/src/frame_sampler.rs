//! Picks evenly spaced timestamps inside a section and persists the frames
//! found there.

use std::{
    cmp::Ordering, collections::HashSet, ops::Range, path::Path, sync::Arc, time::Duration,
};

use tokio::{sync::Semaphore, task::JoinSet, time::timeout};
use tracing::{debug, warn};

use crate::{
    error::{Result, Vid2DocError, ensure_positive},
    format::frame_key,
    provider::{ContentStore, FrameProvider},
    types::{FrameRef, SectionDraft},
};

pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(30);

/// Timestamps `start, start + interval, ...` strictly below `span.end`.
///
/// Each timestamp is computed from its index rather than by repeated
/// addition, so a long span does not drift.
pub fn sample_timestamps(span: Range<f64>, interval: f64) -> Result<Vec<f64>> {
    ensure_positive("interval", interval)?;

    // NaN bounds compare as None and yield nothing
    if span.end.partial_cmp(&span.start) != Some(Ordering::Greater) {
        return Ok(Vec::new());
    }

    let count = ((span.end - span.start) / interval).ceil() as usize;
    Ok((0..count)
        .map(|i| span.start + i as f64 * interval)
        .filter(|t| *t < span.end)
        .collect())
}

#[derive(Clone)]
pub struct FrameSampler {
    provider: Arc<dyn FrameProvider>,
    store: Arc<dyn ContentStore>,
    frame_timeout: Duration,
}

impl FrameSampler {
    pub fn new(provider: Arc<dyn FrameProvider>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            provider,
            store,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        }
    }

    pub fn with_frame_timeout(mut self, frame_timeout: Duration) -> Self {
        self.frame_timeout = frame_timeout;
        self
    }

    /// Sample one section span. Frames the provider cannot deliver are left
    /// out; the remaining timestamps are unaffected.
    ///
    /// Frames are stored under the `section` namespace, so sections sampled
    /// concurrently never share a key.
    pub async fn sample_frames(
        &self,
        media: &Path,
        section: usize,
        span: Range<f64>,
        interval: f64,
    ) -> Result<Vec<FrameRef>> {
        let timestamps = sample_timestamps(span, interval)?;
        let keys: Vec<String> = timestamps.iter().map(|t| frame_key(section, *t)).collect();

        let mut seen = HashSet::with_capacity(keys.len());
        if let Some(dup) = keys.iter().find(|k| !seen.insert(k.as_str())) {
            return Err(Vid2DocError::InvalidArgument {
                name: "interval",
                reason: format!("{interval} is too fine, two samples share the key {dup}"),
            });
        }

        let mut frames = Vec::with_capacity(timestamps.len());
        for (t, key) in timestamps.into_iter().zip(keys) {
            let decoded =
                timeout(self.frame_timeout, self.provider.seek_and_decode(media, t)).await;
            let image = match decoded {
                Ok(Ok(Some(image))) => image,
                Ok(Ok(None)) => {
                    debug!(timestamp = t, "no frame at timestamp");
                    continue;
                }
                Ok(Err(e)) => {
                    warn!(timestamp = t, error = %e, "frame unavailable");
                    continue;
                }
                Err(_) => {
                    warn!(timestamp = t, timeout = ?self.frame_timeout, "frame decode timed out");
                    continue;
                }
            };

            let path = self.store.put_frame(&key, image).await?;
            frames.push(FrameRef { timestamp: t, path });
        }

        Ok(frames)
    }

    /// Sample every draft, running up to `jobs` sections at once.
    ///
    /// The result has one frame list per draft, in draft order.
    pub async fn sample_sections(
        &self,
        media: &Path,
        drafts: &[SectionDraft],
        interval: f64,
        jobs: usize,
    ) -> Result<Vec<Vec<FrameRef>>> {
        ensure_positive("interval", interval)?;

        let permits = Arc::new(Semaphore::new(jobs.max(1)));
        let mut tasks = JoinSet::new();

        for (index, draft) in drafts.iter().enumerate() {
            let sampler = self.clone();
            let media = media.to_path_buf();
            let span = draft.start_time..draft.end_time;
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| Vid2DocError::TaskFailed(e.to_string()))?;
                let frames = sampler.sample_frames(&media, index, span, interval).await?;
                debug!(section = index, frames = frames.len(), "section sampled");
                Ok::<_, Vid2DocError>((index, frames))
            });
        }

        let mut lists = vec![Vec::new(); drafts.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, frames) = joined.map_err(|e| Vid2DocError::TaskFailed(e.to_string()))??;
            lists[index] = frames;
        }

        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf, sync::Mutex};

    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use image::DynamicImage;

    use super::*;

    /// Succeeds everywhere except the listed timestamps.
    struct ScriptedProvider {
        failing: Vec<f64>,
        stalling: Vec<f64>,
        calls: Mutex<Vec<f64>>,
    }

    impl ScriptedProvider {
        fn always() -> Self {
            Self::failing_at(&[])
        }

        fn failing_at(failing: &[f64]) -> Self {
            Self {
                failing: failing.to_vec(),
                stalling: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FrameProvider for ScriptedProvider {
        async fn seek_and_decode(
            &self,
            _media: &Path,
            timestamp: f64,
        ) -> Result<Option<DynamicImage>> {
            self.calls.lock().unwrap().push(timestamp);
            if self.stalling.contains(&timestamp) {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            if self.failing.contains(&timestamp) {
                return Err(Vid2DocError::provider("test decoder", "seek failed"));
            }
            Ok(Some(DynamicImage::new_rgb8(2, 2)))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        frames: Mutex<BTreeMap<String, (u32, u32)>>,
    }

    #[async_trait]
    impl ContentStore for MemoryStore {
        async fn put_frame(&self, key: &str, image: DynamicImage) -> Result<String> {
            self.frames
                .lock()
                .unwrap()
                .insert(key.to_string(), (image.width(), image.height()));
            Ok(format!("mem://{key}"))
        }
    }

    fn sampler(
        provider: ScriptedProvider,
    ) -> (FrameSampler, Arc<ScriptedProvider>, Arc<MemoryStore>) {
        let provider = Arc::new(provider);
        let store = Arc::new(MemoryStore::default());
        let sampler = FrameSampler::new(provider.clone(), store.clone());
        (sampler, provider, store)
    }

    fn media() -> PathBuf {
        PathBuf::from("video.mp4")
    }

    fn draft(start_time: f64, end_time: f64, text: &str) -> SectionDraft {
        SectionDraft {
            start_time,
            end_time,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_timestamps_are_half_open() {
        assert_eq!(
            sample_timestamps(0.0..100.0, 30.0).unwrap(),
            vec![0.0, 30.0, 60.0, 90.0]
        );
        assert_eq!(
            sample_timestamps(0.0..90.0, 30.0).unwrap(),
            vec![0.0, 30.0, 60.0]
        );
    }

    #[test]
    fn test_timestamp_count_matches_ceil() {
        let cases = [
            (0.0, 100.0, 30.0),
            (65.0, 131.5, 30.0),
            (10.0, 10.5, 0.25),
            (3.0, 4.0, 7.0),
        ];
        for (start, end, interval) in cases {
            let ts = sample_timestamps(start..end, interval).unwrap();
            let expected = ((end - start) / interval).ceil() as usize;
            assert_eq!(ts.len(), expected, "span {start}..{end} every {interval}");
            assert_relative_eq!(ts[0], start);
            assert!(ts.iter().all(|t| *t < end));
        }
    }

    #[test]
    fn test_empty_span_yields_no_timestamps() {
        assert!(sample_timestamps(50.0..50.0, 30.0).unwrap().is_empty());
        assert!(sample_timestamps(60.0..10.0, 30.0).unwrap().is_empty());
        assert!(sample_timestamps(f64::NAN..10.0, 30.0).unwrap().is_empty());
        assert!(sample_timestamps(0.0..f64::NAN, 30.0).unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_interval_is_invalid() {
        for interval in [0.0, -30.0, f64::NAN] {
            let err = sample_timestamps(0.0..100.0, interval).unwrap_err();
            assert!(matches!(err, Vid2DocError::InvalidArgument { name: "interval", .. }));
        }
    }

    #[tokio::test]
    async fn test_sample_frames_all_succeed() {
        let (sampler, _, store) = sampler(ScriptedProvider::always());

        let frames = sampler
            .sample_frames(&media(), 0, 0.0..100.0, 30.0)
            .await
            .unwrap();

        let timestamps: Vec<f64> = frames.iter().map(|f| f.timestamp).collect();
        assert_eq!(timestamps, vec![0.0, 30.0, 60.0, 90.0]);
        assert_eq!(frames[1].path, "mem://section_000/frame_30.00.jpg");
        assert_eq!(store.frames.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_frame_is_skipped_without_shifting_others() {
        let (sampler, provider, store) = sampler(ScriptedProvider::failing_at(&[60.0]));

        let frames = sampler
            .sample_frames(&media(), 0, 0.0..100.0, 30.0)
            .await
            .unwrap();

        let timestamps: Vec<f64> = frames.iter().map(|f| f.timestamp).collect();
        assert_eq!(timestamps, vec![0.0, 30.0, 90.0]);
        assert_eq!(*provider.calls.lock().unwrap(), vec![0.0, 30.0, 60.0, 90.0]);
        assert!(!store.frames.lock().unwrap().contains_key("section_000/frame_60.00.jpg"));
    }

    #[tokio::test]
    async fn test_stalled_frame_degrades_to_unavailable() {
        let mut provider = ScriptedProvider::always();
        provider.stalling = vec![30.0];
        let (sampler, _, _) = sampler(provider);
        let sampler = sampler.with_frame_timeout(Duration::from_millis(50));

        let frames = sampler
            .sample_frames(&media(), 0, 0.0..60.0, 30.0)
            .await
            .unwrap();

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].timestamp, 0.0);
    }

    #[tokio::test]
    async fn test_empty_span_samples_nothing() {
        let (sampler, provider, _) = sampler(ScriptedProvider::always());

        let frames = sampler
            .sample_frames(&media(), 0, 40.0..40.0, 30.0)
            .await
            .unwrap();

        assert!(frames.is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sample_sections_keeps_draft_order() {
        let (sampler, _, store) = sampler(ScriptedProvider::failing_at(&[95.0]));
        let drafts = vec![
            draft(0.0, 65.0, "a "),
            draft(65.0, 130.0, "b "),
            draft(130.0, 140.0, "c "),
        ];

        for jobs in [1, 4] {
            let lists = sampler
                .sample_sections(&media(), &drafts, 30.0, jobs)
                .await
                .unwrap();

            let timestamps: Vec<Vec<f64>> = lists
                .iter()
                .map(|l| l.iter().map(|f| f.timestamp).collect())
                .collect();
            assert_eq!(
                timestamps,
                vec![vec![0.0, 30.0, 60.0], vec![65.0, 125.0], vec![130.0]]
            );
        }
        assert_eq!(store.frames.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_sample_sections_rejects_bad_interval_before_sampling() {
        let (sampler, provider, _) = sampler(ScriptedProvider::always());
        let drafts = vec![draft(0.0, 60.0, "a ")];

        let err = sampler
            .sample_sections(&media(), &drafts, 0.0, 2)
            .await
            .unwrap_err();

        assert!(matches!(err, Vid2DocError::InvalidArgument { .. }));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjacent_sections_get_distinct_frame_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(crate::store::FsContentStore::open(dir.path()).await.unwrap());
        let sampler = FrameSampler::new(Arc::new(ScriptedProvider::always()), store);
        let drafts = vec![draft(0.0, 10.0, "a "), draft(10.0, 20.0, "b ")];

        let lists = sampler
            .sample_sections(&media(), &drafts, 3.333, 2)
            .await
            .unwrap();

        let paths: Vec<&str> = lists.iter().flatten().map(|f| f.path.as_str()).collect();
        assert_eq!(paths.len(), 8);
        let unique: HashSet<&str> = paths.iter().copied().collect();
        assert_eq!(unique.len(), paths.len(), "{paths:?}");
        assert!(paths.iter().all(|p| Path::new(p).exists()));
    }

    #[tokio::test]
    async fn test_interval_finer_than_key_precision_is_rejected() {
        let (sampler, provider, store) = sampler(ScriptedProvider::always());

        let err = sampler
            .sample_frames(&media(), 0, 0.0..0.05, 0.004)
            .await
            .unwrap_err();

        assert!(matches!(err, Vid2DocError::InvalidArgument { name: "interval", .. }));
        assert!(provider.calls.lock().unwrap().is_empty());
        assert!(store.frames.lock().unwrap().is_empty());
    }
}
