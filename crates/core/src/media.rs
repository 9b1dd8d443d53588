//! Adapters over the `yt-dlp`, `ffmpeg` and `ffprobe` command line tools.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use tokio::{fs, process::Command};
use tracing::{debug, info};

use crate::{
    cache::{find_video_in_cache, get_media_info_path},
    error::{Result, Vid2DocError},
    provider::{FrameProvider, MediaSource},
    types::MediaInfo,
};

/// Downloads with `yt-dlp` and remembers the result in `media.json`.
pub struct YtDlpMediaSource {
    force: bool,
}

impl YtDlpMediaSource {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    async fn download_video(url: &str, cache_dir: &Path) -> Result<(String, PathBuf)> {
        let output_template = cache_dir.join("video.%(ext)s");
        let output = Command::new("yt-dlp")
            .arg(url)
            .arg("--print")
            .arg("after_move:title")
            .arg("--print")
            .arg("after_move:filepath")
            .arg("--extractor-args")
            .arg("youtube:player_client=android,web")
            .arg("-f")
            .arg("best")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await
            .map_err(|e| Vid2DocError::provider("yt-dlp", e.to_string()))?;

        if !output.status.success() {
            return Err(Vid2DocError::provider(
                "yt-dlp",
                format!(
                    "download of {} failed: {}",
                    url,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout_str = String::from_utf8_lossy(output.stdout.as_slice());
        parse_download_output(&stdout_str).ok_or_else(|| {
            Vid2DocError::provider("yt-dlp", format!("unexpected output: {:?}", stdout_str))
        })
    }

    async fn load_media_info(path: &Path) -> Result<MediaInfo> {
        let json_content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json_content)?)
    }
}

/// Split `yt-dlp --print title --print filepath` output into its two lines.
fn parse_download_output(stdout: &str) -> Option<(String, PathBuf)> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    let title = lines.next()?;
    let filepath = lines.next()?;
    Some((title.to_string(), PathBuf::from(filepath)))
}

#[async_trait]
impl MediaSource for YtDlpMediaSource {
    async fn resolve(&self, url: &str, dir: &Path) -> Result<MediaInfo> {
        let info_path = get_media_info_path(dir);

        if !self.force && info_path.exists() {
            let media = Self::load_media_info(&info_path).await?;
            if media.local_path.exists() {
                debug!(path = %media.local_path.display(), "reusing downloaded media");
                return Ok(media);
            }
        }

        fs::create_dir_all(dir).await?;
        let (title, local_path) = match find_video_in_cache(dir) {
            // a previous run downloaded but never wrote media.json
            Some(path) if !self.force => (path_stem(&path), path),
            _ => Self::download_video(url, dir).await?,
        };
        let duration = probe_duration(&local_path).await?;

        let media = MediaInfo {
            local_path,
            title,
            duration,
        };
        fs::write(&info_path, serde_json::to_string_pretty(&media)?).await?;
        info!(title = %media.title, duration = ?media.duration, "media resolved");

        Ok(media)
    }
}

fn path_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown Title".to_string())
}

/// Container duration in seconds, or `None` if ffprobe reports none.
pub async fn probe_duration(media: &Path) -> Result<Option<f64>> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(media)
        .output()
        .await
        .map_err(|e| Vid2DocError::provider("ffprobe", e.to_string()))?;

    if !output.status.success() {
        return Err(Vid2DocError::provider(
            "ffprobe",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(parse_duration(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Extract 16 kHz mono PCM audio from video using ffmpeg
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio_path)
        .output()
        .await
        .map_err(|e| Vid2DocError::provider("ffmpeg", e.to_string()))?;

    if !output.status.success() {
        return Err(Vid2DocError::provider(
            "ffmpeg",
            format!(
                "audio extraction from {} failed: {}",
                video_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    Ok(())
}

/// Decodes single frames by running one `ffmpeg` process per seek.
///
/// No decoder handle outlives a call, so concurrent seeks are safe.
#[derive(Debug, Default, Clone)]
pub struct FfmpegFrameProvider;

impl FfmpegFrameProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameProvider for FfmpegFrameProvider {
    async fn seek_and_decode(
        &self,
        media: &Path,
        timestamp: f64,
    ) -> Result<Option<DynamicImage>> {
        let output = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-ss")
            .arg(format!("{:.3}", timestamp))
            .arg("-i")
            .arg(media)
            .arg("-frames:v")
            .arg("1")
            .arg("-f")
            .arg("image2pipe")
            .arg("-vcodec")
            .arg("png")
            .arg("-")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Vid2DocError::provider("ffmpeg", e.to_string()))?;

        if !output.status.success() {
            return Err(Vid2DocError::provider(
                "ffmpeg",
                format!(
                    "seek to {:.2}s failed: {}",
                    timestamp,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        // seeking past the last frame exits cleanly with nothing written
        if output.stdout.is_empty() {
            return Ok(None);
        }

        let image = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)?;
        Ok(Some(image))
    }
}
