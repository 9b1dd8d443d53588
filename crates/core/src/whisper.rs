use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    error::{Result, Vid2DocError},
    provider::TranscriptProvider,
    types::{Segment, Transcript},
};

pub const DEFAULT_MODEL_NAME: &str = "ggml-base.bin";

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Download the whisper.cpp model into `model_dir` unless it is already there.
pub async fn ensure_model(model_dir: &Path, model_name: &str) -> Result<PathBuf> {
    let model_path = model_dir.join(model_name);
    if model_path.exists() {
        return Ok(model_path);
    }

    fs::create_dir_all(model_dir).await?;
    let download_url = format!("{}/{}", MODEL_BASE_URL, model_name);
    info!(url = %download_url, "downloading whisper model");

    let mut response = reqwest::get(&download_url).await?.error_for_status()?;
    let partial_path = model_path.with_extension("part");
    let mut file = fs::File::create(&partial_path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    fs::rename(&partial_path, &model_path).await?;

    Ok(model_path)
}

/// Speech recognition with a local whisper.cpp model.
///
/// Expects 16 kHz mono 16-bit WAV input, as produced by
/// [`crate::media::extract_audio`]. The model is fetched on first use.
pub struct WhisperTranscriber {
    model_dir: PathBuf,
    model_name: String,
}

impl WhisperTranscriber {
    pub fn new(model_dir: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            model_dir: model_dir.into(),
            model_name: model_name.into(),
        }
    }

    fn read_samples(audio_path: &Path) -> Result<Vec<f32>> {
        let mut reader = hound::WavReader::open(audio_path)
            .map_err(|e| Vid2DocError::provider("whisper", e.to_string()))?;
        reader
            .samples::<i16>()
            .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| Vid2DocError::provider("whisper", e.to_string()))
    }

    fn run_model(model_path: &Path, samples: &[f32]) -> Result<Transcript> {
        let failed = |e: whisper_rs::WhisperError| Vid2DocError::provider("whisper", e.to_string());

        let ctx_params = WhisperContextParameters {
            use_gpu: true,
            flash_attn: true,
            ..Default::default()
        };
        let model_path_str = model_path.to_str().ok_or_else(|| {
            Vid2DocError::provider("whisper", format!("non UTF-8 model path {:?}", model_path))
        })?;
        let ctx = WhisperContext::new_with_params(model_path_str, ctx_params).map_err(failed)?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
        params.set_language(Some("auto"));
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_special(false);
        params.set_print_timestamps(false);

        let mut state = ctx.create_state().map_err(failed)?;
        state.full(params, samples).map_err(failed)?;

        let mut text = String::new();
        let mut segments: Vec<Segment> = Vec::new();

        for segment in state.as_iter() {
            let seg_text = match segment.to_str() {
                Ok(s) => s,
                Err(_) => continue,
            };
            // whisper timestamps are in centiseconds
            segments.push(Segment {
                start: segment.start_timestamp() as f64 / 100.0,
                end: segment.end_timestamp() as f64 / 100.0,
                text: seg_text.to_string(),
            });
            text.push_str(seg_text);
        }

        let language_index = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(language_index);

        Ok(Transcript {
            language: language.unwrap_or("Unknown").to_string(),
            segments,
            text,
        })
    }
}

#[async_trait]
impl TranscriptProvider for WhisperTranscriber {
    async fn transcribe(&self, media: &Path) -> Result<Transcript> {
        let model_path = ensure_model(&self.model_dir, &self.model_name).await?;
        let audio_path = media.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let samples = Self::read_samples(&audio_path)?;
            Self::run_model(&model_path, &samples)
        })
        .await
        .map_err(|e| Vid2DocError::TaskFailed(e.to_string()))?
    }
}
